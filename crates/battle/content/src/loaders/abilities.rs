//! Ability registry loaded from RON data.

use std::collections::HashMap;

use anyhow::Context;
use battle_core::{Ability, AbilityId, AbilityOracle, ActionEffect, DamageType, DiceSpec};

/// Registry of castable abilities, keyed by id.
///
/// A lookup miss falls back to a hardcoded basic strike so combat can
/// proceed past a bad content reference instead of failing the battle.
#[derive(Debug, Clone)]
pub struct AbilityRegistry {
    abilities: HashMap<AbilityId, Ability>,
    fallback: Ability,
}

impl AbilityRegistry {
    /// Loads the registry from embedded RON data.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_ron(include_str!("../../data/abilities.ron"))
    }

    /// Parses a registry from RON text.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let list: Vec<Ability> = ron::from_str(text).context("failed to parse abilities RON")?;
        let mut abilities = HashMap::new();
        for ability in list {
            abilities.insert(ability.id, ability);
        }
        Ok(Self {
            abilities,
            fallback: Self::fallback_strike(),
        })
    }

    /// Plain melee strike used when an ability id has no definition.
    fn fallback_strike() -> Ability {
        Ability {
            id: AbilityId(0),
            name: "Desperate Strike".to_string(),
            effects: vec![ActionEffect::damage(
                DamageType::Physical,
                DiceSpec::new(1, 4, 0),
            )],
            range: 1,
            aoe: None,
            slot_cost: 0,
            stamina_cost: 0,
        }
    }

    /// Gets an ability, falling back to the basic strike on a miss.
    pub fn get_or_default(&self, id: AbilityId) -> &Ability {
        self.abilities.get(&id).unwrap_or(&self.fallback)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AbilityId> + '_ {
        self.abilities.keys().copied()
    }
}

impl AbilityOracle for AbilityRegistry {
    fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_abilities_load() {
        let registry = AbilityRegistry::embedded().expect("embedded data parses");
        assert!(registry.len() >= 5);

        // Firebolt: single-target damaging spell.
        let firebolt = registry.ability(AbilityId(1)).expect("firebolt exists");
        assert!(firebolt.is_damaging());
        assert!(firebolt.requires_hit_roll());
        assert!(firebolt.aoe.is_none());

        // Fireball: area damage.
        let fireball = registry.ability(AbilityId(2)).expect("fireball exists");
        assert!(fireball.aoe.is_some());
    }

    #[test]
    fn lookup_miss_falls_back() {
        let registry = AbilityRegistry::embedded().unwrap();
        let fallback = registry.get_or_default(AbilityId(9999));
        assert_eq!(fallback.name, "Desperate Strike");
        assert!(registry.ability(AbilityId(9999)).is_none());
    }
}
