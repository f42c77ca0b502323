//! Enemy templates and procedural instantiation.

use std::collections::HashMap;

use anyhow::Context;
use battle_core::{
    AbilityId, AbilityScores, ArmorType, Behavior, ClassKind, CombatStats, DamageType, DiceSpec,
    Entity, EntityId, Position, Race, Resistance, Resistances, ResourceMeter, Side, WeaponProfile,
    hit_points,
};
use serde::{Deserialize, Serialize};

/// Blueprint for spawning one kind of enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub class: ClassKind,
    pub race: Race,
    pub behavior: Behavior,
    pub level: i32,
    pub scores: AbilityScores,
    pub base_armor: i32,
    pub armor_type: ArmorType,
    pub has_shield: bool,
    pub initiative_bonus: i32,
    pub movement: u32,
    pub max_actions: u32,
    pub spell_slots: u32,
    pub abilities: Vec<u16>,
    pub weapon: Option<WeaponProfile>,
    pub resistances: Vec<(DamageType, Resistance)>,
    pub crit_focus: bool,
}

impl EnemyTemplate {
    /// Builds a battle-ready entity from the template.
    pub fn instantiate(&self, id: EntityId, position: Position, hp_scale: u32) -> Entity {
        let hp = hit_points(
            self.level,
            self.scores.constitution,
            self.class.hit_die(),
            self.race,
            hp_scale,
        );
        let stamina = 10 + self.level.max(0) as u32 * 2;

        let mut resistances = Resistances::empty();
        for (damage_type, resistance) in &self.resistances {
            resistances.set(*damage_type, *resistance);
        }

        let mut stats = CombatStats {
            level: self.level,
            class: self.class,
            race: self.race,
            behavior: self.behavior,
            hp: ResourceMeter::full(hp),
            stamina: ResourceMeter::full(stamina),
            scores: self.scores,
            base_armor: self.base_armor,
            armor_type: self.armor_type,
            has_shield: self.has_shield,
            initiative_bonus: self.initiative_bonus,
            movement: self.movement,
            max_actions: self.max_actions,
            spell_slots: self.spell_slots,
            resistances,
            crit_focus: self.crit_focus,
            ..CombatStats::default()
        };
        for ability in &self.abilities {
            if stats.abilities.try_push(AbilityId(*ability)).is_err() {
                break;
            }
        }

        let mut entity = Entity::new(id, self.name.clone(), Side::Enemy, stats).at(position);
        if let Some(weapon) = &self.weapon {
            entity = entity.with_weapon(weapon.clone());
        }
        entity
    }
}

/// Registry of enemy templates, keyed by string id.
///
/// Unknown ids resolve to a hardcoded default so an encounter referencing
/// missing content still produces a fightable battle.
#[derive(Debug, Clone)]
pub struct EnemyRegistry {
    templates: HashMap<String, EnemyTemplate>,
    fallback: EnemyTemplate,
}

impl EnemyRegistry {
    /// Loads the registry from embedded RON data.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_ron(include_str!("../../data/enemies.ron"))
    }

    /// Parses a registry from RON text.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let list: Vec<EnemyTemplate> =
            ron::from_str(text).context("failed to parse enemies RON")?;
        let mut templates = HashMap::new();
        for template in list {
            templates.insert(template.id.clone(), template);
        }
        Ok(Self {
            templates,
            fallback: Self::fallback_template(),
        })
    }

    /// Default mongrel used when a template id is missing.
    fn fallback_template() -> EnemyTemplate {
        EnemyTemplate {
            id: "feral_hound".to_string(),
            name: "Feral Hound".to_string(),
            class: ClassKind::Beast,
            race: Race::Beast,
            behavior: Behavior::Bruiser,
            level: 1,
            scores: AbilityScores::new(12, 12, 10, 3, 10, 5),
            base_armor: 10,
            armor_type: ArmorType::Light,
            has_shield: false,
            initiative_bonus: 1,
            movement: 5,
            max_actions: 1,
            spell_slots: 0,
            abilities: Vec::new(),
            weapon: Some(WeaponProfile {
                name: "Bite".to_string(),
                dice: DiceSpec::new(1, 6, 0),
                damage_type: DamageType::Physical,
                finesse: true,
                ranged: false,
                range: 1,
            }),
            resistances: Vec::new(),
            crit_focus: false,
        }
    }

    /// Gets a template, falling back to the default on a miss.
    pub fn get_or_default(&self, id: &str) -> &EnemyTemplate {
        self.templates.get(id).unwrap_or(&self.fallback)
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
