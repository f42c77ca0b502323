//! Combatant state.

use crate::dice::DiceSpec;

use super::common::{EntityId, Position, Side};
use super::stats::{CombatStats, DamageType};

/// An equipped weapon's combat-relevant profile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub name: String,
    pub dice: DiceSpec,
    pub damage_type: DamageType,
    /// Finesse weapons attack with the better of STR and DEX.
    pub finesse: bool,
    pub ranged: bool,
    /// Maximum attack distance in tiles.
    pub range: u32,
}

impl WeaponProfile {
    /// Bare fists; the fallback when nothing is equipped.
    pub fn unarmed() -> Self {
        Self {
            name: "Unarmed".to_string(),
            dice: DiceSpec::new(1, 4, 0),
            damage_type: DamageType::Physical,
            finesse: false,
            ranged: false,
            range: 1,
        }
    }
}

/// A combatant: player character, enemy, or bystander.
///
/// Entities are created at battle start and never removed mid-battle; a
/// defeated entity (hp 0) stays in the list for death presentation and loot
/// but is excluded from targeting and turn selection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub side: Side,
    pub stats: CombatStats,
    pub position: Position,
    pub weapon: Option<WeaponProfile>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, side: Side, stats: CombatStats) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            stats,
            position: Position::ORIGIN,
            weapon: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponProfile) -> Self {
        self.weapon = Some(weapon);
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.hp.current > 0
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        !self.is_alive()
    }

    /// The equipped weapon, or bare fists.
    pub fn weapon_profile(&self) -> WeaponProfile {
        self.weapon.clone().unwrap_or_else(WeaponProfile::unarmed)
    }

    /// Maximum distance at which this entity's weapon can reach a target.
    pub fn attack_range(&self) -> u32 {
        self.weapon.as_ref().map(|w| w.range).unwrap_or(1)
    }
}
