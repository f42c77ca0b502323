//! Combat statistics stored per entity.
//!
//! Base ability scores are the stored source of truth; effective scores are
//! derived on read by folding in active status effects. Armor class and hit
//! points are computed by the rules layer, not stored here.

use arrayvec::ArrayVec;
use strum::EnumIter;

use crate::config::BattleConfig;
use crate::dice::ability_modifier;
use crate::effect::AbilityId;

use super::status::{StatusKind, StatusSet};
use super::ResourceMeter;

/// The six core ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

/// Base ability score block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    pub fn get(&self, kind: AbilityKind) -> i32 {
        match kind {
            AbilityKind::Strength => self.strength,
            AbilityKind::Dexterity => self.dexterity,
            AbilityKind::Constitution => self.constitution,
            AbilityKind::Intelligence => self.intelligence,
            AbilityKind::Wisdom => self.wisdom,
            AbilityKind::Charisma => self.charisma,
        }
    }
}

impl Default for AbilityScores {
    /// Average person: all scores 10.
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// Damage type for resistances and damage calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Melee and projectile damage.
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    /// Pure magic.
    Arcane,
    /// Ignores all resistances.
    True,
}

/// How an entity reacts to one damage type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resistance {
    #[default]
    Normal,
    /// Half damage, floored.
    Resistant,
    /// Double damage.
    Vulnerable,
    /// No damage.
    Immune,
}

/// Per-damage-type resistance table; unlisted types are `Normal`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resistances {
    entries: Vec<(DamageType, Resistance)>,
}

impl Resistances {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(mut self, damage_type: DamageType, resistance: Resistance) -> Self {
        self.set(damage_type, resistance);
        self
    }

    pub fn set(&mut self, damage_type: DamageType, resistance: Resistance) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == damage_type) {
            entry.1 = resistance;
        } else {
            self.entries.push((damage_type, resistance));
        }
    }

    pub fn get(&self, damage_type: DamageType) -> Resistance {
        self.entries
            .iter()
            .find(|(t, _)| *t == damage_type)
            .map(|(_, r)| *r)
            .unwrap_or_default()
    }
}

/// Character class, used for hit dice and AI behavior defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassKind {
    #[default]
    Fighter,
    Wizard,
    Rogue,
    Cleric,
    /// Unclassed monsters.
    Beast,
}

impl ClassKind {
    /// Hit die size for HP computation.
    pub fn hit_die(self) -> u32 {
        match self {
            ClassKind::Fighter => 10,
            ClassKind::Wizard => 6,
            ClassKind::Rogue => 8,
            ClassKind::Cleric => 8,
            ClassKind::Beast => 8,
        }
    }
}

/// Race, used for the per-level hit-point bonus of tougher stock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Race {
    #[default]
    Human,
    Dwarf,
    Elf,
    Orc,
    Beast,
}

impl Race {
    /// Flat HP bonus applied once per level.
    pub fn hp_bonus_per_level(self) -> i32 {
        match self {
            Race::Dwarf | Race::Orc => 1,
            _ => 0,
        }
    }
}

/// Armor weight class; governs how much DEX contributes to armor class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArmorType {
    #[default]
    Light,
    Medium,
    Heavy,
}

/// AI behavior tag read by the opponent policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    /// Close in and swing.
    #[default]
    Bruiser,
    /// Prefers casting while spell slots remain.
    Caster,
}

/// Complete combat statistics block for one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub level: i32,
    pub class: ClassKind,
    pub race: Race,
    pub behavior: Behavior,

    pub hp: ResourceMeter,
    pub stamina: ResourceMeter,

    pub scores: AbilityScores,

    pub base_armor: i32,
    pub armor_type: ArmorType,
    pub has_shield: bool,

    pub initiative_bonus: i32,
    /// Movement budget in tiles per turn.
    pub movement: u32,
    /// Offensive/defensive actions allowed per turn.
    pub max_actions: u32,

    pub spell_slots: u32,
    pub potions: u32,

    pub statuses: StatusSet,
    pub resistances: Resistances,
    pub abilities: ArrayVec<AbilityId, { BattleConfig::MAX_ABILITIES }>,

    /// Crit-focus trait: criticals trigger on a natural 19 as well as 20.
    pub crit_focus: bool,
}

impl CombatStats {
    /// Effective score: base plus active Strengthened/Weakened adjustments.
    pub fn effective_score(&self, kind: AbilityKind) -> i32 {
        let mut score = self.scores.get(kind);
        if kind == AbilityKind::Strength {
            if let Some(up) = self.statuses.get(StatusKind::Strengthened) {
                score += up.intensity as i32;
            }
            if let Some(down) = self.statuses.get(StatusKind::Weakened) {
                score -= down.intensity as i32;
            }
        }
        score
    }

    /// Modifier of the effective score.
    pub fn modifier(&self, kind: AbilityKind) -> i32 {
        ability_modifier(self.effective_score(kind))
    }

    pub fn knows_ability(&self, id: AbilityId) -> bool {
        self.abilities.contains(&id)
    }
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            level: 1,
            class: ClassKind::default(),
            race: Race::default(),
            behavior: Behavior::default(),
            hp: ResourceMeter::full(10),
            stamina: ResourceMeter::full(10),
            scores: AbilityScores::default(),
            base_armor: 10,
            armor_type: ArmorType::default(),
            has_shield: false,
            initiative_bonus: 0,
            movement: 4,
            max_actions: 1,
            spell_slots: 0,
            potions: 0,
            statuses: StatusSet::empty(),
            resistances: Resistances::empty(),
            abilities: ArrayVec::new(),
            crit_focus: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::status::StatusEffect;

    #[test]
    fn weakened_lowers_effective_strength() {
        let mut stats = CombatStats {
            scores: AbilityScores::new(16, 10, 10, 10, 10, 10),
            ..CombatStats::default()
        };
        assert_eq!(stats.modifier(AbilityKind::Strength), 3);
        stats
            .statuses
            .apply(StatusEffect::new(StatusKind::Weakened, 2, 4));
        assert_eq!(stats.effective_score(AbilityKind::Strength), 12);
        assert_eq!(stats.modifier(AbilityKind::Strength), 1);
    }

    #[test]
    fn unlisted_resistance_is_normal() {
        let resistances = Resistances::empty().with(DamageType::Fire, Resistance::Immune);
        assert_eq!(resistances.get(DamageType::Fire), Resistance::Immune);
        assert_eq!(resistances.get(DamageType::Cold), Resistance::Normal);
    }
}
