//! Attack roll construction.

use crate::config::BattleConfig;
use crate::dice::{DiceRng, RollMode, proficiency_bonus};
use crate::grid::BattleGrid;
use crate::state::{AbilityKind, Entity, StatusKind, WeaponProfile};

/// Elevation relationship between attacker and target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElevationEdge {
    /// Attacker stands at least two units above the target.
    High,
    #[default]
    Level,
    /// Attacker stands at least two units below the target.
    Low,
}

impl ElevationEdge {
    pub fn between(grid: &BattleGrid, attacker: &Entity, target: &Entity) -> Self {
        let diff = grid.elevation_diff(attacker.position, target.position);
        if diff >= BattleConfig::ELEVATION_EDGE {
            ElevationEdge::High
        } else if diff <= -BattleConfig::ELEVATION_EDGE {
            ElevationEdge::Low
        } else {
            ElevationEdge::Level
        }
    }

    /// Flat attack-roll adjustment for this edge.
    pub fn roll_bonus(self) -> i32 {
        match self {
            ElevationEdge::High => BattleConfig::ELEVATION_ROLL_BONUS,
            ElevationEdge::Level => 0,
            ElevationEdge::Low => -BattleConfig::ELEVATION_ROLL_BONUS,
        }
    }
}

/// A fully assembled attack roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRoll {
    pub total: i32,
    /// The counting die before modifiers.
    pub natural: u32,
    /// Both raw d20s, for audit and animation.
    pub rolls: [u32; 2],
    pub mode: RollMode,
    pub critical: bool,
    pub auto_miss: bool,
    pub elevation: ElevationEdge,
}

impl AttackRoll {
    /// Whether the roll beats the given armor class.
    ///
    /// A natural 1 always misses; a critical always hits.
    pub fn hits(&self, armor_class: i32) -> bool {
        if self.auto_miss {
            return false;
        }
        self.critical || self.total >= armor_class
    }
}

/// Ability score used to attack with the given weapon: STR for melee, DEX
/// for ranged, and the better of the two for finesse weapons.
pub fn attack_ability(attacker: &Entity, weapon: &WeaponProfile) -> AbilityKind {
    if weapon.ranged {
        AbilityKind::Dexterity
    } else if weapon.finesse {
        let str_mod = attacker.stats.modifier(AbilityKind::Strength);
        let dex_mod = attacker.stats.modifier(AbilityKind::Dexterity);
        if dex_mod > str_mod {
            AbilityKind::Dexterity
        } else {
            AbilityKind::Strength
        }
    } else {
        AbilityKind::Strength
    }
}

/// Roll mode granted by the attacker's status effects: Haste gives
/// advantage, Slow gives disadvantage, both together cancel.
pub fn status_roll_mode(attacker: &Entity) -> RollMode {
    let mut mode = RollMode::Normal;
    if attacker.stats.statuses.has(StatusKind::Haste) {
        mode = mode.combine(RollMode::Advantage);
    }
    if attacker.stats.statuses.has(StatusKind::Slow) {
        mode = mode.combine(RollMode::Disadvantage);
    }
    mode
}

/// Builds the attack roll for one resolution.
///
/// The roll mode folds together status effects and the elevation edge; the
/// total adds the weapon's ability modifier, proficiency, and the flat
/// elevation bonus. Criticals trigger on a natural 20, or 19 when the
/// attacker has the crit-focus trait.
pub fn compute_attack_roll(
    attacker: &Entity,
    target: Option<&Entity>,
    grid: &BattleGrid,
    rng: &mut DiceRng,
) -> AttackRoll {
    let weapon = attacker.weapon_profile();

    let elevation = target
        .map(|t| ElevationEdge::between(grid, attacker, t))
        .unwrap_or(ElevationEdge::Level);

    let mut mode = status_roll_mode(attacker);
    if elevation == ElevationEdge::High {
        mode = mode.combine(RollMode::Advantage);
    }

    let d20 = rng.roll_d20(mode);
    let ability = attack_ability(attacker, &weapon);
    let total = d20.value as i32
        + attacker.stats.modifier(ability)
        + proficiency_bonus(attacker.stats.level)
        + elevation.roll_bonus();

    let crit_threshold = if attacker.stats.crit_focus { 19 } else { 20 };

    AttackRoll {
        total,
        natural: d20.value,
        rolls: d20.rolls,
        mode: d20.mode,
        critical: d20.value >= crit_threshold,
        auto_miss: d20.value == 1,
        elevation,
    }
}
