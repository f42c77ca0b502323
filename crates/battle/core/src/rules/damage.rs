//! Damage calculation and resistance adjustment.

use crate::dice::{DiceRng, DiceSpec};
use crate::state::{DamageType, Entity, Resistance, StatusKind, WeaponProfile};

use super::attack::{ElevationEdge, attack_ability};

/// Die granted by attacking from the high ground.
const ELEVATION_DIE: DiceSpec = DiceSpec::new(1, 4, 0);

/// Computes a weapon hit's damage before resistance adjustment.
///
/// Critical hits double the dice count, never the flat parts. The ability
/// modifier matches the one used for the attack roll, the high-ground edge
/// adds 1d4, and active Rage adds its intensity as a flat bonus.
pub fn compute_damage(
    attacker: &Entity,
    weapon: &WeaponProfile,
    critical: bool,
    elevation: ElevationEdge,
    rng: &mut DiceRng,
) -> u32 {
    let dice = if critical {
        weapon.dice.roll_crit(rng)
    } else {
        weapon.dice.roll(rng)
    };

    let ability = attack_ability(attacker, weapon);
    let mut total = dice + attacker.stats.modifier(ability);

    if elevation == ElevationEdge::High {
        total += ELEVATION_DIE.roll(rng);
    }
    total += rage_bonus(attacker);

    total.max(0) as u32
}

/// Flat damage bonus from active Rage-type effects.
pub fn rage_bonus(attacker: &Entity) -> i32 {
    attacker
        .stats
        .statuses
        .get(StatusKind::Rage)
        .map(|e| e.intensity as i32)
        .unwrap_or(0)
}

/// Adjusts raw damage for the target's resistance to the damage type.
///
/// True damage bypasses the table entirely.
pub fn apply_resistance(raw: u32, damage_type: DamageType, target: &Entity) -> u32 {
    if damage_type == DamageType::True {
        return raw;
    }
    match target.stats.resistances.get(damage_type) {
        Resistance::Normal => raw,
        Resistance::Resistant => raw / 2,
        Resistance::Vulnerable => raw * 2,
        Resistance::Immune => 0,
    }
}
