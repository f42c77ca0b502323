//! Armor class and hit-point formulas.

use crate::config::BattleConfig;
use crate::dice::ability_modifier;
use crate::state::{ArmorType, Entity, Race, StatusKind, StatusSet};

/// Computes armor class from its parts.
///
/// The DEX bonus is uncapped for light armor, capped at +2 for medium, and
/// ignored entirely for heavy. A shield adds its flat bonus, and an active
/// Shield status adds its intensity on top.
pub fn armor_class(
    dexterity: i32,
    base_armor: i32,
    has_shield: bool,
    armor_type: ArmorType,
    statuses: &StatusSet,
) -> i32 {
    let dex_bonus = match armor_type {
        ArmorType::Light => ability_modifier(dexterity),
        ArmorType::Medium => ability_modifier(dexterity).min(BattleConfig::MEDIUM_ARMOR_DEX_CAP),
        ArmorType::Heavy => 0,
    };

    let shield_bonus = if has_shield {
        BattleConfig::SHIELD_AC_BONUS
    } else {
        0
    };

    let status_bonus = statuses
        .get(StatusKind::Shield)
        .map(|e| e.intensity as i32)
        .unwrap_or(0);

    base_armor + dex_bonus + shield_bonus + status_bonus
}

/// Armor class of a live entity, folding in its current statuses.
pub fn entity_armor_class(entity: &Entity) -> i32 {
    let stats = &entity.stats;
    armor_class(
        stats.scores.dexterity,
        stats.base_armor,
        stats.has_shield,
        stats.armor_type,
        &stats.statuses,
    )
}

/// Maximum hit points for a character.
///
/// First level grants the full hit die plus the CON modifier; every further
/// level grants the die's average (`die/2 + 1`) plus the CON modifier.
/// Tougher races add a flat bonus per level, and the whole total is scaled
/// by the balance multiplier.
pub fn hit_points(level: i32, constitution: i32, hit_die: u32, race: Race, hp_scale: u32) -> u32 {
    let con_mod = ability_modifier(constitution);
    let first = hit_die as i32 + con_mod;
    let per_level = hit_die as i32 / 2 + 1 + con_mod;
    let total = first + (level - 1).max(0) * per_level + level * race.hp_bonus_per_level();
    (total.max(1) as u32) * hp_scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusEffect;

    #[test]
    fn dex_cap_per_armor_type() {
        let none = StatusSet::empty();
        // DEX 18 => +4 modifier.
        assert_eq!(armor_class(18, 11, false, ArmorType::Light, &none), 15);
        assert_eq!(armor_class(18, 14, false, ArmorType::Medium, &none), 16);
        assert_eq!(armor_class(18, 17, false, ArmorType::Heavy, &none), 17);
    }

    #[test]
    fn shield_and_status_stack() {
        let mut statuses = StatusSet::empty();
        statuses.apply(StatusEffect::new(StatusKind::Shield, 3, 2));
        assert_eq!(armor_class(10, 10, true, ArmorType::Light, &statuses), 14);
    }

    #[test]
    fn hit_points_level_one() {
        // d10 + CON 14 (+2), human, scale 2 => (10 + 2) * 2.
        assert_eq!(hit_points(1, 14, 10, Race::Human, 2), 24);
    }

    #[test]
    fn hit_points_scale_with_level_and_race() {
        // Level 3 dwarf, d10, CON 14: (12) + 2*(5+1+2) + 3*1 = 31, scaled.
        assert_eq!(hit_points(3, 14, 10, Race::Dwarf, 2), 62);
        // Same without the racial bonus.
        assert_eq!(hit_points(3, 14, 10, Race::Human, 2), 56);
    }

    #[test]
    fn hit_points_never_below_scale() {
        // Terrible constitution cannot produce a zero-HP character.
        assert!(hit_points(1, 1, 6, Race::Elf, 2) >= 2);
    }
}
