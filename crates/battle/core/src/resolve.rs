//! Action resolution: applies an ability's effect list to one target.
//!
//! `resolve` is a pure function over entity snapshots. It produces an
//! immutable [`Resolution`] record; committing the HP clamp and status
//! merges into the battle state is the orchestrator's job.

use crate::dice::{DiceRng, DiceSpec};
use crate::effect::{ActionEffect, EffectKind, StatusApplication};
use crate::grid::{BattleGrid, TileEffectKind};
use crate::rules::{
    self, ElevationEdge, apply_resistance, attack_ability, compute_attack_roll,
};
use crate::state::{Entity, Popup, StatusKind};

/// Die added to damage effects rolled from the high ground.
const ELEVATION_DIE: DiceSpec = DiceSpec::new(1, 4, 0);

/// Everything a resolution needs besides the two entities.
pub struct ResolveContext<'a> {
    pub grid: &'a BattleGrid,
    pub rng: &'a mut DiceRng,
}

/// Immutable outcome of resolving one ability against one target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub hit: bool,
    pub critical: bool,
    /// Net HP change on the target (negative for damage).
    pub hp_delta: i32,
    /// Net HP change on the actor (drain returns).
    pub actor_hp_delta: i32,
    pub popups: Vec<Popup>,
    pub target_statuses: Vec<StatusApplication>,
    pub actor_statuses: Vec<StatusApplication>,
}

/// Synthesizes the effect list for a plain weapon strike.
///
/// The weapon's dice pick up the attacker's Rage bonus as a flat part, and
/// the strike scales with the same ability the attack roll uses.
pub fn weapon_strike_effects(attacker: &Entity) -> Vec<ActionEffect> {
    let weapon = attacker.weapon_profile();
    let mut dice = weapon.dice;
    dice.bonus += rules::rage_bonus(attacker);
    vec![ActionEffect::damage(weapon.damage_type, dice).scaled_by(attack_ability(attacker, &weapon))]
}

/// Resolves an ordered effect list from `actor` against `target`.
///
/// When any effect needs a hit roll, one attack roll is made for the whole
/// call. A miss short-circuits to a single MISS popup and nothing else:
/// later effects in the list never apply on a miss.
pub fn resolve(
    actor: &Entity,
    target: &Entity,
    effects: &[ActionEffect],
    ctx: &mut ResolveContext<'_>,
) -> Resolution {
    let mut out = Resolution {
        hit: true,
        ..Resolution::default()
    };

    let needs_roll = effects.iter().any(ActionEffect::requires_hit_roll);
    let mut elevation = ElevationEdge::between(ctx.grid, actor, target);

    if needs_roll {
        let roll = compute_attack_roll(actor, Some(target), ctx.grid, ctx.rng);
        elevation = roll.elevation;
        out.critical = roll.critical;
        if !roll.hits(rules::entity_armor_class(target)) {
            out.hit = false;
            out.popups.push(Popup::text("MISS", target.position));
            return out;
        }
    }

    for effect in effects {
        if effect.chance < 100 && ctx.rng.percent() > effect.chance {
            continue;
        }

        match effect.kind {
            EffectKind::Damage => {
                let amount = roll_damage(actor, target, effect, out.critical, elevation, ctx);
                out.hp_delta -= amount as i32;
                out.popups.push(Popup::damage(
                    amount,
                    effect.damage_type.to_string(),
                    out.critical,
                    target.position,
                ));
            }
            EffectKind::Drain => {
                let amount = roll_damage(actor, target, effect, out.critical, elevation, ctx);
                out.hp_delta -= amount as i32;
                out.popups.push(Popup::damage(
                    amount,
                    effect.damage_type.to_string(),
                    out.critical,
                    target.position,
                ));
                let returned = amount / 2;
                if returned > 0 {
                    out.actor_hp_delta += returned as i32;
                    out.popups.push(Popup::heal(returned, actor.position));
                }
            }
            EffectKind::Heal => {
                let mut amount = effect.dice.roll(ctx.rng);
                if let Some(kind) = effect.scaling {
                    amount += actor.stats.modifier(kind);
                }
                amount += holy_ground_bonus(ctx.grid, actor);
                let amount = amount.max(0) as u32;
                out.hp_delta += amount as i32;
                out.popups.push(Popup::heal(amount, target.position));
            }
            EffectKind::Status | EffectKind::Debuff => {
                if let Some(application) = effect.status {
                    out.target_statuses.push(application);
                    out.popups
                        .push(Popup::text(application.kind.to_string(), target.position));
                }
            }
            EffectKind::Buff => {
                if let Some(application) = effect.status {
                    out.actor_statuses.push(application);
                    out.popups
                        .push(Popup::text(application.kind.to_string(), actor.position));
                }
            }
            EffectKind::Transform => {
                let application = effect
                    .status
                    .unwrap_or(StatusApplication::new(StatusKind::Transformed, 3, 1));
                let application = StatusApplication {
                    kind: StatusKind::Transformed,
                    ..application
                };
                out.target_statuses.push(application);
                out.popups
                    .push(Popup::text(StatusKind::Transformed.to_string(), target.position));
            }
        }
    }

    out
}

fn roll_damage(
    actor: &Entity,
    target: &Entity,
    effect: &ActionEffect,
    critical: bool,
    elevation: ElevationEdge,
    ctx: &mut ResolveContext<'_>,
) -> u32 {
    let mut amount = if critical {
        effect.dice.roll_crit(ctx.rng)
    } else {
        effect.dice.roll(ctx.rng)
    };
    if let Some(kind) = effect.scaling {
        amount += actor.stats.modifier(kind);
    }
    if elevation == ElevationEdge::High {
        amount += ELEVATION_DIE.roll(ctx.rng);
    }
    apply_resistance(amount.max(0) as u32, effect.damage_type, target)
}

/// Heal bonus for casting while standing on holy ground.
fn holy_ground_bonus(grid: &BattleGrid, actor: &Entity) -> i32 {
    grid.cell(actor.position)
        .and_then(|c| c.effect)
        .filter(|e| e.kind == TileEffectKind::HolyGround)
        .map(|e| e.magnitude as i32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Adjacency;
    use crate::state::{
        AbilityKind, AbilityScores, CombatStats, DamageType, EntityId, PopupColor, Position,
        ResourceMeter, Side,
    };

    fn combatant(id: u32, side: Side) -> Entity {
        let stats = CombatStats {
            scores: AbilityScores::new(15, 10, 12, 10, 10, 10),
            hp: ResourceMeter::full(30),
            ..CombatStats::default()
        };
        Entity::new(EntityId(id), format!("e{id}"), side, stats)
            .at(Position::new(id as i32, 0))
    }

    fn multi_effect() -> Vec<ActionEffect> {
        vec![
            ActionEffect::damage(DamageType::Fire, DiceSpec::new(2, 6, 0)),
            ActionEffect::status(StatusApplication::new(StatusKind::Burn, 3, 1)),
            ActionEffect::heal(DiceSpec::new(1, 4, 0)).with_kind(EffectKind::Buff).inflicts(
                StatusApplication::new(StatusKind::Haste, 2, 1),
            ),
        ]
    }

    /// Finds a seed whose first attack roll misses (or hits) the target AC.
    fn seed_where(hit: bool, actor: &Entity, target: &Entity, grid: &BattleGrid) -> u64 {
        for seed in 0..5000u64 {
            let mut rng = DiceRng::seed(seed);
            let roll = compute_attack_roll(actor, Some(target), grid, &mut rng);
            if roll.hits(rules::entity_armor_class(target)) == hit {
                return seed;
            }
        }
        panic!("no seed found");
    }

    #[test]
    fn miss_short_circuits_the_whole_list() {
        let grid = BattleGrid::open(6, 6, Adjacency::Eight);
        let actor = combatant(0, Side::Player);
        let mut target = combatant(1, Side::Enemy);
        target.stats.base_armor = 18;

        let seed = seed_where(false, &actor, &target, &grid);
        let mut rng = DiceRng::seed(seed);
        let mut ctx = ResolveContext {
            grid: &grid,
            rng: &mut rng,
        };
        let resolution = resolve(&actor, &target, &multi_effect(), &mut ctx);

        assert!(!resolution.hit);
        assert_eq!(resolution.hp_delta, 0);
        assert_eq!(resolution.popups.len(), 1);
        assert_eq!(resolution.popups[0].label, "MISS");
        assert!(resolution.target_statuses.is_empty());
        assert!(resolution.actor_statuses.is_empty());
    }

    #[test]
    fn hit_applies_effects_in_order() {
        let grid = BattleGrid::open(6, 6, Adjacency::Eight);
        let actor = combatant(0, Side::Player);
        let mut target = combatant(1, Side::Enemy);
        target.stats.base_armor = 1;

        let seed = seed_where(true, &actor, &target, &grid);
        let mut rng = DiceRng::seed(seed);
        let mut ctx = ResolveContext {
            grid: &grid,
            rng: &mut rng,
        };
        let resolution = resolve(&actor, &target, &multi_effect(), &mut ctx);

        assert!(resolution.hit);
        assert!(resolution.hp_delta < 0);
        assert_eq!(resolution.target_statuses.len(), 1);
        assert_eq!(resolution.target_statuses[0].kind, StatusKind::Burn);
        assert_eq!(resolution.actor_statuses.len(), 1);
        assert_eq!(resolution.actor_statuses[0].kind, StatusKind::Haste);
    }

    #[test]
    fn heal_needs_no_roll_and_is_green() {
        let grid = BattleGrid::open(6, 6, Adjacency::Eight);
        let actor = combatant(0, Side::Player);
        let target = combatant(1, Side::Player);
        let effects = vec![ActionEffect::heal(DiceSpec::new(1, 4, 2))];

        let mut rng = DiceRng::seed(9);
        let mut ctx = ResolveContext {
            grid: &grid,
            rng: &mut rng,
        };
        let resolution = resolve(&actor, &target, &effects, &mut ctx);
        assert!(resolution.hit);
        assert!((3..=6).contains(&resolution.hp_delta));
        assert_eq!(resolution.popups[0].color, PopupColor::Green);
    }

    #[test]
    fn drain_returns_half_floored_to_actor() {
        let grid = BattleGrid::open(6, 6, Adjacency::Eight);
        let actor = combatant(0, Side::Enemy);
        let mut target = combatant(1, Side::Player);
        target.stats.base_armor = 1;

        let effects = vec![
            ActionEffect::drain(DamageType::Arcane, DiceSpec::new(2, 4, 0))
                .scaled_by(AbilityKind::Intelligence),
        ];
        let seed = seed_where(true, &actor, &target, &grid);
        let mut rng = DiceRng::seed(seed);
        let mut ctx = ResolveContext {
            grid: &grid,
            rng: &mut rng,
        };
        let resolution = resolve(&actor, &target, &effects, &mut ctx);
        let dealt = -resolution.hp_delta as u32;
        assert_eq!(resolution.actor_hp_delta, (dealt / 2) as i32);
    }

    #[test]
    fn zero_chance_effect_never_applies() {
        let grid = BattleGrid::open(6, 6, Adjacency::Eight);
        let actor = combatant(0, Side::Player);
        let target = combatant(1, Side::Enemy);
        let effects = vec![
            ActionEffect::status(StatusApplication::new(StatusKind::Stun, 1, 1)).with_chance(0),
        ];
        let mut rng = DiceRng::seed(77);
        let mut ctx = ResolveContext {
            grid: &grid,
            rng: &mut rng,
        };
        let resolution = resolve(&actor, &target, &effects, &mut ctx);
        assert!(resolution.target_statuses.is_empty());
    }
}
