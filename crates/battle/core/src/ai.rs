//! Opponent decision-making.
//!
//! A [`Strategy`] turns the current battle state into an [`Intent`] for one
//! AI-controlled actor. New behaviors (archers, bosses) are new strategy
//! implementations rather than deeper branching in one policy.

use crate::effect::{AbilityId, AbilityOracle};
use crate::grid::reachable_tiles;
use crate::state::{Behavior, BattleState, Entity, EntityId, Position, Side};

/// What an AI actor wants to do with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Cast an ability at a tile.
    CastSpell {
        ability: AbilityId,
        target: Position,
    },
    /// Walk to a tile, then optionally attack an adjacent target.
    Advance {
        destination: Position,
        then_attack: Option<Position>,
    },
    /// Basic attack against the entity on a tile.
    Attack { target: Position },
    /// Nothing legal to do; end the turn.
    Pass,
}

/// Decision policy for one AI actor's turn.
pub trait Strategy {
    fn select_intent(
        &self,
        state: &BattleState,
        actor: EntityId,
        abilities: &dyn AbilityOracle,
    ) -> Intent;
}

/// The stock two-tier policy.
///
/// Casters with a remaining spell slot and an in-range damaging spell cast
/// it at the nearest living player entity. Everyone else closes the gap,
/// picking the reachable tile that minimizes grid distance to that target,
/// and swings when in weapon range. Target selection is always nearest by
/// grid distance; there is no threat table.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedStrategy;

impl ScriptedStrategy {
    fn nearest_player<'s>(state: &'s BattleState, from: &Entity) -> Option<&'s Entity> {
        state
            .living_on_side(Side::Player)
            .min_by_key(|e| (state.grid.distance(from.position, e.position), e.id))
    }

    /// First known damaging spell that is affordable and reaches `distance`.
    fn pick_spell(
        actor: &Entity,
        distance: u32,
        abilities: &dyn AbilityOracle,
    ) -> Option<AbilityId> {
        actor.stats.abilities.iter().copied().find(|id| {
            abilities.ability(*id).is_some_and(|ability| {
                ability.is_damaging()
                    && ability.range >= distance
                    && actor.stats.spell_slots >= ability.slot_cost
                    && actor.stats.stamina.current >= ability.stamina_cost
            })
        })
    }
}

impl Strategy for ScriptedStrategy {
    fn select_intent(
        &self,
        state: &BattleState,
        actor: EntityId,
        abilities: &dyn AbilityOracle,
    ) -> Intent {
        let Some(me) = state.entity(actor).filter(|e| e.is_alive()) else {
            return Intent::Pass;
        };
        let Some(target) = Self::nearest_player(state, me) else {
            return Intent::Pass;
        };
        let target_pos = target.position;
        let distance = state.grid.distance(me.position, target_pos);

        // Tier 1: casters burn a slot when a damaging spell reaches.
        if me.stats.behavior == Behavior::Caster
            && me.stats.spell_slots > 0
            && state.grid.line_of_sight(me.position, target_pos)
        {
            if let Some(ability) = Self::pick_spell(me, distance, abilities) {
                return Intent::CastSpell {
                    ability,
                    target: target_pos,
                };
            }
        }

        // Tier 2: melee. Swing if already in reach, otherwise close in.
        if distance <= me.attack_range() {
            return Intent::Attack { target: target_pos };
        }

        if me.stats.statuses.blocks_movement() {
            return Intent::Pass;
        }
        let blocked = state.occupied_tiles(Some(actor));
        let reachable = reachable_tiles(&state.grid, me.position, me.stats.movement, &blocked);
        let destination = reachable
            .iter()
            .copied()
            .min_by_key(|tile| (state.grid.distance(*tile, target_pos), *tile));

        match destination {
            Some(destination) => {
                let then_attack = (state.grid.distance(destination, target_pos)
                    <= me.attack_range())
                .then_some(target_pos);
                Intent::Advance {
                    destination,
                    then_attack,
                }
            }
            // Tier 3: boxed in; end the turn without acting.
            None => Intent::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DiceSpec;
    use crate::effect::{Ability, ActionEffect};
    use crate::grid::{Adjacency, BattleGrid, GridCell};
    use crate::state::{CombatStats, DamageType, ResourceMeter};

    struct OneSpell(Ability);

    impl AbilityOracle for OneSpell {
        fn ability(&self, id: AbilityId) -> Option<&Ability> {
            (self.0.id == id).then_some(&self.0)
        }
    }

    fn firebolt() -> Ability {
        Ability {
            id: AbilityId(1),
            name: "Firebolt".into(),
            effects: vec![ActionEffect::damage(
                DamageType::Fire,
                DiceSpec::new(1, 10, 0),
            )],
            range: 6,
            aoe: None,
            slot_cost: 1,
            stamina_cost: 0,
        }
    }

    fn setup(behavior: Behavior, slots: u32, enemy_pos: Position) -> BattleState {
        let player = Entity::new(
            EntityId(0),
            "Hero",
            Side::Player,
            CombatStats::default(),
        )
        .at(Position::new(0, 0));
        let mut stats = CombatStats {
            behavior,
            spell_slots: slots,
            stamina: ResourceMeter::full(10),
            ..CombatStats::default()
        };
        stats.abilities.push(AbilityId(1));
        let enemy = Entity::new(EntityId(1), "Cultist", Side::Enemy, stats).at(enemy_pos);
        BattleState::new(
            BattleGrid::open(10, 10, Adjacency::Eight),
            vec![player, enemy],
            7,
        )
    }

    #[test]
    fn caster_with_slots_casts_at_nearest_player() {
        let state = setup(Behavior::Caster, 2, Position::new(4, 0));
        let intent = ScriptedStrategy.select_intent(&state, EntityId(1), &OneSpell(firebolt()));
        assert_eq!(
            intent,
            Intent::CastSpell {
                ability: AbilityId(1),
                target: Position::new(0, 0),
            }
        );
    }

    #[test]
    fn caster_out_of_slots_falls_back_to_melee_advance() {
        let state = setup(Behavior::Caster, 0, Position::new(4, 0));
        let intent = ScriptedStrategy.select_intent(&state, EntityId(1), &OneSpell(firebolt()));
        match intent {
            Intent::Advance {
                destination,
                then_attack,
            } => {
                // Moves four tiles west, landing adjacent with a follow-up swing.
                assert_eq!(
                    state.grid.distance(destination, Position::new(0, 0)),
                    1
                );
                assert_eq!(then_attack, Some(Position::new(0, 0)));
            }
            other => panic!("expected Advance, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_bruiser_attacks() {
        let state = setup(Behavior::Bruiser, 0, Position::new(1, 0));
        let intent = ScriptedStrategy.select_intent(&state, EntityId(1), &OneSpell(firebolt()));
        assert_eq!(
            intent,
            Intent::Attack {
                target: Position::new(0, 0)
            }
        );
    }

    #[test]
    fn boxed_in_actor_passes() {
        let mut state = setup(Behavior::Bruiser, 0, Position::new(5, 5));
        for &(dx, dy) in Adjacency::Eight.offsets() {
            state
                .grid
                .set_cell(Position::new(5 + dx, 5 + dy), GridCell::wall());
        }
        let intent = ScriptedStrategy.select_intent(&state, EntityId(1), &OneSpell(firebolt()));
        assert_eq!(intent, Intent::Pass);
    }
}
