//! Movement and ability execution against the battle state.

use crate::dice::DiceSpec;
use crate::effect::{Ability, AoeShape};
use crate::grid::find_path;
use crate::resolve::{self, ResolveContext, Resolution};
use crate::state::{
    BattlePhase, EntityId, FxKind, Popup, Position, Side, SpellFx, StatusEffect,
};

use super::{BattleEngine, BattleEvent};

/// Restorative swig used by the Potion action.
const POTION_DICE: DiceSpec = DiceSpec::new(2, 4, 2);

impl<'a> BattleEngine<'a> {
    /// True when `id` may act right now.
    fn is_active_actor(&self, id: EntityId) -> bool {
        matches!(
            self.state.phase,
            BattlePhase::AwaitingInput | BattlePhase::EnemyTurn
        ) && self.state.turn_order.current() == Some(id)
            && self.state.entity(id).map(|e| e.is_alive()).unwrap_or(false)
    }

    /// Walks the actor to `destination` if it is reachable this turn.
    ///
    /// Ignores the request (no state change, no cost) when the destination
    /// is out of range, blocked, or the actor already moved.
    pub fn perform_move(&mut self, actor: EntityId, destination: Position) -> Vec<BattleEvent> {
        if !self.is_active_actor(actor) || self.state.budget.has_moved {
            return Vec::new();
        }
        let Some(entity) = self.state.entity(actor) else {
            return Vec::new();
        };
        if entity.stats.statuses.blocks_movement() {
            return Vec::new();
        }
        let start = entity.position;
        let movement = entity.stats.movement;

        let blocked = self.state.occupied_tiles(Some(actor));
        let Ok(path) = find_path(&self.state.grid, start, destination, &blocked) else {
            return Vec::new();
        };
        if path.cost > movement {
            return Vec::new();
        }

        if let Some(entity) = self.state.entity_mut(actor) {
            entity.position = destination;
        }
        self.state.budget.has_moved = true;
        self.state.phase = BattlePhase::Animating;
        vec![
            BattleEvent::Moved {
                entity: actor,
                path: path.tiles,
            },
            BattleEvent::PhaseChanged {
                phase: BattlePhase::Animating,
            },
        ]
    }

    /// Basic weapon attack against the entity on `target_pos`.
    pub fn perform_attack(&mut self, actor: EntityId, target_pos: Position) -> Vec<BattleEvent> {
        if !self.is_active_actor(actor) || self.state.budget.actions_remaining == 0 {
            return Vec::new();
        }
        let Some(attacker) = self.state.entity(actor) else {
            return Vec::new();
        };
        let Some(target) = self.state.living_entity_at(target_pos) else {
            return Vec::new();
        };
        let target_id = target.id;
        if target_id == actor {
            return Vec::new();
        }

        let in_range =
            self.state.grid.distance(attacker.position, target_pos) <= attacker.attack_range();
        let sighted = self.state.grid.line_of_sight(attacker.position, target_pos);
        if !in_range || !sighted {
            return Vec::new();
        }

        let effects = resolve::weapon_strike_effects(attacker);
        let mut events = self.resolve_against(actor, target_id, &effects);
        events.extend(self.spend_action());
        events
    }

    /// Casts `ability` at `target_pos`, resolving against every living
    /// entity in the footprint, friend or foe alike.
    pub fn perform_ability(
        &mut self,
        actor: EntityId,
        ability: &Ability,
        target_pos: Position,
    ) -> Vec<BattleEvent> {
        if !self.is_active_actor(actor) || self.state.budget.actions_remaining == 0 {
            return Vec::new();
        }
        let Some(caster) = self.state.entity(actor) else {
            return Vec::new();
        };
        if !caster.stats.knows_ability(ability.id)
            || caster.stats.spell_slots < ability.slot_cost
            || caster.stats.stamina.current < ability.stamina_cost
        {
            return Vec::new();
        }
        let caster_pos = caster.position;
        if self.state.grid.distance(caster_pos, target_pos) > ability.range
            || !self.state.grid.line_of_sight(caster_pos, target_pos)
        {
            return Vec::new();
        }

        // Footprint; single-target casts need a live entity on the tile.
        let footprint: Vec<Position> = match ability.aoe {
            Some(AoeShape::Circle { radius }) => self.state.grid.cells_in_circle(target_pos, radius),
            Some(AoeShape::Cone { radius }) => {
                self.state.grid.cells_in_cone(caster_pos, target_pos, radius)
            }
            None => vec![target_pos],
        };
        let targets: Vec<EntityId> = footprint
            .iter()
            .filter_map(|p| self.state.living_entity_at(*p))
            .map(|e| e.id)
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        // Costs are spent once per cast, not per target.
        if let Some(caster) = self.state.entity_mut(actor) {
            caster.stats.spell_slots -= ability.slot_cost;
            caster.stats.stamina.apply(-(ability.stamina_cost as i32));
        }

        let fx = SpellFx {
            kind: if ability.aoe.is_some() {
                FxKind::Burst
            } else {
                FxKind::Projectile
            },
            from: caster_pos,
            to: target_pos,
            color: fx_color(ability),
            duration_ms: 400,
        };
        self.state.fx = Some(fx.clone());
        let mut events = vec![BattleEvent::FxStarted { fx }];

        for target_id in targets {
            events.extend(self.resolve_against(actor, target_id, &ability.effects));
        }
        events.extend(self.spend_action());
        events
    }

    /// Drinks a potion: self-heal, costs one action, needs no tile.
    pub fn use_potion(&mut self, actor: EntityId) -> Vec<BattleEvent> {
        if !self.is_active_actor(actor) || self.state.budget.actions_remaining == 0 {
            return Vec::new();
        }
        let has_potion = self
            .state
            .entity(actor)
            .map(|e| e.stats.potions > 0)
            .unwrap_or(false);
        if !has_potion {
            return Vec::new();
        }

        let amount = POTION_DICE.roll(&mut self.state.rng).max(0) as u32;
        let mut position = Position::ORIGIN;
        if let Some(entity) = self.state.entity_mut(actor) {
            entity.stats.potions -= 1;
            entity.stats.hp.apply(amount as i32);
            position = entity.position;
        }
        self.state.popups.push(Popup::heal(amount, position));

        let mut events = vec![BattleEvent::ActionResolved {
            actor,
            target: actor,
            hit: true,
            critical: false,
            hp_delta: amount as i32,
        }];
        events.extend(self.spend_action());
        events
    }

    /// Resolves one effect list against one target and commits the record.
    fn resolve_against(
        &mut self,
        actor: EntityId,
        target: EntityId,
        effects: &[crate::effect::ActionEffect],
    ) -> Vec<BattleEvent> {
        let (Some(actor_snapshot), Some(target_snapshot)) =
            (self.state.entity(actor).cloned(), self.state.entity(target).cloned())
        else {
            return Vec::new();
        };

        let resolution = {
            let mut ctx = ResolveContext {
                grid: &self.state.grid,
                rng: &mut self.state.rng,
            };
            resolve::resolve(&actor_snapshot, &target_snapshot, effects, &mut ctx)
        };
        self.commit(actor, target, resolution)
    }

    /// Folds a resolution record into the battle state.
    ///
    /// HP lands through the clamping meter, statuses merge under the
    /// max-duration policy, and a killing blow emits the defeat hook.
    fn commit(
        &mut self,
        actor: EntityId,
        target: EntityId,
        resolution: Resolution,
    ) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        self.state.popups.extend(resolution.popups);

        if let Some(entity) = self.state.entity_mut(target) {
            entity.stats.hp.apply(resolution.hp_delta);
            for application in &resolution.target_statuses {
                entity.stats.statuses.apply(StatusEffect::new(
                    application.kind,
                    application.duration,
                    application.intensity,
                ));
                events.push(BattleEvent::StatusApplied {
                    entity: target,
                    kind: application.kind,
                    duration: application.duration,
                });
            }
        }
        if let Some(entity) = self.state.entity_mut(actor) {
            entity.stats.hp.apply(resolution.actor_hp_delta);
            for application in &resolution.actor_statuses {
                entity.stats.statuses.apply(StatusEffect::new(
                    application.kind,
                    application.duration,
                    application.intensity,
                ));
                events.push(BattleEvent::StatusApplied {
                    entity: actor,
                    kind: application.kind,
                    duration: application.duration,
                });
            }
        }

        events.push(BattleEvent::ActionResolved {
            actor,
            target,
            hit: resolution.hit,
            critical: resolution.critical,
            hp_delta: resolution.hp_delta,
        });

        let defeated = self
            .state
            .entity(target)
            .filter(|e| e.is_defeated())
            .map(|e| e.side);
        if let Some(side) = defeated {
            events.push(BattleEvent::EntityDefeated {
                entity: target,
                side,
            });
        }

        events
    }

    /// Spends one action from the turn budget and locks input for the
    /// animation window.
    fn spend_action(&mut self) -> Vec<BattleEvent> {
        self.state.budget.actions_remaining =
            self.state.budget.actions_remaining.saturating_sub(1);
        self.state.phase = BattlePhase::Animating;
        self.state.selection = None;
        vec![BattleEvent::PhaseChanged {
            phase: BattlePhase::Animating,
        }]
    }

    /// Closes the animation window opened by a move or action.
    ///
    /// Advances the turn when the action budget is spent, otherwise hands
    /// control back to the current actor.
    pub fn finish_animation(&mut self) -> Vec<BattleEvent> {
        if self.state.phase != BattlePhase::Animating {
            return Vec::new();
        }
        self.state.fx = None;

        if let Some(events) = self.check_battle_end() {
            return events;
        }
        if self.state.budget.actions_remaining == 0 {
            return self.advance_turn();
        }

        let side = self
            .state
            .turn_order
            .current()
            .and_then(|id| self.state.entity(id))
            .map(|e| e.side);
        let phase = match side {
            Some(Side::Player) => BattlePhase::AwaitingInput,
            _ => BattlePhase::EnemyTurn,
        };
        self.state.phase = phase;
        vec![BattleEvent::PhaseChanged { phase }]
    }
}

fn fx_color(ability: &Ability) -> [u8; 3] {
    use crate::state::DamageType;
    match ability.effects.first().map(|e| e.damage_type) {
        Some(DamageType::Fire) => [255, 96, 32],
        Some(DamageType::Cold) => [96, 192, 255],
        Some(DamageType::Lightning) => [255, 255, 128],
        Some(DamageType::Poison) => [96, 255, 96],
        Some(DamageType::Arcane) => [192, 96, 255],
        _ => [224, 224, 224],
    }
}
