//! Turn lifecycle: advancing the order, ticking effects, ending the battle.

use crate::state::{BattlePhase, EntityId, Popup, Side, TurnBudget};

use super::{BattleEngine, BattleEvent};

impl<'a> BattleEngine<'a> {
    /// Moves to the next non-defeated entity in initiative order.
    ///
    /// Checks for a finished battle first; skips defeated entities without
    /// removing them from the order; bumps the round and ticks terrain
    /// effects whenever the index wraps.
    pub fn advance_turn(&mut self) -> Vec<BattleEvent> {
        if self.state.phase.is_terminal() {
            return Vec::new();
        }
        if let Some(events) = self.check_battle_end() {
            return events;
        }

        let mut events = Vec::new();
        let len = self.state.turn_order.len();
        if len == 0 {
            return events;
        }
        // One full lap is enough: check_battle_end above guarantees at
        // least one living entity per side remains.
        for _ in 0..len {
            self.state.turn_order.index = (self.state.turn_order.index + 1) % len;
            if self.state.turn_order.index == 0 {
                self.state.round += 1;
                self.state.grid.tick_effects();
                events.push(BattleEvent::RoundStarted {
                    round: self.state.round,
                });
            }

            let Some(candidate) = self.state.turn_order.current() else {
                continue;
            };
            let alive = self
                .state
                .entity(candidate)
                .map(|e| e.is_alive())
                .unwrap_or(false);
            if !alive {
                continue;
            }

            events.extend(self.begin_turn(candidate));
            // Start-of-turn ticks may have killed the new actor; if so the
            // begin_turn events already contain the follow-up advance.
            return events;
        }

        // Everyone defeated at once; players lose the mutual wipe.
        events.extend(self.enter_terminal(BattlePhase::Defeat));
        events
    }

    /// Opens an entity's turn: status tick, terrain tick, budget reset.
    pub(super) fn begin_turn(&mut self, id: EntityId) -> Vec<BattleEvent> {
        let mut events = vec![BattleEvent::TurnStarted { entity: id }];

        // Status effects tick at the start of the owner's own turn:
        // periodic HP first, then exactly one duration decrement.
        let tick = self
            .state
            .entity(id)
            .map(|e| (e.stats.statuses.periodic_hp_delta(), e.position));
        if let Some((delta, position)) = tick {
            if delta != 0 {
                if let Some(entity) = self.state.entity_mut(id) {
                    entity.stats.hp.apply(delta);
                }
                let popup = if delta < 0 {
                    Popup::damage((-delta) as u32, "status", false, position)
                } else {
                    Popup::heal(delta as u32, position)
                };
                self.state.popups.push(popup);
            }
            let expired = self
                .state
                .entity_mut(id)
                .map(|e| e.stats.statuses.tick_down())
                .unwrap_or_default();
            for kind in expired {
                events.push(BattleEvent::StatusExpired { entity: id, kind });
            }
        }

        // Terrain hazard under the actor's feet, before it acts.
        let hazard = self
            .state
            .entity(id)
            .and_then(|e| self.state.grid.cell(e.position))
            .and_then(|c| c.effect);
        if let Some(effect) = hazard {
            let delta = effect.kind.entry_hp_delta(effect.magnitude);
            if delta != 0 {
                let mut position = None;
                if let Some(entity) = self.state.entity_mut(id) {
                    entity.stats.hp.apply(delta);
                    position = Some(entity.position);
                }
                if let Some(position) = position {
                    let popup = if delta < 0 {
                        Popup::damage((-delta) as u32, effect.kind.to_string(), false, position)
                    } else {
                        Popup::heal(delta as u32, position)
                    };
                    self.state.popups.push(popup);
                }
                events.push(BattleEvent::TileHazard {
                    entity: id,
                    kind: effect.kind,
                    hp_delta: delta,
                });
            }
        }

        // The ticks above may have finished the actor off.
        let actor = self.state.entity(id);
        let (alive, side, stunned, rooted, max_actions) = match actor {
            Some(e) => (
                e.is_alive(),
                e.side,
                e.stats.statuses.blocks_action(),
                e.stats.statuses.blocks_movement(),
                e.stats.max_actions,
            ),
            None => return events,
        };

        if !alive {
            events.push(BattleEvent::EntityDefeated { entity: id, side });
            events.extend(self.advance_turn());
            return events;
        }

        self.state.budget = TurnBudget {
            has_moved: rooted,
            actions_remaining: if stunned { 0 } else { max_actions },
        };
        self.state.selection = None;
        let phase = match side {
            Side::Player => BattlePhase::AwaitingInput,
            _ => BattlePhase::EnemyTurn,
        };
        self.state.phase = phase;
        events.push(BattleEvent::PhaseChanged { phase });
        events
    }

    /// Ends the current turn regardless of remaining budget.
    pub fn end_turn(&mut self) -> Vec<BattleEvent> {
        if self.state.phase.is_terminal() || self.state.phase == BattlePhase::Init {
            return Vec::new();
        }
        self.advance_turn()
    }

    /// Detects a finished battle; returns the terminal events when one
    /// side has no living entities left.
    pub(super) fn check_battle_end(&mut self) -> Option<Vec<BattleEvent>> {
        if self.state.side_defeated(Side::Player) {
            Some(self.enter_terminal(BattlePhase::Defeat))
        } else if self.state.side_defeated(Side::Enemy) {
            Some(self.enter_terminal(BattlePhase::Victory))
        } else {
            None
        }
    }

    fn enter_terminal(&mut self, phase: BattlePhase) -> Vec<BattleEvent> {
        self.state.phase = phase;
        vec![
            BattleEvent::PhaseChanged { phase },
            BattleEvent::BattleEnded {
                victory: phase == BattlePhase::Victory,
            },
        ]
    }
}
