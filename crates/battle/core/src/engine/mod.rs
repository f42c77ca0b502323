//! Battle orchestrator: turn scheduling and action execution.
//!
//! [`BattleEngine`] is the authoritative reducer for [`BattleState`]. All
//! mutation flows through it; the rules engine, resolver, and AI stay pure
//! over snapshots. Every public entry point is defensive: invalid input
//! (wrong phase, unreachable tile, dead target) is a silent no-op, never an
//! error. The only hard failure is a malformed setup before battle start.

mod combat;
mod events;
mod input;
mod turns;

pub use events::BattleEvent;

use crate::state::{BattlePhase, BattleState, TurnOrder};

/// Errors possible while constructing a battle; nothing mid-battle fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleSetupError {
    #[error("no schedulable combatants; the turn order would be empty")]
    EmptyTurnOrder,
}

/// Orchestrates one battle over a mutably borrowed [`BattleState`].
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Rolls initiative and opens the first turn.
    ///
    /// Idempotent: calling on an already-started battle does nothing.
    pub fn start(&mut self) -> Result<Vec<BattleEvent>, BattleSetupError> {
        if self.state.phase != BattlePhase::Init {
            return Ok(Vec::new());
        }

        let order = TurnOrder::roll(&self.state.entities, &mut self.state.rng);
        if order.is_empty() {
            return Err(BattleSetupError::EmptyTurnOrder);
        }
        self.state.turn_order = order;
        self.state.round = 1;

        let Some(first) = self.state.turn_order.current() else {
            return Err(BattleSetupError::EmptyTurnOrder);
        };
        let mut events = vec![BattleEvent::RoundStarted { round: 1 }];
        events.extend(self.begin_turn(first));
        Ok(events)
    }

    /// True when the current actor has nothing left to do this turn.
    pub fn turn_exhausted(&self) -> bool {
        self.state.budget.actions_remaining == 0 && self.state.budget.has_moved
    }
}
