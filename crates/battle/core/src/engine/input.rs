//! Player input surface.
//!
//! The input layer selects an action kind, then clicks a tile. Selecting
//! the same kind twice toggles it off. Anything invalid (wrong phase,
//! unknown ability, unreachable tile) is silently ignored; no action is
//! consumed and nothing surfaces to the player beyond the tile not
//! highlighting.

use crate::effect::AbilityOracle;
use crate::state::{ActionSelection, BattlePhase, Position};

use super::{BattleEngine, BattleEvent};

impl<'a> BattleEngine<'a> {
    /// Records (or toggles off) the player's pending action selection.
    ///
    /// `Wait` ends the turn immediately; `Potion` resolves immediately;
    /// everything else waits for a tile interaction.
    pub fn select_action(&mut self, selection: ActionSelection) -> Vec<BattleEvent> {
        if self.state.phase != BattlePhase::AwaitingInput {
            return Vec::new();
        }
        let Some(actor) = self.state.turn_order.current() else {
            return Vec::new();
        };

        match selection {
            ActionSelection::Wait => {
                self.state.selection = None;
                self.end_turn()
            }
            ActionSelection::Potion => {
                self.state.selection = None;
                self.use_potion(actor)
            }
            other => {
                if self.state.selection == Some(other) {
                    self.state.selection = None;
                } else {
                    self.state.selection = Some(other);
                }
                Vec::new()
            }
        }
    }

    /// Applies a tile click under the current selection.
    ///
    /// With no selection the click is a no-op: opening the contextual
    /// action menu for an actor's own tile is the input layer's business,
    /// not the resolution core's.
    pub fn handle_tile_interaction(
        &mut self,
        x: i32,
        y: i32,
        abilities: &dyn AbilityOracle,
    ) -> Vec<BattleEvent> {
        if self.state.phase != BattlePhase::AwaitingInput {
            return Vec::new();
        }
        let Some(actor) = self.state.turn_order.current() else {
            return Vec::new();
        };
        let tile = Position::new(x, y);

        let events = match self.state.selection {
            Some(ActionSelection::Move) => self.perform_move(actor, tile),
            Some(ActionSelection::Attack) => self.perform_attack(actor, tile),
            Some(ActionSelection::Cast(id)) => match abilities.ability(id) {
                Some(ability) => self.perform_ability(actor, ability, tile),
                None => Vec::new(),
            },
            Some(ActionSelection::Potion) | Some(ActionSelection::Wait) | None => Vec::new(),
        };

        if !events.is_empty() {
            self.state.selection = None;
        }
        events
    }
}
