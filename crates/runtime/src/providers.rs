//! Decision providers for AI-controlled actors.

use async_trait::async_trait;
use battle_core::{ActionSelection, BattleState, EntityId, Intent, ScriptedStrategy, Strategy};
use battle_content::AbilityRegistry;

/// Raw commands arriving from the input layer for the active player actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Select or toggle an action kind.
    Select(ActionSelection),
    /// Click a tile.
    Tile { x: i32, y: i32 },
}

/// Supplies the intent for an AI-controlled actor's turn.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    async fn provide_intent(
        &self,
        state: &BattleState,
        actor: EntityId,
        abilities: &AbilityRegistry,
    ) -> Intent;
}

/// Wraps a synchronous core [`Strategy`] as a provider.
pub struct StrategyProvider<S> {
    strategy: S,
}

impl<S> StrategyProvider<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }
}

impl Default for StrategyProvider<ScriptedStrategy> {
    fn default() -> Self {
        Self::new(ScriptedStrategy)
    }
}

#[async_trait]
impl<S: Strategy + Send + Sync> IntentProvider for StrategyProvider<S> {
    async fn provide_intent(
        &self,
        state: &BattleState,
        actor: EntityId,
        abilities: &AbilityRegistry,
    ) -> Intent {
        let intent = self.strategy.select_intent(state, actor, abilities);
        tracing::debug!(?actor, ?intent, "ai intent selected");
        intent
    }
}
