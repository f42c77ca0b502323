//! The battle session: drives one battle from initiative to outcome.
//!
//! The session owns the [`BattleState`] and is the only writer. Player
//! commands arrive over an mpsc channel, AI decisions come from an
//! [`IntentProvider`], and every engine mutation is published to a
//! broadcast channel for the rendering layer. All animation waits suspend
//! through the [`Pacer`], and a watch-based shutdown flag makes
//! cancellation safe at every suspension point.

use std::time::Duration;

use battle_core::{
    AbilityOracle, BattleEngine, BattleEvent, BattlePhase, BattleState, EntityId, Intent,
    Position,
};
use battle_content::{AbilityRegistry, PacingConfig};
use tokio::sync::{broadcast, mpsc, watch};

use crate::error::SessionError;
use crate::pacing::Pacer;
use crate::providers::{IntentProvider, PlayerCommand};

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    /// Cancelled mid-battle (quit to menu, restart). Not a failure.
    Aborted,
}

/// One running battle.
pub struct BattleSession<P: Pacer> {
    state: BattleState,
    abilities: AbilityRegistry,
    pacing: PacingConfig,
    ai: Box<dyn IntentProvider>,
    commands: mpsc::Receiver<PlayerCommand>,
    events: broadcast::Sender<BattleEvent>,
    shutdown: watch::Receiver<bool>,
    pacer: P,
}

impl<P: Pacer> BattleSession<P> {
    /// Builds a session around a staged battle state.
    ///
    /// Returns the session plus the event receiver for the rendering
    /// layer; further receivers come from `subscribe`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: BattleState,
        abilities: AbilityRegistry,
        pacing: PacingConfig,
        ai: Box<dyn IntentProvider>,
        commands: mpsc::Receiver<PlayerCommand>,
        shutdown: watch::Receiver<bool>,
        pacer: P,
    ) -> (Self, broadcast::Receiver<BattleEvent>) {
        let (events, receiver) = broadcast::channel(256);
        (
            Self {
                state,
                abilities,
                pacing,
                ai,
                commands,
                events,
                shutdown,
                pacer,
            },
            receiver,
        )
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Runs the battle to its outcome.
    ///
    /// Consumes the session; an aborted battle leaves no partial
    /// resolution behind, so the next battle always starts from fresh
    /// state.
    pub async fn run(mut self) -> Result<BattleOutcome, SessionError> {
        tracing::info!(
            combatants = self.state.entities.len(),
            "battle session starting"
        );
        let opening = BattleEngine::new(&mut self.state).start()?;
        if self.publish_and_pace(opening).await {
            return Ok(self.abort());
        }

        loop {
            if *self.shutdown.borrow() {
                return Ok(self.abort());
            }

            match self.state.phase {
                BattlePhase::Victory => {
                    tracing::info!("battle won");
                    return Ok(BattleOutcome::Victory);
                }
                BattlePhase::Defeat => {
                    tracing::info!("battle lost");
                    return Ok(BattleOutcome::Defeat);
                }
                BattlePhase::Init => {
                    tracing::warn!("session loop reached Init phase; aborting");
                    return Ok(self.abort());
                }
                BattlePhase::Animating => {
                    if self.settle().await {
                        return Ok(self.abort());
                    }
                }
                BattlePhase::AwaitingInput => {
                    if self.turn_exhausted() {
                        if self.advance().await {
                            return Ok(self.abort());
                        }
                        continue;
                    }
                    let command = tokio::select! {
                        _ = self.shutdown.changed() => return Ok(self.abort()),
                        command = self.commands.recv() => command,
                    };
                    let Some(command) = command else {
                        return Err(SessionError::InputClosed);
                    };
                    if self.apply_player_command(command).await {
                        return Ok(self.abort());
                    }
                }
                BattlePhase::EnemyTurn => {
                    if self.turn_exhausted() {
                        if self.advance().await {
                            return Ok(self.abort());
                        }
                        continue;
                    }
                    let Some(actor) = self.state.turn_order.current() else {
                        if self.advance().await {
                            return Ok(self.abort());
                        }
                        continue;
                    };
                    let intent = self
                        .ai
                        .provide_intent(&self.state, actor, &self.abilities)
                        .await;
                    if self.apply_intent(actor, intent).await {
                        return Ok(self.abort());
                    }
                }
            }
        }
    }

    fn turn_exhausted(&self) -> bool {
        self.state.budget.actions_remaining == 0 && self.state.budget.has_moved
    }

    /// Drops in-flight presentation state so nothing leaks past the abort.
    fn abort(mut self) -> BattleOutcome {
        self.state.fx = None;
        self.state.popups.clear();
        tracing::info!("battle session aborted");
        BattleOutcome::Aborted
    }

    async fn apply_player_command(&mut self, command: PlayerCommand) -> bool {
        let events = {
            let mut engine = BattleEngine::new(&mut self.state);
            match command {
                PlayerCommand::Select(selection) => engine.select_action(selection),
                PlayerCommand::Tile { x, y } => {
                    engine.handle_tile_interaction(x, y, &self.abilities)
                }
            }
        };
        if self.publish_and_pace(events).await {
            return true;
        }
        self.settle().await
    }

    async fn apply_intent(&mut self, actor: EntityId, intent: Intent) -> bool {
        match intent {
            Intent::CastSpell { ability, target } => {
                // A dangling ability id falls back to a plain attack so the
                // turn still does something.
                match self.abilities.ability(ability).cloned() {
                    Some(ability) => {
                        let events = BattleEngine::new(&mut self.state)
                            .perform_ability(actor, &ability, target);
                        if self.publish_and_pace(events).await || self.settle().await {
                            return true;
                        }
                    }
                    None => {
                        tracing::warn!(%ability, "unknown ability id from ai; attacking instead");
                        if self.attack(actor, target).await {
                            return true;
                        }
                    }
                }
            }
            Intent::Advance {
                destination,
                then_attack,
            } => {
                let events = BattleEngine::new(&mut self.state).perform_move(actor, destination);
                if self.publish_and_pace(events).await || self.settle().await {
                    return true;
                }
                if let Some(target) = then_attack {
                    if self.attack(actor, target).await {
                        return true;
                    }
                }
            }
            Intent::Attack { target } => {
                if self.attack(actor, target).await {
                    return true;
                }
            }
            Intent::Pass => {}
        }
        self.end_ai_turn(actor).await
    }

    async fn attack(&mut self, actor: EntityId, target: Position) -> bool {
        let events = BattleEngine::new(&mut self.state).perform_attack(actor, target);
        if self.publish_and_pace(events).await {
            return true;
        }
        self.settle().await
    }

    /// Ends the AI actor's turn if it is somehow still up.
    async fn end_ai_turn(&mut self, actor: EntityId) -> bool {
        if self.state.phase == BattlePhase::EnemyTurn
            && self.state.turn_order.current() == Some(actor)
        {
            let events = BattleEngine::new(&mut self.state).end_turn();
            return self.publish_and_pace(events).await;
        }
        false
    }

    async fn advance(&mut self) -> bool {
        let events = BattleEngine::new(&mut self.state).advance_turn();
        self.publish_and_pace(events).await
    }

    /// Plays out animation windows until control returns to an actor.
    async fn settle(&mut self) -> bool {
        while self.state.phase == BattlePhase::Animating {
            if self.pace(self.pacing.action_ms).await {
                return true;
            }
            let events = BattleEngine::new(&mut self.state).finish_animation();
            if self.publish_and_pace(events).await {
                return true;
            }
        }
        false
    }

    /// Publishes a batch of events and paces their animation time.
    ///
    /// Returns true when cancelled mid-pace.
    async fn publish_and_pace(&mut self, events: Vec<BattleEvent>) -> bool {
        let mut delay_ms = 0u64;
        for event in &events {
            match event {
                BattleEvent::Moved { path, .. } => {
                    delay_ms += self.pacing.move_step_ms * path.len().saturating_sub(1) as u64;
                }
                BattleEvent::TurnStarted { .. } => {
                    delay_ms += self.pacing.turn_advance_ms;
                }
                _ => {}
            }
            // A lagged or absent renderer is its own problem.
            let _ = self.events.send(event.clone());
        }

        if delay_ms > 0 {
            self.state.expire_popups(delay_ms as u32);
            return self.pace(delay_ms).await;
        }
        false
    }

    /// One cancellable suspension point.
    async fn pace(&mut self, ms: u64) -> bool {
        if *self.shutdown.borrow() {
            return true;
        }
        tokio::select! {
            _ = self.shutdown.changed() => true,
            _ = self.pacer.pace(Duration::from_millis(ms)) => false,
        }
    }
}
