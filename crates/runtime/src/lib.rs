//! Async driver for battle sessions.
//!
//! `battle-runtime` hosts one battle at a time on tokio: it owns the
//! authoritative [`battle_core::BattleState`], sequences player input and
//! AI turns through the engine, paces animation windows through a
//! swappable [`Pacer`], and broadcasts engine events to the rendering
//! layer. Battle state is deliberately never persisted: a battle does not
//! survive a save/load.

mod error;
mod pacing;
mod providers;
mod session;

pub use error::SessionError;
pub use pacing::{InstantPacer, Pacer, TokioPacer};
pub use providers::{IntentProvider, PlayerCommand, StrategyProvider};
pub use session::{BattleOutcome, BattleSession};

/// Draws a battle seed from host entropy and logs it for reproduction.
///
/// Tests bypass this and seed [`battle_core::DiceRng`] directly.
pub fn draw_session_seed() -> u64 {
    let seed: u64 = rand::random();
    tracing::info!(seed, "battle rng seeded");
    seed
}
