//! Runtime error types.

use battle_core::BattleSetupError;

/// Errors surfaced by a battle session.
///
/// Mid-battle conditions never error: invalid input is ignored by the
/// engine, and cancellation is a normal outcome, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("battle setup failed: {0}")]
    Setup(#[from] BattleSetupError),

    #[error("player input channel closed while awaiting a command")]
    InputClosed,
}
