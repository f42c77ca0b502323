//! Animation pacing as explicit suspension points.
//!
//! The engine never sleeps; every animation window (move steps, cast
//! windup, turn advance) suspends through a [`Pacer`] so the rendering
//! layer can play its visuals before the next logical step. Tests swap in
//! [`InstantPacer`] and run whole battles without touching the wall clock.

use std::time::Duration;

use async_trait::async_trait;

/// A source of animation delays.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspends for the given animation window.
    async fn pace(&self, duration: Duration);
}

/// Real delays via the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pace(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// No delays at all; yields once so cancellation still gets a look in.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pace(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
