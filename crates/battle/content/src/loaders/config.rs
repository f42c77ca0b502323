//! Balance and pacing configuration loaded from TOML.

use anyhow::Context;
use battle_core::BattleConfig;
use serde::{Deserialize, Serialize};

/// Animation pacing delays, in milliseconds.
///
/// Consumed by the runtime's pacer; the engine itself never sleeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    pub move_step_ms: u64,
    pub action_ms: u64,
    pub turn_advance_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            move_step_ms: 120,
            action_ms: 450,
            turn_advance_ms: 300,
        }
    }
}

/// Tunable balance parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    pub hp_scale: u32,
    pub popup_lifetime_ms: u32,
    pub pacing: PacingConfig,
}

impl BalanceConfig {
    /// Loads the config embedded in the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml(include_str!("../../data/config.toml"))
    }

    /// Parses a config from TOML text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("failed to parse balance config TOML")
    }

    /// Projection into the core engine's config.
    pub fn battle_config(&self) -> BattleConfig {
        BattleConfig {
            hp_scale: self.hp_scale,
            popup_lifetime_ms: self.popup_lifetime_ms,
        }
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            hp_scale: BattleConfig::DEFAULT_HP_SCALE,
            popup_lifetime_ms: BattleConfig::DEFAULT_POPUP_LIFETIME_MS,
            pacing: PacingConfig::default(),
        }
    }
}
