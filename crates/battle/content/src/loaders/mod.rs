//! Data file loaders.

mod abilities;
mod config;
mod encounters;
mod enemies;
mod factory;

pub use abilities::AbilityRegistry;
pub use config::{BalanceConfig, PacingConfig};
pub use encounters::{Biome, EncounterEntry, EncounterTable, EncounterTables};
pub use enemies::{EnemyRegistry, EnemyTemplate};
pub use factory::ContentFactory;
