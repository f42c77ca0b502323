//! Static battle content: ability, enemy, and encounter definitions.
//!
//! The orchestrator reads these registries at battle start and AI decision
//! time and never mutates them. Definitions ship embedded in the binary;
//! `ContentFactory` can also load a modded data directory with the same
//! file layout.

pub mod loaders;

pub use loaders::{
    AbilityRegistry, BalanceConfig, Biome, ContentFactory, EncounterEntry, EncounterTable,
    EncounterTables, EnemyRegistry, EnemyTemplate, PacingConfig,
};
