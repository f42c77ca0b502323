//! Per-biome encounter tables sampled at battle start.

use anyhow::Context;
use battle_core::DiceRng;
use serde::{Deserialize, Serialize};

/// Overworld biome supplying the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Forest,
    Cavern,
    Ruins,
    Swamp,
}

/// One weighted row of an encounter table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    /// Enemy template id.
    pub template: String,
    pub weight: u32,
    /// Spawned group size range, inclusive.
    pub count_min: u32,
    pub count_max: u32,
}

/// Encounter table for one biome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterTable {
    pub biome: Biome,
    pub entries: Vec<EncounterEntry>,
}

impl EncounterTable {
    /// Weighted pick of one entry plus a rolled group size.
    ///
    /// Returns `None` for an empty or zero-weight table.
    pub fn sample(&self, rng: &mut DiceRng) -> Option<(&EncounterEntry, u32)> {
        let total: u32 = self.entries.iter().map(|e| e.weight).sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.roll_die(total);
        for entry in &self.entries {
            if pick <= entry.weight {
                let spread = entry.count_max.saturating_sub(entry.count_min);
                let count = if spread == 0 {
                    entry.count_min
                } else {
                    entry.count_min + rng.roll_die(spread + 1) - 1
                };
                return Some((entry, count.max(1)));
            }
            pick -= entry.weight;
        }
        None
    }
}

/// All encounter tables, keyed by biome.
#[derive(Debug, Clone)]
pub struct EncounterTables {
    tables: Vec<EncounterTable>,
}

impl EncounterTables {
    /// Loads the tables from embedded RON data.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_ron(include_str!("../../data/encounters.ron"))
    }

    /// Parses tables from RON text.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let tables: Vec<EncounterTable> =
            ron::from_str(text).context("failed to parse encounters RON")?;
        Ok(Self { tables })
    }

    pub fn table(&self, biome: Biome) -> Option<&EncounterTable> {
        self.tables.iter().find(|t| t.biome == biome)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
