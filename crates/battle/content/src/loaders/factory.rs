//! Content factory for building registries from data files.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use super::{AbilityRegistry, BalanceConfig, EncounterTables, EnemyRegistry};

/// Loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── enemies.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a factory pointing at a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn load_abilities(&self) -> anyhow::Result<AbilityRegistry> {
        let path = self.data_dir.join("abilities.ron");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        AbilityRegistry::from_ron(&text)
    }

    pub fn load_enemies(&self) -> anyhow::Result<EnemyRegistry> {
        let path = self.data_dir.join("enemies.ron");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        EnemyRegistry::from_ron(&text)
    }

    pub fn load_encounters(&self) -> anyhow::Result<EncounterTables> {
        let path = self.data_dir.join("encounters.ron");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        EncounterTables::from_ron(&text)
    }

    pub fn load_config(&self) -> anyhow::Result<BalanceConfig> {
        let path = self.data_dir.join("config.toml");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        BalanceConfig::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The embedded defaults must round-trip through the directory loader.
    #[test]
    fn factory_loads_a_data_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("abilities.ron"),
            include_str!("../../data/abilities.ron"),
        )
        .unwrap();
        fs::write(
            dir.path().join("enemies.ron"),
            include_str!("../../data/enemies.ron"),
        )
        .unwrap();
        fs::write(
            dir.path().join("encounters.ron"),
            include_str!("../../data/encounters.ron"),
        )
        .unwrap();
        fs::write(
            dir.path().join("config.toml"),
            include_str!("../../data/config.toml"),
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert!(!factory.load_abilities().unwrap().is_empty());
        assert!(!factory.load_enemies().unwrap().is_empty());
        assert!(!factory.load_encounters().unwrap().is_empty());
        assert!(factory.load_config().unwrap().hp_scale >= 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let factory = ContentFactory::new("/definitely/not/here");
        assert!(factory.load_abilities().is_err());
    }
}
