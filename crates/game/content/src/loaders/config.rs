//! Match configuration loader.

use std::path::Path;

use fight_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for match rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`GameConfig`] from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML at {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)?;
        if config.rounds_to_win == 0 {
            anyhow::bail!("rounds_to_win must be at least 1");
        }
        if config.block_damage_percent > 100 {
            anyhow::bail!(
                "block_damage_percent must be within 0..=100, got {}",
                config.block_damage_percent
            );
        }
        Ok(config)
    }
}
