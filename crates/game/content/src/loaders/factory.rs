//! Content factory for loading a data directory.

use std::path::{Path, PathBuf};

use fight_core::GameConfig;

use crate::loaders::{CharacterLoader, ConfigLoader, LoadResult, Roster};

/// Loads all match content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── characters/
///     ├── normals.ron
///     ├── mia.ron
///     └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load match rules from `config.toml`, falling back to the defaults when
    /// the file is absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load every `characters/*.ron` file except the shared `normals.ron`.
    pub fn load_roster(&self) -> LoadResult<Roster> {
        let dir = self.data_dir.join("characters");
        let shared = CharacterLoader::load_normals(&dir.join("normals.ron"))?;

        let mut paths = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "ron")
                    && path.file_stem().is_some_and(|stem| stem != "normals")
            })
            .collect::<Vec<_>>();
        paths.sort();

        let mut roster = Roster::new();
        for path in paths {
            roster.insert(CharacterLoader::load(&path, &shared)?);
        }
        Ok(roster)
    }
}
