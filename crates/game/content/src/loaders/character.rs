//! Character table loader.
//!
//! A character file only carries what is specific to the character: body,
//! movement and specials. The normal attacks and their button bindings come
//! from a shared set unless the file brings its own.

use std::path::Path;

use fight_core::{CharacterConfig, MoveDefinition, NormalBinding, Rect};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};
use crate::validate::validate_character;

/// Normals and the buttons that select them.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NormalSet {
    pub normals: Vec<MoveDefinition>,
    #[serde(default)]
    pub bindings: Vec<NormalBinding>,
}

/// On-disk shape of a character file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CharacterSpec {
    pub id: String,
    pub name: String,
    pub max_health: u32,
    pub max_meter: u32,
    pub walk_speed: f32,
    pub jump_force: f32,
    pub hurtbox: Rect,
    #[serde(default)]
    pub specials: Vec<MoveDefinition>,
    /// Replaces the shared normal set for this character.
    #[serde(default)]
    pub normals: Option<NormalSet>,
}

impl CharacterSpec {
    /// Combines the spec with `shared` normals into a playable table.
    pub fn assemble(self, shared: &NormalSet) -> CharacterConfig {
        let NormalSet { normals, bindings } = self.normals.unwrap_or_else(|| shared.clone());
        CharacterConfig {
            id: self.id,
            name: self.name,
            max_health: self.max_health,
            max_meter: self.max_meter,
            walk_speed: self.walk_speed,
            jump_force: self.jump_force,
            hurtbox: self.hurtbox,
            normals,
            specials: self.specials,
            bindings,
        }
    }
}

/// Loader for character tables from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    /// Load the shared normal set.
    pub fn load_normals(path: &Path) -> LoadResult<NormalSet> {
        let content = read_file(path)?;
        Self::parse_normals(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse normals RON at {}: {}", path.display(), e))
    }

    pub fn parse_normals(content: &str) -> LoadResult<NormalSet> {
        Ok(ron::from_str(content)?)
    }

    /// Load a character file and assemble it against `shared`.
    pub fn load(path: &Path, shared: &NormalSet) -> LoadResult<CharacterConfig> {
        let content = read_file(path)?;
        Self::parse(&content, shared)
            .map_err(|e| anyhow::anyhow!("Failed to load character at {}: {}", path.display(), e))
    }

    /// Parses, assembles and validates a character.
    pub fn parse(content: &str, shared: &NormalSet) -> LoadResult<CharacterConfig> {
        let spec: CharacterSpec = ron::from_str(content)?;
        let character = spec.assemble(shared);
        validate_character(&character)?;
        Ok(character)
    }
}
