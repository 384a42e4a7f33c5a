//! Character roster.

use std::collections::BTreeMap;

use fight_core::CharacterConfig;

use crate::error::ContentError;
use crate::loaders::{CharacterLoader, LoadResult};

const BUILTIN_NORMALS: &str = include_str!("../../data/characters/normals.ron");
const BUILTIN_CHARACTERS: &[(&str, &str)] =
    &[("mia", include_str!("../../data/characters/mia.ron"))];

/// Playable characters by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    characters: BTreeMap<String, CharacterConfig>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The characters compiled into the binary.
    pub fn builtin() -> LoadResult<Self> {
        let shared = CharacterLoader::parse_normals(BUILTIN_NORMALS)?;
        let mut roster = Self::new();
        for (id, content) in BUILTIN_CHARACTERS {
            let character = CharacterLoader::parse(content, &shared)
                .map_err(|e| anyhow::anyhow!("Failed to load builtin character '{}': {}", id, e))?;
            roster.insert(character);
        }
        Ok(roster)
    }

    /// Adds or replaces a character.
    pub fn insert(&mut self, character: CharacterConfig) {
        self.characters.insert(character.id.clone(), character);
    }

    pub fn get(&self, id: &str) -> Result<&CharacterConfig, ContentError> {
        self.characters
            .get(id)
            .ok_or_else(|| ContentError::UnknownCharacter { id: id.to_owned() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_roster_has_mia() {
        let roster = Roster::builtin().unwrap();
        assert_eq!(roster.ids().collect::<Vec<_>>(), ["mia"]);
        assert_eq!(roster.get("mia").unwrap().max_health, 100);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let roster = Roster::builtin().unwrap();
        assert_eq!(
            roster.get("sakura"),
            Err(ContentError::UnknownCharacter {
                id: "sakura".to_owned()
            })
        );
    }
}
