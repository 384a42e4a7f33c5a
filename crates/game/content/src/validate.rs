//! Static checks over character tables.
//!
//! The core trusts its tables; everything that would only show up as a
//! silently dead move at runtime is rejected here instead.

use std::collections::BTreeSet;

use fight_core::{CharacterConfig, GameConfig, MoveDefinition};

use crate::error::ContentError;

/// Checks a fully assembled character.
pub fn validate_character(character: &CharacterConfig) -> Result<(), ContentError> {
    let mut names = BTreeSet::new();
    for definition in character.normals.iter().chain(&character.specials) {
        if !names.insert(definition.name.as_str()) {
            return Err(ContentError::DuplicateMove {
                character: character.id.clone(),
                name: definition.name.clone(),
            });
        }
        if definition.active_ticks == 0 {
            return Err(ContentError::NoActiveWindow {
                name: definition.name.clone(),
            });
        }
    }

    for normal in &character.normals {
        if normal.input.is_some() || normal.meter_cost > 0 {
            return Err(ContentError::NormalWithSpecialData {
                character: character.id.clone(),
                name: normal.name.clone(),
            });
        }
    }

    for special in &character.specials {
        validate_special(character, special)?;
    }

    for binding in &character.bindings {
        let bound = character
            .normals
            .iter()
            .any(|definition| definition.name == binding.move_name);
        if !bound {
            return Err(ContentError::UnknownBindingTarget {
                character: character.id.clone(),
                button: binding.button,
                name: binding.move_name.clone(),
            });
        }
    }

    Ok(())
}

fn validate_special(character: &CharacterConfig, special: &MoveDefinition) -> Result<(), ContentError> {
    let Some(sequence) = special.input.as_deref().filter(|sequence| !sequence.is_empty()) else {
        return Err(ContentError::MissingPattern {
            character: character.id.clone(),
            name: special.name.clone(),
        });
    };
    if sequence.len() > GameConfig::HISTORY_CAPACITY {
        return Err(ContentError::PatternTooLong {
            name: special.name.clone(),
            len: sequence.len(),
            capacity: GameConfig::HISTORY_CAPACITY,
        });
    }
    // Specials are only looked up when an attack button is pressed.
    if !sequence.last().is_some_and(|kind| kind.is_attack_button()) {
        return Err(ContentError::PatternWithoutButton {
            name: special.name.clone(),
        });
    }
    if special.meter_cost > character.max_meter {
        return Err(ContentError::Unaffordable {
            character: character.id.clone(),
            name: special.name.clone(),
            cost: special.meter_cost,
            max_meter: character.max_meter,
        });
    }
    Ok(())
}

#[cfg(all(test, feature = "loaders"))]
mod tests {
    use fight_core::{ActionKind, NormalBinding};

    use super::*;
    use crate::loaders::Roster;

    fn mia() -> CharacterConfig {
        Roster::builtin().unwrap().get("mia").unwrap().clone()
    }

    #[test]
    fn builtin_character_is_valid() {
        assert_eq!(validate_character(&mia()), Ok(()));
    }

    #[test]
    fn binding_to_missing_normal_is_rejected() {
        let mut character = mia();
        character.bindings.push(NormalBinding {
            button: ActionKind::Kick,
            with: Some(ActionKind::Back),
            move_name: "sweep".to_owned(),
        });

        let err = validate_character(&character).unwrap_err();
        assert!(matches!(err, ContentError::UnknownBindingTarget { ref name, .. } if name == "sweep"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut character = mia();
        let copy = character.specials[0].clone();
        character.specials.push(copy);

        assert!(matches!(
            validate_character(&character),
            Err(ContentError::DuplicateMove { .. })
        ));
    }

    #[test]
    fn pattern_must_end_on_a_button() {
        let mut character = mia();
        character.specials[0].input = Some(vec![ActionKind::Down, ActionKind::Forward]);

        assert_eq!(
            validate_character(&character),
            Err(ContentError::PatternWithoutButton {
                name: "tide_wave".to_owned()
            })
        );
    }

    #[test]
    fn oversized_pattern_is_rejected() {
        let mut character = mia();
        let mut sequence = vec![ActionKind::Down; GameConfig::HISTORY_CAPACITY];
        sequence.push(ActionKind::Punch);
        character.specials[0].input = Some(sequence);

        assert!(matches!(
            validate_character(&character),
            Err(ContentError::PatternTooLong { len: 11, .. })
        ));
    }

    #[test]
    fn special_above_max_meter_is_rejected() {
        let mut character = mia();
        character.max_meter = 40;

        assert!(matches!(
            validate_character(&character),
            Err(ContentError::Unaffordable { cost: 50, .. })
        ));
    }

    #[test]
    fn normal_with_cost_is_rejected() {
        let mut character = mia();
        character.normals[0].meter_cost = 10;

        assert!(matches!(
            validate_character(&character),
            Err(ContentError::NormalWithSpecialData { .. })
        ));
    }
}
