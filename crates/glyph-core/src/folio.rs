//! Id-keyed registry of character sheets.

use std::collections::HashMap;

use crate::character::Character;
use crate::entity::EntityId;
use crate::resolve::{EntityLookup, TryResolve};

/// A collection of character sheets, keyed by entity ID.
///
/// The folio exists so owner back-references can be followed across
/// document boundaries: an ability only stores its skill's ID, and the
/// skill only stores its character's ID.
#[derive(Debug, Clone, Default)]
pub struct Folio {
    characters: HashMap<EntityId, Character>,
}

impl Folio {
    /// Create an empty folio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character. Returns its ID.
    pub fn add_character(&mut self, character: Character) -> EntityId {
        let id = character.id;
        self.characters.insert(id, character);
        id
    }

    /// Get a character by ID.
    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.characters.get(&id)
    }

    /// Get a mutable character by ID.
    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    /// Find a character by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        let lower = name.to_lowercase();
        self.characters
            .values()
            .find(|c| c.name.to_lowercase() == lower)
    }

    /// Number of characters in the folio.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Returns true if the folio holds no characters.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Iterate over all characters.
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }
}

impl EntityLookup for Folio {
    fn entity(&self, id: EntityId) -> Option<&dyn TryResolve> {
        self.characters.values().find_map(|c| c.entity(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Skill;

    #[test]
    fn add_and_find() {
        let mut folio = Folio::new();
        let id = folio.add_character(Character::new("Baldur"));
        assert_eq!(folio.len(), 1);
        assert_eq!(folio.character(id).unwrap().name, "Baldur");
        assert_eq!(folio.find_by_name("baldur").unwrap().id, id);
        assert!(folio.find_by_name("loki").is_none());
    }

    #[test]
    fn entity_lookup_crosses_into_nested_documents() {
        let mut character = Character::new("Baldur");
        let skill_id = character.add_skill(Skill::new("Shadow", 3));
        let mut folio = Folio::new();
        let char_id = folio.add_character(character);
        assert_eq!(folio.entity(char_id).unwrap().name(), "Baldur");
        assert_eq!(folio.entity(skill_id).unwrap().name(), "Shadow");
        assert!(folio.entity(EntityId::new()).is_none());
    }

    #[test]
    fn empty_folio() {
        let folio = Folio::new();
        assert!(folio.is_empty());
        assert!(folio.entity(EntityId::new()).is_none());
    }
}
