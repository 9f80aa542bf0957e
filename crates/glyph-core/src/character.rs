//! Concrete sheet entity types.
//!
//! A [`Character`] owns every collection a reference can land in. The
//! collections are searched in a fixed priority order when resolving a
//! name: attributes, skills, assets, injuries, illnesses, mutations,
//! fate cards. Skills additionally own [`Ability`] children, which keep
//! an owner back-reference so nested resolution can climb back up to
//! the character.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityRef, Value};
use crate::resolve::{EntityLookup, TryResolve, search_collections};

/// A named, leveled sheet item: an attribute, asset, injury, illness,
/// mutation, or fate card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rated {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Base level.
    pub level: i64,
    /// Level after situational modifiers, if tracked separately.
    pub modified_level: Option<i64>,
    /// Owning entity, if embedded in another document.
    pub owner: Option<EntityId>,
    /// Free-form nested properties for path lookup.
    pub properties: HashMap<String, Value>,
}

impl Rated {
    /// Create a rated item with a fresh ID and no modifiers.
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            level,
            modified_level: None,
            owner: None,
            properties: HashMap::new(),
        }
    }

    /// Set the modified level.
    pub fn with_modified_level(mut self, modified_level: i64) -> Self {
        self.modified_level = Some(modified_level);
        self
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef {
            id: self.id,
            name: self.name.clone(),
            level: Some(self.level),
            modified_level: self.modified_level,
        }
    }
}

impl TryResolve for Rated {
    fn name(&self) -> &str {
        &self.name
    }

    fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    fn reference_value(&self) -> Value {
        Value::Entity(self.entity_ref())
    }

    fn properties(&self) -> Option<&HashMap<String, Value>> {
        Some(&self.properties)
    }
}

/// A leveled ability attached to a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Base level.
    pub level: i64,
    /// Level after situational modifiers, if tracked separately.
    pub modified_level: Option<i64>,
    /// The skill this ability belongs to.
    pub owner: Option<EntityId>,
    /// Free-form nested properties for path lookup.
    pub properties: HashMap<String, Value>,
}

impl Ability {
    /// Create an ability with a fresh ID and no owner.
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            level,
            modified_level: None,
            owner: None,
            properties: HashMap::new(),
        }
    }
}

impl TryResolve for Ability {
    fn name(&self) -> &str {
        &self.name
    }

    fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    fn reference_value(&self) -> Value {
        Value::Entity(EntityRef {
            id: self.id,
            name: self.name.clone(),
            level: Some(self.level),
            modified_level: self.modified_level,
        })
    }

    fn properties(&self) -> Option<&HashMap<String, Value>> {
        Some(&self.properties)
    }
}

/// A leveled skill owning zero or more abilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Base level.
    pub level: i64,
    /// Level after situational modifiers, if tracked separately.
    pub modified_level: Option<i64>,
    /// The character this skill belongs to.
    pub owner: Option<EntityId>,
    /// Abilities attached to this skill.
    pub abilities: Vec<Ability>,
    /// Free-form nested properties for path lookup.
    pub properties: HashMap<String, Value>,
}

impl Skill {
    /// Create a skill with a fresh ID, no owner, and no abilities.
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            level,
            modified_level: None,
            owner: None,
            abilities: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Attach an ability, wiring its owner back-reference to this skill.
    pub fn add_ability(&mut self, mut ability: Ability) -> EntityId {
        ability.owner = Some(self.id);
        let id = ability.id;
        self.abilities.push(ability);
        id
    }
}

impl TryResolve for Skill {
    fn name(&self) -> &str {
        &self.name
    }

    fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    fn reference_value(&self) -> Value {
        Value::Entity(EntityRef {
            id: self.id,
            name: self.name.clone(),
            level: Some(self.level),
            modified_level: self.modified_level,
        })
    }

    fn resolve_reference(
        &self,
        comparable_name: &str,
        property_path: Option<&str>,
    ) -> Option<Value> {
        let abilities: Vec<&dyn TryResolve> =
            self.abilities.iter().map(|a| a as &dyn TryResolve).collect();
        search_collections(&[&abilities], comparable_name, property_path)
    }

    fn properties(&self) -> Option<&HashMap<String, Value>> {
        Some(&self.properties)
    }
}

/// A character sheet: the top-level searchable entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Unique identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Attributes (searched first).
    pub attributes: Vec<Rated>,
    /// Learned skills.
    pub skills: Vec<Skill>,
    /// Possessions and advantages.
    pub assets: Vec<Rated>,
    /// Current injuries.
    pub injuries: Vec<Rated>,
    /// Current illnesses.
    pub illnesses: Vec<Rated>,
    /// Mutations.
    pub mutations: Vec<Rated>,
    /// Fate cards (searched last).
    pub fate_cards: Vec<Rated>,
    /// Free-form nested properties for path lookup.
    pub properties: HashMap<String, Value>,
}

impl Character {
    /// Create an empty character sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            attributes: Vec::new(),
            skills: Vec::new(),
            assets: Vec::new(),
            injuries: Vec::new(),
            illnesses: Vec::new(),
            mutations: Vec::new(),
            fate_cards: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Attach a skill, wiring its owner back-reference to this character.
    pub fn add_skill(&mut self, mut skill: Skill) -> EntityId {
        skill.owner = Some(self.id);
        let id = skill.id;
        self.skills.push(skill);
        id
    }

    /// Attach an attribute.
    pub fn add_attribute(&mut self, mut attribute: Rated) -> EntityId {
        attribute.owner = Some(self.id);
        let id = attribute.id;
        self.attributes.push(attribute);
        id
    }

    /// Attach an asset.
    pub fn add_asset(&mut self, mut asset: Rated) -> EntityId {
        asset.owner = Some(self.id);
        let id = asset.id;
        self.assets.push(asset);
        id
    }
}

impl TryResolve for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_reference(
        &self,
        comparable_name: &str,
        property_path: Option<&str>,
    ) -> Option<Value> {
        let attributes: Vec<&dyn TryResolve> =
            self.attributes.iter().map(|r| r as &dyn TryResolve).collect();
        let skills: Vec<&dyn TryResolve> =
            self.skills.iter().map(|s| s as &dyn TryResolve).collect();
        let assets: Vec<&dyn TryResolve> =
            self.assets.iter().map(|r| r as &dyn TryResolve).collect();
        let injuries: Vec<&dyn TryResolve> =
            self.injuries.iter().map(|r| r as &dyn TryResolve).collect();
        let illnesses: Vec<&dyn TryResolve> =
            self.illnesses.iter().map(|r| r as &dyn TryResolve).collect();
        let mutations: Vec<&dyn TryResolve> =
            self.mutations.iter().map(|r| r as &dyn TryResolve).collect();
        let fate_cards: Vec<&dyn TryResolve> =
            self.fate_cards.iter().map(|r| r as &dyn TryResolve).collect();
        // Priority order is load-bearing: entities in different
        // collections may share a lowercase name.
        search_collections(
            &[
                &attributes,
                &skills,
                &assets,
                &injuries,
                &illnesses,
                &mutations,
                &fate_cards,
            ],
            comparable_name,
            property_path,
        )
    }

    fn properties(&self) -> Option<&HashMap<String, Value>> {
        Some(&self.properties)
    }
}

impl EntityLookup for Character {
    fn entity(&self, id: EntityId) -> Option<&dyn TryResolve> {
        if self.id == id {
            return Some(self);
        }
        for skill in &self.skills {
            if skill.id == id {
                return Some(skill);
            }
            for ability in &skill.abilities {
                if ability.id == id {
                    return Some(ability);
                }
            }
        }
        self.attributes
            .iter()
            .chain(&self.assets)
            .chain(&self.injuries)
            .chain(&self.illnesses)
            .chain(&self.mutations)
            .chain(&self.fate_cards)
            .find(|r| r.id == id)
            .map(|r| r as &dyn TryResolve)
    }
}
