use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every sheet entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A lightweight snapshot of a resolved entity.
///
/// Reference resolution hands these out instead of borrows so a
/// [`Value`] stays self-contained. The optional levels carry the
/// numeric rating of leveled entities (skills, attributes, abilities)
/// for formula substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    /// The referenced entity's ID.
    pub id: EntityId,
    /// The referenced entity's display name.
    pub name: String,
    /// Base level, if the entity is leveled.
    pub level: Option<i64>,
    /// Level after situational modifiers, if tracked separately.
    pub modified_level: Option<i64>,
}

impl EntityRef {
    /// The level to use in numeric contexts: modified if present, else base.
    pub fn effective_level(&self) -> Option<i64> {
        self.modified_level.or(self.level)
    }
}

/// A value produced by reference resolution or stored as an entity property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A text value.
    String(String),
    /// A 64-bit signed integer value.
    Integer(i64),
    /// A 64-bit floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A string-keyed map of values.
    Map(HashMap<String, Value>),
    /// A reference to another sheet entity.
    Entity(EntityRef),
}

impl Value {
    /// The value as a floating-point number, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(_) => write!(f, "{{...}}"),
            Self::Entity(e) => write!(f, "{}", e.name),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_shows_short_form() {
        let id = EntityId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn effective_level_prefers_modified() {
        let entity = EntityRef {
            id: EntityId::new(),
            name: "Sword".to_string(),
            level: Some(3),
            modified_level: Some(5),
        };
        assert_eq!(entity.effective_level(), Some(5));
    }

    #[test]
    fn effective_level_falls_back_to_base() {
        let entity = EntityRef {
            id: EntityId::new(),
            name: "Sword".to_string(),
            level: Some(3),
            modified_level: None,
        };
        assert_eq!(entity.effective_level(), Some(3));
    }

    #[test]
    fn value_as_f64() {
        assert_eq!(Value::Integer(4).as_f64(), Some(4.0));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::from("four").as_f64(), None);
        assert_eq!(Value::Boolean(true).as_f64(), None);
    }

    #[test]
    fn value_serialization_is_untagged() {
        let value = Value::List(vec![Value::Integer(1), Value::from("two")]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"two"]"#);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::Integer(7).to_string(), "7");
        assert_eq!(
            Value::List(vec![Value::Integer(1), Value::Integer(2)]).to_string(),
            "[1, 2]"
        );
    }
}
