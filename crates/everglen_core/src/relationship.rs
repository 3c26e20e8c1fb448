//! Relationships between characters.

use crate::{CharacterId, RelationshipId};
use serde::{Deserialize, Serialize};

/// A relation between two characters.
///
/// Stored with a subject/object direction, but consumers treat the pair as
/// symmetric: a relationship belongs to both characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// Identifier assigned at creation
    pub id: RelationshipId,
    /// First character of the pair
    pub subject: CharacterId,
    /// Second character of the pair
    pub object: CharacterId,
    /// Free-text label ("boyfriends", "rivals", ...)
    pub relation: String,
}

impl Relationship {
    /// Whether the given character takes part in this relationship.
    pub fn involves(&self, character: CharacterId) -> bool {
        self.subject == character || self.object == character
    }
}

/// Fields needed to create or overwrite a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewRelationship {
    /// First character of the pair
    pub subject: CharacterId,
    /// Second character of the pair
    pub object: CharacterId,
    /// Free-text label
    pub relation: String,
}
