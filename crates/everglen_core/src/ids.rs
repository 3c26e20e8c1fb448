//! Typed identifiers assigned by the persistence gateway.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Raw integer value.
            pub fn get(self) -> i32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::Character`].
    CharacterId
);
entity_id!(
    /// Identifier of a [`crate::Relationship`].
    RelationshipId
);
entity_id!(
    /// Identifier of a [`crate::Series`].
    SeriesId
);
entity_id!(
    /// Identifier of a [`crate::Story`].
    StoryId
);
entity_id!(
    /// Identifier of a [`crate::StoryCharacterLink`].
    LinkId
);
