use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a node in a world's relation graph.
    NodeId
);

string_id!(
    /// Identifier of a situation in a world's timeline.
    SituationId
);

string_id!(
    /// Identifier of a mesh in the shared asset store.
    MeshId
);

string_id!(
    /// Name of a world. Unique within a registry, fixed at creation.
    WorldName
);

/// One world instance in its role as holder of shared meshes.
///
/// Minted per instance, so a world recreated under a closed world's name never
/// shares holds with the closed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HolderId(pub Uuid);

impl HolderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_ids_are_unique() {
        let a = HolderId::new();
        let b = HolderId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_id_is_detected() {
        assert!(NodeId::from("").is_empty());
        assert!(!NodeId::from("n1").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = MeshId::from("cube");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cube\"");
        let back: MeshId = serde_json::from_str("\"cube\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_raw_id() {
        assert_eq!(SituationId::new("s1").to_string(), "s1");
    }
}
