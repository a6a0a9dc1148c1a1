//! Typed IDs for ledger entities.
//!
//! A `UnitId` cannot be passed where a `MovementId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh time-ordered (UUID v7) ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

typed_id!(UnitId, "Identifier of a congregation (unit) within the field.");
typed_id!(MovementId, "Identifier of a stored movement.");
typed_id!(UserId, "Identifier of the operator who recorded a movement.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_v7() {
        let first = MovementId::new();
        let second = MovementId::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }

    #[test]
    fn test_id_parse_and_display() {
        let id = UnitId::new();
        let parsed: UnitId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.into_inner(), id.0);
    }

    #[test]
    fn test_id_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let uuid = Uuid::now_v7();
        let json = serde_json::to_string(&UnitId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
