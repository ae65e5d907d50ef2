//! Strongly-typed ID wrappers
//!
//! Category and transaction ids are both UUIDs; the newtypes keep them from
//! being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Full, unabbreviated form (used where the id must round-trip)
            pub fn to_full_string(&self) -> String {
                self.0.to_string()
            }

            /// Whether this id's short display form starts with `prefix`
            ///
            /// Lets users type the abbreviated id shown in listings.
            pub fn matches_prefix(&self, prefix: &str) -> bool {
                let prefix = prefix.strip_prefix($display_prefix).unwrap_or(prefix);
                !prefix.is_empty() && self.0.simple().to_string().starts_with(&prefix.replace('-', ""))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(CategoryId, "cat-");
define_id!(TransactionId, "txn-");
