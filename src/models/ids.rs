//! Strongly-typed ID wrappers for bank accounts and budget items
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Older data files stored bank links as
//! strings, so deserialization accepts either a number or a numeric string;
//! equality is always on the underlying integer.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an ID from a raw integer
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the underlying integer
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// The ID following this one
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(value) => Ok(Self(value)),
                    RawId::Text(text) => text.parse().map_err(|_| {
                        serde::de::Error::custom(format!("invalid identifier: {:?}", text))
                    }),
                }
            }
        }
    };
}

define_id!(BankId, "bank-");
define_id!(BudgetItemId, "item-");
