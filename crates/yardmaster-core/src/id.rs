use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an opaque string identifier. Document ids come from the store
/// as strings, so these are cheap to clone and compare but never parsed.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Identifies a station, staging area, or off-layout destination.
    LocationId
}

string_id! {
    /// Identifies an industry (a customer, yard, or passenger facility).
    IndustryId
}

string_id! {
    /// Identifies a track. Unique only within its owning industry.
    TrackId
}

string_id! {
    /// Identifies a piece of rolling stock.
    CarId
}
