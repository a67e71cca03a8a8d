//! Product category enumeration.
//!
//! # Invariants
//! - The member set is closed; storage and wire formats use the upper-case
//!   member name (`"AUTOMOTIVE"`), never a numeric discriminant.
//! - Name parsing is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed set of product classifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Not yet classified.
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    /// Every member, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Returns the canonical member name used for storage and serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
        }
    }

    /// Looks up a member by its canonical name.
    ///
    /// Returns `None` for anything that is not an exact member name.
    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
