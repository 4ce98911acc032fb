//! Item kind tagged union.
//!
//! Books and board games live in separate tables with separate metadata,
//! but requests reference either kind through an `(item_type, item_id)`
//! pair. `ItemType` is the closed set of valid discriminants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Kind of a shareable catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Book,
    BoardGame,
}

impl ItemType {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Book => "book",
            ItemType::BoardGame => "boardgame",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(ItemType::Book),
            "boardgame" => Ok(ItemType::BoardGame),
            other => Err(format!("unknown item type '{other}'")),
        }
    }
}

// Used by sqlx's `#[sqlx(try_from = "String")]`, which needs a real error
// type on the conversion.
impl TryFrom<String> for ItemType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(CoreError::Validation)
    }
}
