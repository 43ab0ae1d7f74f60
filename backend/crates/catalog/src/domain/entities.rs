//! Domain Entities

use serde::{Deserialize, Serialize};

/// A catalog item as stored and as served from the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
}
