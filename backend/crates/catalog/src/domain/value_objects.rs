//! Value Objects

use std::fmt;

use thiserror::Error;

/// Names must be longer than this after trimming
pub const MIN_ITEM_NAME_EXCLUSIVE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemNameError {
    #[error("Item name must be longer than {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Trimmed item name, more than three characters long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemNameError> {
        let trimmed = raw.as_ref().trim();
        let actual = trimmed.chars().count();
        if actual <= MIN_ITEM_NAME_EXCLUSIVE {
            return Err(ItemNameError::TooShort {
                min: MIN_ITEM_NAME_EXCLUSIVE,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
