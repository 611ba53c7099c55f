//! This file defines expense categories and their validated name type.

use std::fmt::Display;

use crate::{Error, models::DatabaseId};

/// The name of a category. Must be a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create and validate a category name.
    ///
    /// The name is trimmed of surrounding whitespace.
    ///
    /// # Errors
    /// Returns an [Error::InvalidValue] if `name` is empty or all whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::InvalidValue(
                "category name cannot be empty".to_owned(),
            ));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure `name` is non-empty, e.g. because it was read
    /// back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category that expenses can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The unique name of the category.
    pub name: CategoryName,
}
