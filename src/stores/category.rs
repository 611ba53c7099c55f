//! Defines the category store trait.

use crate::{
    Error,
    auth::Session,
    models::{Category, CategoryName, DatabaseId},
};

/// Creates and retrieves expense categories.
pub trait CategoryStore {
    /// Create a new category and add it to the store.
    ///
    /// Only admins may create categories.
    fn create(&self, actor: &Session, name: CategoryName) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseId) -> Result<Category, Error>;

    /// Get a category by its exact name.
    fn get_by_name(&self, name: &str) -> Result<Category, Error>;

    /// Get all categories, ordered by ID.
    fn get_all(&self) -> Result<Vec<Category>, Error>;
}
