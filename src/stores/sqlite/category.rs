//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::Session,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, DatabaseId},
    stores::CategoryStore,
};

/// Creates and retrieves expense categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SqliteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] unless `actor` is an admin, or
    /// [Error::DuplicateName] if the name already exists.
    fn create(&self, actor: &Session, name: CategoryName) -> Result<Category, Error> {
        actor.require_admin()?;

        let connection = self.connection.lock().unwrap();
        connection
            .execute("INSERT INTO categories (name) VALUES (?1)", (name.as_ref(),))
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateName(name.as_ref().to_owned())
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Ok(Category { id, name })
    }

    /// Retrieve the category with `category_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category.
    fn get(&self, category_id: DatabaseId) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT category_id, name FROM categories WHERE category_id = :id")?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve the category with the exact name `name`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category.
    fn get_by_name(&self, name: &str) -> Result<Category, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT category_id, name FROM categories WHERE name = :name")?
            .query_row(&[(":name", &name)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT category_id, name FROM categories ORDER BY category_id ASC")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SqliteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                category_id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        Ok(Self::ReturnType { id, name })
    }
}
