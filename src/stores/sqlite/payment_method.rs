//! Implements a SQLite backed payment method store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::Session,
    db::{CreateTable, MapRow},
    models::{DatabaseId, MethodName, PaymentMethod},
    stores::PaymentMethodStore,
};

/// Creates and retrieves payment methods to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SqlitePaymentMethodStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePaymentMethodStore {
    /// Create a new payment method store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl PaymentMethodStore for SqlitePaymentMethodStore {
    /// Create a payment method in the database.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] unless `actor` is an admin, or
    /// [Error::DuplicateName] if the name already exists.
    fn create(&self, actor: &Session, name: MethodName) -> Result<PaymentMethod, Error> {
        actor.require_admin()?;

        let connection = self.connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO payment_methods (name) VALUES (?1)",
                (name.as_ref(),),
            )
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

        Ok(PaymentMethod { id, name })
    }

    /// Retrieve the payment method with `method_id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such payment method.
    fn get(&self, method_id: DatabaseId) -> Result<PaymentMethod, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT method_id, name FROM payment_methods WHERE method_id = :id")?
            .query_row(&[(":id", &method_id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve the payment method with the exact name `name`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such payment method.
    fn get_by_name(&self, name: &str) -> Result<PaymentMethod, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT method_id, name FROM payment_methods WHERE name = :name")?
            .query_row(&[(":name", &name)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all payment methods in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<PaymentMethod>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT method_id, name FROM payment_methods ORDER BY method_id ASC")?
            .query_map([], Self::map_row)?
            .map(|maybe_method| maybe_method.map_err(|error| error.into()))
            .collect()
    }
}

impl CreateTable for SqlitePaymentMethodStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS payment_methods (
                method_id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqlitePaymentMethodStore {
    type ReturnType = PaymentMethod;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = MethodName::new_unchecked(&raw_name);

        Ok(Self::ReturnType { id, name })
    }
}
