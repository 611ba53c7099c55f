//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::Session,
    db::{CreateTable, MapRow},
    models::{PasswordHash, Role, User, UserId},
    stores::UserStore,
};

/// Handles the creation and retrieval of users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    connection: Arc<Mutex<Connection>>,
    hash_cost: u32,
}

impl SqliteUserStore {
    /// Create a new user store that hashes passwords at the default bcrypt
    /// cost.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self::with_cost(connection, PasswordHash::DEFAULT_COST)
    }

    /// Create a new user store with an explicit bcrypt cost.
    ///
    /// Tests use a low cost to keep hashing fast; production code should
    /// use [SqliteUserStore::new].
    pub fn with_cost(connection: Arc<Mutex<Connection>>, hash_cost: u32) -> Self {
        Self {
            connection,
            hash_cost,
        }
    }

    fn insert_user(&self, username: &str, password: &str, role: Role) -> Result<User, Error> {
        let username = username.trim();

        if username.is_empty() {
            return Err(Error::InvalidValue("username cannot be empty".to_owned()));
        }

        let password_hash = PasswordHash::new(password, self.hash_cost)?;

        let connection = self.connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                (username, password_hash.to_string(), role),
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateName(username.to_owned())
                }
                error => error.into(),
            })?;

        let id = UserId::new(connection.last_insert_rowid());

        Ok(User::new(id, username.to_owned(), password_hash, role))
    }
}

impl UserStore for SqliteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] unless `actor` is an admin,
    /// [Error::DuplicateName] if the username is taken, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(
        &self,
        actor: &Session,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, Error> {
        actor.require_admin()?;

        self.insert_user(username, password, role)
    }

    /// Create the first user of an empty database as an admin.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] if any user already exists.
    fn create_initial_admin(&self, username: &str, password: &str) -> Result<User, Error> {
        if self.count()? > 0 {
            return Err(Error::PermissionDenied);
        }

        self.insert_user(username, password, Role::Admin)
    }

    /// Get the user with the specified `username`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user, or
    /// [Error::SqlError] if there are SQL related errors.
    fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT user_id, username, password, role FROM users WHERE username = :username")?
            .query_row(&[(":username", &username)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// List every user, ordered by ID.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] unless `actor` is an admin.
    fn list(&self, actor: &Session) -> Result<Vec<User>, Error> {
        actor.require_admin()?;

        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT user_id, username, password, role FROM users ORDER BY user_id ASC")?
            .query_map([], Self::map_row)?
            .map(|maybe_user| maybe_user.map_err(|error| error.into()))
            .collect()
    }

    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(user_id) FROM users", [], |row| {
                row.get::<_, i64>(0).map(|count| count as usize)
            })
            .map_err(|error| error.into())
    }
}

impl CreateTable for SqliteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS users (
                    user_id INTEGER PRIMARY KEY,
                    username TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    role TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SqliteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = UserId::new(row.get(offset)?);
        let username: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;
        let role: Role = row.get(offset + 3)?;

        Ok(User::new(
            id,
            username,
            PasswordHash::new_unchecked(&raw_password_hash),
            role,
        ))
    }
}

#[cfg(test)]
mod user_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, auth::Session, db::initialize, models::Role, stores::UserStore};

    use super::SqliteUserStore;

    fn get_test_store() -> SqliteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteUserStore::with_cost(Arc::new(Mutex::new(connection)), 4)
    }

    fn admin_session(store: &SqliteUserStore) -> Session {
        let admin = store.create_initial_admin("root", "hunter2").unwrap();

        Session::new(admin.id(), admin.role())
    }

    #[test]
    fn create_initial_admin_succeeds_on_empty_database() {
        let store = get_test_store();

        let admin = store.create_initial_admin("root", "hunter2").unwrap();

        assert!(admin.id().as_i64() > 0);
        assert_eq!(admin.username(), "root");
        assert_eq!(admin.role(), Role::Admin);
    }

    #[test]
    fn create_initial_admin_fails_once_a_user_exists() {
        let store = get_test_store();
        store.create_initial_admin("root", "hunter2").unwrap();

        let result = store.create_initial_admin("root2", "hunter2");

        assert_eq!(result, Err(Error::PermissionDenied));
    }

    #[test]
    fn create_user_succeeds_for_admin_actor() {
        let store = get_test_store();
        let session = admin_session(&store);

        let user = store
            .create(&session, "alice", "hunter2", Role::User)
            .unwrap();

        assert_eq!(user.username(), "alice");
        assert_eq!(user.role(), Role::User);
        assert!(user.password_hash().verify("hunter2").unwrap());
    }

    #[test]
    fn create_user_fails_for_non_admin_actor() {
        let store = get_test_store();
        let session = admin_session(&store);
        let user = store
            .create(&session, "alice", "hunter2", Role::User)
            .unwrap();
        let user_session = Session::new(user.id(), user.role());

        let result = store.create(&user_session, "bob", "hunter2", Role::User);

        assert_eq!(result, Err(Error::PermissionDenied));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn create_user_fails_on_duplicate_username() {
        let store = get_test_store();
        let session = admin_session(&store);
        store
            .create(&session, "alice", "hunter2", Role::User)
            .unwrap();

        let result = store.create(&session, "alice", "hunter3", Role::User);

        assert_eq!(result, Err(Error::DuplicateName("alice".to_owned())));

        // The pre-existing row is unchanged.
        let alice = store.get_by_username("alice").unwrap();
        assert!(alice.password_hash().verify("hunter2").unwrap());
    }

    #[test]
    fn create_user_fails_on_empty_username() {
        let store = get_test_store();
        let session = admin_session(&store);

        let result = store.create(&session, "   ", "hunter2", Role::User);

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn get_by_username_fails_with_non_existent_username() {
        let store = get_test_store();

        let result = store.get_by_username("nobody");

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_users_is_admin_only() {
        let store = get_test_store();
        let session = admin_session(&store);
        let user = store
            .create(&session, "alice", "hunter2", Role::User)
            .unwrap();
        let user_session = Session::new(user.id(), user.role());

        assert_eq!(store.list(&user_session), Err(Error::PermissionDenied));

        let users = store.list(&session).unwrap();
        assert_eq!(users.len(), 2, "want 2 users, got {}", users.len());
    }
}
