//! Defines the user store trait.

use crate::{
    Error,
    auth::Session,
    models::{Role, User},
};

/// Handles the creation and retrieval of users and their credentials.
pub trait UserStore {
    /// Create a new user with a salted hash of `password`.
    ///
    /// Only admins may create users.
    fn create(&self, actor: &Session, username: &str, password: &str, role: Role)
    -> Result<User, Error>;

    /// Create the very first user as an admin, without an acting session.
    ///
    /// This is the bootstrap path for an empty database; it must fail once
    /// any user exists.
    fn create_initial_admin(&self, username: &str, password: &str) -> Result<User, Error>;

    /// Get the user with the given username.
    fn get_by_username(&self, username: &str) -> Result<User, Error>;

    /// List every user. Only admins may list users.
    fn list(&self, actor: &Session) -> Result<Vec<User>, Error>;

    /// The number of users in the store.
    fn count(&self) -> Result<usize, Error>;
}
