//! Authentication and the session context object.
//!
//! A [Session] is created by [authenticate] at login, carried through every
//! command handler, and dropped on logout or exit. There is no implicit
//! global identity.

use crate::{
    Error,
    models::{Role, UserId},
    stores::UserStore,
};

/// The identity a command acts under: who is logged in and with which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    role: Role,
}

impl Session {
    /// Create a session for a verified identity.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// The logged-in user's ID.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The logged-in user's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the session belongs to an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require the session to belong to an admin.
    ///
    /// # Errors
    /// Returns [Error::PermissionDenied] for non-admin sessions.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::PermissionDenied)
        }
    }
}

/// Verify a username/password pair against the credential store and build
/// the session for it.
///
/// # Errors
/// Returns [Error::InvalidCredentials] when the username does not exist
/// *and* when the password does not match, so that a caller cannot probe
/// which usernames are registered.
pub fn authenticate(
    store: &impl UserStore,
    username: &str,
    password: &str,
) -> Result<Session, Error> {
    let user = match store.get_by_username(username) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash().verify(password) {
        Ok(true) => Ok(Session::new(user.id(), user.role())),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod authenticate_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::Role,
        stores::{UserStore, sqlite::SqliteUserStore},
    };

    use super::{Session, authenticate};

    fn get_test_store() -> SqliteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteUserStore::with_cost(Arc::new(Mutex::new(connection)), 4)
    }

    #[test]
    fn authenticate_succeeds_with_correct_password() {
        let store = get_test_store();
        let admin = store.create_initial_admin("alice", "hunter2").unwrap();

        let session = authenticate(&store, "alice", "hunter2").unwrap();

        assert_eq!(session, Session::new(admin.id(), Role::Admin));
    }

    #[test]
    fn authenticate_fails_with_wrong_password() {
        let store = get_test_store();
        store.create_initial_admin("alice", "hunter2").unwrap();

        let result = authenticate(&store, "alice", "hunter3");

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[test]
    fn authenticate_fails_with_unknown_username() {
        let store = get_test_store();
        store.create_initial_admin("alice", "hunter2").unwrap();

        let result = authenticate(&store, "bob", "hunter2");

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[test]
    fn unknown_username_and_wrong_password_are_indistinguishable() {
        let store = get_test_store();
        store.create_initial_admin("alice", "hunter2").unwrap();

        let unknown_user = authenticate(&store, "bob", "hunter2");
        let wrong_password = authenticate(&store, "alice", "nope");

        assert_eq!(unknown_user, wrong_password);
    }

    #[test]
    fn require_admin_rejects_plain_user() {
        let store = get_test_store();
        let admin = store.create_initial_admin("alice", "hunter2").unwrap();
        let admin_session = Session::new(admin.id(), Role::Admin);

        let user = store
            .create(&admin_session, "bob", "hunter2", Role::User)
            .unwrap();
        let session = Session::new(user.id(), user.role());

        assert_eq!(session.require_admin(), Err(Error::PermissionDenied));
        assert_eq!(admin_session.require_admin(), Ok(()));
    }
}
