//! This file defines a user of the application and its supporting types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::{Error, models::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The role a user acts under.
///
/// Admins manage users and reference data and see every expense; plain
/// users only see and mutate their own ledger rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Unrestricted access, exclusive write over users, categories, and
    /// payment methods.
    Admin,
    /// Access restricted to the user's own expenses.
    User,
}

impl Role {
    /// The role name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(Error::InvalidValue(format!(
                "\"{other}\" is not a role, expected Admin or User"
            ))),
        }
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            other => Err(FromSqlError::Other(
                format!("unknown role \"{other}\" in the database").into(),
            )),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: String,
    password_hash: PasswordHash,
    role: Role,
}

impl User {
    /// Assemble a user from its parts, e.g. a database row.
    pub fn new(id: UserId, username: String, password_hash: PasswordHash, role: Role) -> Self {
        Self {
            id,
            username,
            password_hash,
            role,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The unique name the user logs in with.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The user's role.
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod role_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::Role;

    #[test]
    fn parse_role_accepts_any_case() {
        assert_eq!(Role::from_str("Admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("admin"), Ok(Role::Admin));
        assert_eq!(Role::from_str("USER"), Ok(Role::User));
    }

    #[test]
    fn parse_role_rejects_unknown_name() {
        let result = Role::from_str("Superuser");

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }
}
