//! Defines the app level error type and its mapping from SQLite errors.

/// The errors that may occur in the application.
///
/// Every variant is recovered at the command boundary: the REPL prints the
/// error message and keeps running.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The acting user lacks the role or row ownership the operation requires.
    #[error("access denied")]
    PermissionDenied,

    /// A username, category name, or payment method name already exists.
    #[error("the name \"{0}\" already exists")]
    DuplicateName(String),

    /// A referenced user, category, or payment method does not exist.
    #[error("a referenced record does not exist")]
    ReferentialIntegrity,

    /// An expense amount was zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    /// The named field is not in the set of updatable or sortable fields.
    #[error("\"{0}\" is not a valid field")]
    InvalidField(String),

    /// A value could not be coerced to the type its field requires.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The requested record could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// The username/password combination did not match a stored credential.
    ///
    /// Deliberately covers both an unknown username and a wrong password so
    /// that login failures do not reveal which usernames exist.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The file given to the CSV importer does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// An unexpected error occurred with the underlying hashing library.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An I/O error outside the file-not-found case.
    #[error("I/O error: {0}")]
    Io(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(value.to_string()),
            _ => Error::Io(value.to_string()),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::ReferentialIntegrity
            }
            // Code 2067 occurs when a UNIQUE constraint failed. The
            // description ends with the offending column, e.g.
            // "UNIQUE constraint failed: users.username".
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 =>
            {
                let column = desc.rsplit('.').next().unwrap_or("name");
                Error::DuplicateName(column.to_owned())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {error}");
                Error::SqlError(error)
            }
        }
    }
}
