// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use skillbridge::CoreError;

/// Failures of the `SQLite` allocation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database file or URL could not be opened.
    Connection(String),
    /// The database path is not valid UTF-8.
    InvalidPath(String),
    /// A connection pragma was rejected.
    Pragma(String),
    /// Schema migration failed.
    Migration(String),
    /// The connection does not enforce foreign keys.
    ForeignKeysDisabled,
    /// A unique index rejected the write, such as a second open request.
    UniqueViolation(String),
    /// A row referenced a missing employee, project or request.
    ForeignKeyViolation(String),
    /// The addressed row does not exist.
    NotFound(String),
    /// An update was attempted on a value that was never inserted.
    Unsaved(&'static str),
    /// A stored column could not be decoded into a domain value.
    InvalidStoredValue(String),
    /// A JSON column or timestamp could not be encoded or decoded.
    Serialization(String),
    /// Any other database failure.
    Database(String),
}

impl PersistenceError {
    /// Returns `true` for constraint rejections caused by the caller's data
    /// rather than by the database itself.
    #[must_use]
    pub const fn is_constraint(&self) -> bool {
        matches!(
            self,
            Self::UniqueViolation(_) | Self::ForeignKeyViolation(_)
        )
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "Cannot open allocation database: {msg}"),
            Self::InvalidPath(path) => write!(f, "Database path is not valid UTF-8: {path}"),
            Self::Pragma(msg) => write!(f, "Connection setup failed: {msg}"),
            Self::Migration(msg) => write!(f, "Schema migration failed: {msg}"),
            Self::ForeignKeysDisabled => write!(f, "Foreign key enforcement is disabled"),
            Self::UniqueViolation(msg) => write!(f, "Duplicate row: {msg}"),
            Self::ForeignKeyViolation(msg) => write!(f, "Dangling reference: {msg}"),
            Self::NotFound(what) => write!(f, "No such {what}"),
            Self::Unsaved(what) => write!(f, "Cannot update an unsaved {what}"),
            Self::InvalidStoredValue(msg) => write!(f, "Corrupt stored value: {msg}"),
            Self::Serialization(msg) => write!(f, "Encoding failed: {msg}"),
            Self::Database(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound(String::from("row")),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        Self::Store(err.to_string())
    }
}
