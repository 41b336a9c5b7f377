//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths enforce model validation before SQL mutations.
//! - Repository APIs return semantic errors (`CompanyNotFound`,
//!   `EventNotFound`, `TodoNotFound`, `StoreUnavailable`) in addition
//!   to DB transport errors.

use crate::db::{is_missing_table, DbError};
use crate::model::company::CompanyValidationError;
use crate::model::event::{EventId, EventValidationError};
use crate::model::todo::TodoId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod company_repo;
pub mod event_repo;
pub mod todo_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence and query error for tracker repositories.
#[derive(Debug)]
pub enum RepoError {
    CompanyValidation(CompanyValidationError),
    EventValidation(EventValidationError),
    /// No company matches the given name (or id, rendered as text).
    CompanyNotFound(String),
    EventNotFound(EventId),
    TodoNotFound(TodoId),
    /// The schema has not been initialized or the store is unreachable.
    StoreUnavailable,
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompanyValidation(err) => write!(f, "{err}"),
            Self::EventValidation(err) => write!(f, "{err}"),
            Self::CompanyNotFound(name) => write!(f, "company not found: {name}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::StoreUnavailable => write!(
                f,
                "store unavailable or schema not initialized; run `migrate` first"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CompanyValidation(err) => Some(err),
            Self::EventValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompanyValidationError> for RepoError {
    fn from(value: CompanyValidationError) -> Self {
        Self::CompanyValidation(value)
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::EventValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if is_missing_table(&value) {
            Self::StoreUnavailable
        } else {
            Self::Db(DbError::Sqlite(value))
        }
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
