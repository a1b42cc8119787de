use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    NotFound {
        message: String,
    },
    // a request that would break a lending invariant, e.g. checking out a book already on loan
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn conflict(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Conflict { message: message.to_string(), reason_code }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::NotFound { .. } => { false }
            LibraryError::Conflict { .. } => { false }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }

    pub fn reason_code(&self) -> Option<&str> {
        match self {
            LibraryError::Database { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Conflict { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Validation { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::Runtime { reason_code, .. } => { reason_code.as_deref() }
            LibraryError::NotFound { .. } => { None }
            LibraryError::Serialization { .. } => { None }
        }
    }
}

impl std::error::Error for LibraryError {}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(format!("io failure: {}", err).as_str(), Some(format!("{:?}", err.kind())))
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(format!("malformed json: {}", err).as_str())
    }
}

impl From<config::ConfigError> for LibraryError {
    fn from(err: config::ConfigError) -> Self {
        LibraryError::validation(format!("invalid configuration: {}", err).as_str(), Some("invalid_config".to_string()))
    }
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => LibraryError::not_found("row not found"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => LibraryError::conflict(
                format!("duplicate key: {}", db_err.message()).as_str(), Some("duplicate_key".to_string())),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => LibraryError::database(
                format!("database unavailable: {}", err).as_str(), Some("unavailable".to_string()), true),
            _ => LibraryError::database(format!("database failure: {}", err).as_str(), None, false),
        }
    }
}

// Renders the human message, followed by the machine reason when there is one.
impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            LibraryError::Database { message, .. } |
            LibraryError::NotFound { message } |
            LibraryError::Conflict { message, .. } |
            LibraryError::Validation { message, .. } |
            LibraryError::Serialization { message } |
            LibraryError::Runtime { message, .. } => message,
        };
        match self.reason_code() {
            Some(code) => write!(f, "{} [{}]", message, code),
            None => write!(f, "{}", message),
        }
    }
}

/// A specialized Result type for the lending ledger.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum LoanStatus {
    Active,
    Returned,
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "Active"),
            LoanStatus::Returned => write!(f, "Returned"),
        }
    }
}
