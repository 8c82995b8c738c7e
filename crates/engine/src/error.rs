//! The module contains the error the engine can throw.
//!
//! Callers never match on the message text: they ask for the [`ErrorKind`]
//! through [`EngineError::kind`].
//!
//! - [`Validation`] thrown when the input breaks a business rule.
//! - [`NotFound`] thrown when no expense has the requested id.
//! - every other variant is a storage failure.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Coarse classification used by the request layers to pick a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("expense {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("operation cancelled")]
    Cancelled,
    #[error("no expense id left after {0}")]
    IdsExhausted(i64),
    #[error("engine built without a repository")]
    MissingRepository,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Cancelled
            | Self::IdsExhausted(_)
            | Self::MissingRepository => ErrorKind::Storage,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::IdsExhausted(a), Self::IdsExhausted(b)) => a == b,
            (Self::Cancelled, Self::Cancelled)
            | (Self::MissingRepository, Self::MissingRepository) => true,
            _ => false,
        }
    }
}
