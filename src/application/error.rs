use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum AppError {
    /// The store could not be opened or its schema created. Fatal at startup.
    #[error("Storage initialization failed: {0:#}")]
    Initialization(anyhow::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    #[error("Database error: {0:#}")]
    Database(#[from] anyhow::Error),
}

/// Coarse error class reported to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidDate(_)
            | AppError::InvalidAmount(_)
            | AppError::MissingField(_)
            | AppError::InvalidRequest(_) => ErrorKind::Validation,
            AppError::ExpenseNotFound(_) => ErrorKind::NotFound,
            AppError::Initialization(_) | AppError::Database(_) => ErrorKind::Storage,
        }
    }
}
