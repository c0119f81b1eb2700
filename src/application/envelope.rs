use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryTotal, Expense, ExpenseId};

use super::{AppError, ErrorKind};

/// Uniform response wrapper returned by every ledger operation.
///
/// Serializes flat: `{"status": "success", ...payload}` or
/// `{"status": "error", "kind": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success(T),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl<T> Envelope<T> {
    /// The single place where operation errors become responses.
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(payload) => Envelope::Success(payload),
            Err(err) => {
                let kind = err.kind();
                match kind {
                    ErrorKind::Storage => error!("{:#}", err),
                    ErrorKind::Validation | ErrorKind::NotFound => warn!("{}", err),
                }
                Envelope::Error(ErrorBody {
                    kind,
                    message: err.to_string(),
                })
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Envelope::Success(payload) => Some(payload),
            Envelope::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBody> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Error(body) => Some(body),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            serde_json::json!({
                "status": "error",
                "kind": ErrorKind::Storage,
                "message": format!("Failed to encode response: {}", err),
            })
        })
    }
}

/// Payload of `add_expense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAdded {
    pub id: ExpenseId,
}

/// Payload of `list_expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseList {
    pub count: usize,
    pub records: Vec<Expense>,
}

/// Payload of `summarize_expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub summary: Vec<CategoryTotal>,
    pub total: f64,
    pub period: String,
}

/// Payload of `delete_expense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDeleted {
    pub message: String,
}
