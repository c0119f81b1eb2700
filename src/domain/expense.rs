use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store on insert.
pub type ExpenseId = i64;

/// Canonical on-disk date layout. Fixed width, so lexical order is chronological.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// An expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

impl NewExpense {
    pub fn new(date: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount,
            category: category.into(),
            subcategory: String::new(),
            note: String::new(),
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Per-category aggregate over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
}

/// Parse a strict, zero-padded `YYYY-MM-DD` date.
///
/// chrono alone accepts unpadded fields like `2024-3-1`, which would break
/// lexical ordering in storage, so the input must also round-trip exactly.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| DateError::Invalid(input.to_string()))?;
    if date.format(DATE_FORMAT).to_string() != input {
        return Err(DateError::NotCanonical(input.to_string()));
    }
    Ok(date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    Invalid(String),
    NotCanonical(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::Invalid(s) => write!(f, "invalid date '{}', expected YYYY-MM-DD", s),
            DateError::NotCanonical(s) => {
                write!(f, "date '{}' must be zero-padded as YYYY-MM-DD", s)
            }
        }
    }
}

impl std::error::Error for DateError {}
