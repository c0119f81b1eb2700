mod options;
mod repository;

pub use options::*;
pub use repository::*;

/// Table definition. Column names and types are the on-disk contract.
pub const MIGRATION_001_EXPENSES: &str = include_str!("migrations/001_expenses.sql");

/// Index backing date-range queries
pub const MIGRATION_002_DATE_INDEX: &str = include_str!("migrations/002_expenses_date_index.sql");
