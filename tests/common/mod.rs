// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use expense_ledger::application::{CategorySource, LedgerService};
use expense_ledger::storage::StoreConfig;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::new(temp_dir.path().join("test.db"));
    let service = LedgerService::init(&config, CategorySource::builtin()).await?;
    Ok((service, temp_dir))
}

/// Store config pointing into `dir`
pub fn store_config(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().join("test.db"))
}

/// Add an expense and return its id, panicking on an error envelope
pub async fn add(service: &LedgerService, date: &str, amount: f64, category: &str) -> i64 {
    service
        .add_expense(date, amount, category, None, None)
        .await
        .success()
        .expect("add_expense should succeed")
        .id
}

/// Test fixture: the March 2024 example ledger
pub struct MarchLedger;

impl MarchLedger {
    /// Food & Dining 42.50 on the 1st, Transportation 15.00 on the 5th
    pub async fn create_basic(service: &LedgerService) -> (i64, i64) {
        let food = add(service, "2024-03-01", 42.50, "Food & Dining").await;
        let transport = add(service, "2024-03-05", 15.00, "Transportation").await;
        (food, transport)
    }

    /// Basic entries plus a few more across categories and months
    pub async fn create_extended(service: &LedgerService) {
        Self::create_basic(service).await;
        add(service, "2024-03-05", 7.25, "Food & Dining").await;
        add(service, "2024-03-20", 120.00, "Bills & Utilities").await;
        add(service, "2024-03-31", 30.00, "Transportation").await;
        add(service, "2024-02-29", 99.00, "Shopping").await;
        add(service, "2024-04-01", 60.00, "Travel").await;
    }
}
