use anyhow::{Result, anyhow};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::Expense;

/// Column order of the CSV export; mirrors the `expenses` table.
pub const CSV_HEADER: [&str; 6] = ["id", "date", "amount", "category", "subcategory", "note"];

/// Exporter for writing ledger records to CSV
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export every expense dated within the inclusive range, newest first.
    pub async fn export_expenses_csv<W: Write>(
        &self,
        start_date: &str,
        end_date: &str,
        writer: W,
    ) -> Result<usize> {
        let envelope = self.service.list_expenses(start_date, end_date).await;
        if let Some(err) = envelope.error() {
            return Err(anyhow!("{}", err.message));
        }
        let records = envelope.success().map(|list| list.records).unwrap_or_default();
        write_expenses_csv(&records, writer)
    }
}

/// Write `records` as CSV with a header row. Returns the number of records written.
pub fn write_expenses_csv<W: Write>(records: &[Expense], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for expense in records {
        csv_writer.write_record(&[
            expense.id.to_string(),
            expense.date.clone(),
            expense.amount.to_string(),
            expense.category.clone(),
            expense.subcategory.clone(),
            expense.note.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}
