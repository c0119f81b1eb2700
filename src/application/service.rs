use log::{debug, info};

use crate::domain::{parse_date, CategorySet, ExpenseId, NewExpense};
use crate::storage::{Repository, StoreConfig};

use super::{
    AppError, CategorySource, Envelope, ExpenseAdded, ExpenseDeleted, ExpenseList,
    ExpenseSummary,
};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, stdio server, tests).
///
/// A value of this type is only handed out after the store has been
/// initialized, so holding one means the ledger is ready to serve.
pub struct LedgerService {
    repo: Repository,
    categories: CategorySource,
}

impl LedgerService {
    /// Wrap an already-initialized repository.
    pub fn new(repo: Repository, categories: CategorySource) -> Self {
        Self { repo, categories }
    }

    /// Open the store and make sure its schema exists.
    pub async fn init(config: &StoreConfig, categories: CategorySource) -> Result<Self, AppError> {
        let repo = Repository::init(config)
            .await
            .map_err(AppError::Initialization)?;
        info!(
            "Expense ledger ready at {} (wal: {})",
            config.path.display(),
            config.wal
        );
        Ok(Self::new(repo, categories))
    }

    /// Release pooled connections.
    pub async fn shutdown(&self) {
        self.repo.close().await;
    }

    // ========================
    // Operations
    // ========================

    /// Record a new expense.
    pub async fn add_expense(
        &self,
        date: &str,
        amount: f64,
        category: &str,
        subcategory: Option<&str>,
        note: Option<&str>,
    ) -> Envelope<ExpenseAdded> {
        Envelope::from_result(
            self.try_add_expense(date, amount, category, subcategory, note)
                .await,
        )
    }

    /// List expenses dated within the inclusive range, newest first.
    pub async fn list_expenses(&self, start_date: &str, end_date: &str) -> Envelope<ExpenseList> {
        Envelope::from_result(self.try_list_expenses(start_date, end_date).await)
    }

    /// Per-category totals over the inclusive range, plus the grand total.
    pub async fn summarize_expenses(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Envelope<ExpenseSummary> {
        Envelope::from_result(
            self.try_summarize_expenses(start_date, end_date, category)
                .await,
        )
    }

    /// Delete an expense by id.
    pub async fn delete_expense(&self, id: ExpenseId) -> Envelope<ExpenseDeleted> {
        Envelope::from_result(self.try_delete_expense(id).await)
    }

    /// The category document as indented JSON. Never fails.
    pub fn get_categories(&self) -> String {
        self.category_set().to_pretty_json()
    }

    pub fn category_set(&self) -> CategorySet {
        self.categories.load()
    }

    // ========================
    // Fallible implementations
    // ========================

    async fn try_add_expense(
        &self,
        date: &str,
        amount: f64,
        category: &str,
        subcategory: Option<&str>,
        note: Option<&str>,
    ) -> Result<ExpenseAdded, AppError> {
        validate_date("date", date)?;
        if !amount.is_finite() {
            return Err(AppError::InvalidAmount(format!(
                "{} is not a finite number",
                amount
            )));
        }
        if category.trim().is_empty() {
            return Err(AppError::MissingField("category"));
        }

        let expense = NewExpense::new(date, amount, category)
            .with_subcategory(subcategory.unwrap_or_default())
            .with_note(note.unwrap_or_default());

        let id = self.repo.insert(&expense).await?;
        debug!("Expense added: {} for {} (id {})", amount, category, id);
        Ok(ExpenseAdded { id })
    }

    async fn try_list_expenses(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<ExpenseList, AppError> {
        validate_date("start_date", start_date)?;
        validate_date("end_date", end_date)?;

        let records = self.repo.query_range(start_date, end_date).await?;
        Ok(ExpenseList {
            count: records.len(),
            records,
        })
    }

    async fn try_summarize_expenses(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<ExpenseSummary, AppError> {
        validate_date("start_date", start_date)?;
        validate_date("end_date", end_date)?;

        // A blank filter means "all categories".
        let category = category.filter(|c| !c.trim().is_empty());

        let summary = self.repo.aggregate(start_date, end_date, category).await?;
        let total = summary.iter().map(|row| row.total_amount).sum();

        Ok(ExpenseSummary {
            summary,
            total,
            period: format!("{} to {}", start_date, end_date),
        })
    }

    async fn try_delete_expense(&self, id: ExpenseId) -> Result<ExpenseDeleted, AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ExpenseNotFound(id));
        }
        Ok(ExpenseDeleted {
            message: format!("Expense {} deleted", id),
        })
    }
}

fn validate_date(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::MissingField(field));
    }
    parse_date(value).map_err(|e| AppError::InvalidDate(format!("{}: {}", field, e)))?;
    Ok(())
}
