use anyhow::{Context, Result};
use log::debug;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;

use crate::domain::{CategoryTotal, Expense, ExpenseId, NewExpense};

use super::{MIGRATION_001_EXPENSES, MIGRATION_002_DATE_INDEX, StoreConfig};

/// Repository for persisting and querying expense records.
///
/// Reads go straight to the pool. Mutations take `write_lock` first, so at
/// most one write transaction from this process is in flight at a time.
pub struct Repository {
    pool: SqlitePool,
    write_lock: Mutex<()>,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }

    /// Open (creating if needed) the database described by `config`.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let journal_mode = if config.wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(journal_mode)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.busy_timeout)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", config.path.display()))?;

        Ok(Self::new(pool))
    }

    /// Ensure the schema exists. Safe to run repeatedly and from concurrent startups.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        sqlx::query(MIGRATION_001_EXPENSES)
            .execute(&self.pool)
            .await
            .context("Failed to create expenses table")?;

        sqlx::query(MIGRATION_002_DATE_INDEX)
            .execute(&self.pool)
            .await
            .context("Failed to create expenses date index")?;

        Ok(())
    }

    /// Connect and initialize in one step.
    pub async fn init(config: &StoreConfig) -> Result<Self> {
        let repo = Self::connect(config).await?;
        repo.initialize().await?;
        Ok(repo)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Append a new expense and return its assigned id.
    pub async fn insert(&self, expense: &NewExpense) -> Result<ExpenseId> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin insert transaction")?;

        let row = sqlx::query(
            r#"
            INSERT INTO expenses (date, amount, category, subcategory, note)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&expense.date)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.subcategory)
        .bind(&expense.note)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert expense")?;

        let id: ExpenseId = row.try_get("id").context("Missing id for inserted expense")?;
        tx.commit().await.context("Failed to commit expense")?;

        debug!("inserted expense {}", id);
        Ok(id)
    }

    /// All expenses dated within `[start_date, end_date]`, newest first.
    /// Equal dates are ordered by id, newest first.
    pub async fn query_range(&self, start_date: &str, end_date: &str) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, amount, category, subcategory, note
            FROM expenses
            WHERE date BETWEEN ? AND ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// Sum and count expenses per category within `[start_date, end_date]`.
    /// Largest totals first, then by category name.
    pub async fn aggregate(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategoryTotal>> {
        let mut query = String::from(
            "SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count FROM expenses WHERE date BETWEEN ? AND ?",
        );
        if category.is_some() {
            query.push_str(" AND category = ?");
        }
        query.push_str(" GROUP BY category ORDER BY total_amount DESC, category ASC");

        let mut sql_query = sqlx::query(&query).bind(start_date).bind(end_date);
        if let Some(cat) = category {
            sql_query = sql_query.bind(cat);
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to summarize expenses")?;

        rows.iter()
            .map(|row| -> Result<CategoryTotal> {
                Ok(CategoryTotal {
                    category: row.try_get("category")?,
                    total_amount: row.try_get("total_amount")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    /// Delete an expense. Returns `false` when no row had that id.
    pub async fn delete(&self, id: ExpenseId) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin delete transaction")?;

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete expense")?;

        tx.commit().await.context("Failed to commit delete")?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of stored expenses, across all dates.
    ///
    /// Diagnostic accessor; the ledger operations never need it.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM expenses")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count expenses")?;
        Ok(row.try_get("count")?)
    }

    fn row_to_expense(row: &SqliteRow) -> Result<Expense> {
        // Columns created with DEFAULT '' may still hold NULL in files written by other tools.
        let subcategory: Option<String> = row.try_get("subcategory")?;
        let note: Option<String> = row.try_get("note")?;

        Ok(Expense {
            id: row.try_get("id")?,
            date: row.try_get("date")?,
            amount: row.try_get("amount").context("Invalid amount")?,
            category: row.try_get("category")?,
            subcategory: subcategory.unwrap_or_default(),
            note: note.unwrap_or_default(),
        })
    }
}
