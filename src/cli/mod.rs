use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::BufReader;

use crate::application::{Envelope, LedgerService};
use crate::config::{ConfigArgs, Settings, init_logging};
use crate::domain::{ExpenseId, format_amount, parse_amount};
use crate::transport;

/// Expense Ledger - record, list and summarize expenses
#[derive(Parser)]
#[command(name = "expense-ledger")]
#[command(about = "A small expense record-keeping service backed by SQLite")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve line-delimited JSON requests on stdin/stdout
    Serve,

    /// Create the database if needed and exit
    Init,

    /// Add a new expense
    Add {
        /// Date of the expense (YYYY-MM-DD)
        date: String,

        /// Amount (e.g., "42.50"; negative for refunds)
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Category (free text)
        category: String,

        /// Optional subcategory
        #[arg(short, long)]
        subcategory: Option<String>,

        /// Optional note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List expenses in a date range (inclusive)
    List {
        /// Start date (YYYY-MM-DD)
        start_date: String,

        /// End date (YYYY-MM-DD)
        end_date: String,
    },

    /// Summarize expenses by category
    Summarize {
        /// Start date (YYYY-MM-DD)
        start_date: String,

        /// End date (YYYY-MM-DD)
        end_date: String,

        /// Only summarize this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Print the category list as JSON
    Categories,

    /// Export expenses in a date range to CSV
    Export {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_logging(&self.config.log_level);
        let settings = Settings::resolve(&self.config);

        let service = match LedgerService::init(&settings.store, settings.categories).await {
            Ok(service) => service,
            Err(err) => {
                error!("{:#}", err);
                return Err(err.into());
            }
        };

        let service = Arc::new(service);
        let result = run_command(Arc::clone(&service), self.command).await;
        service.shutdown().await;
        result
    }
}

async fn run_command(service: Arc<LedgerService>, command: Commands) -> Result<()> {
    match command {
        Commands::Serve => {
            let stdin = BufReader::new(tokio::io::stdin());
            info!("Serving requests on stdin/stdout");
            transport::serve(Arc::clone(&service), stdin, tokio::io::stdout()).await?;
        }

        Commands::Init => {
            println!("Database ready");
        }

        Commands::Add {
            date,
            amount,
            category,
            subcategory,
            note,
        } => {
            let amount = parse_amount(&amount).context("Invalid amount format. Use '42.50' or '42'")?;
            let envelope = service
                .add_expense(&date, amount, &category, subcategory.as_deref(), note.as_deref())
                .await;
            if envelope.is_success() {
                eprintln!("Expense added: {} for {}", format_amount(amount), category);
            }
            print_envelope(&envelope)?;
        }

        Commands::List {
            start_date,
            end_date,
        } => {
            let envelope = service.list_expenses(&start_date, &end_date).await;
            print_envelope(&envelope)?;
        }

        Commands::Summarize {
            start_date,
            end_date,
            category,
        } => {
            let envelope = service
                .summarize_expenses(&start_date, &end_date, category.as_deref())
                .await;
            print_envelope(&envelope)?;
        }

        Commands::Delete { id } => {
            let envelope = service.delete_expense(id).await;
            print_envelope(&envelope)?;
        }

        Commands::Categories => {
            println!("{}", service.get_categories());
        }

        Commands::Export { from, to, output } => {
            run_export_command(&service, &from, &to, output.as_deref()).await?;
        }
    }
    Ok(())
}

/// Print an envelope as pretty JSON; an error envelope also fails the command.
fn print_envelope<T: Serialize>(envelope: &Envelope<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(&envelope.to_json())?;
    println!("{}", json);
    match envelope.error() {
        Some(err) => Err(anyhow!("{}", err.message)),
        None => Ok(()),
    }
}

async fn run_export_command(
    service: &LedgerService,
    from: &str,
    to: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = exporter.export_expenses_csv(from, to, writer).await?;
    if output.is_some() {
        eprintln!("Exported {} expenses", count);
    }
    Ok(())
}
