//! Runtime configuration for the binary.
//!
//! Turns command-line flags and environment variables into a `StoreConfig`
//! and a `CategorySource`. The library core never reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use env_logger::Env;

use crate::application::CategorySource;
use crate::storage::StoreConfig;

pub const DATABASE_FILE: &str = "expenses.db";
pub const CATEGORIES_FILE: &str = "categories.json";

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Database file path (defaults to expenses.db in the data directory)
    #[arg(short, long, env = "EXPENSES_DB", global = true)]
    pub database: Option<PathBuf>,

    /// Directory holding expenses.db and categories.json
    #[arg(long, env = "EXPENSES_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Category document ({"categories": [...]})
    #[arg(long, env = "EXPENSES_CATEGORIES", global = true)]
    pub categories: Option<PathBuf>,

    /// Keep data in the system temp directory without WAL (hosted deployments)
    #[arg(long, env = "EXPENSES_EPHEMERAL", global = true)]
    pub ephemeral: bool,

    /// Disable write-ahead logging
    #[arg(long, global = true)]
    pub no_wal: bool,

    /// How long a storage operation waits on a locked database
    #[arg(long, default_value_t = 5000, global = true)]
    pub busy_timeout_ms: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "EXPENSES_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreConfig,
    pub categories: CategorySource,
}

impl Settings {
    pub fn resolve(args: &ConfigArgs) -> Self {
        let data_dir = match (&args.data_dir, args.ephemeral) {
            (Some(dir), _) => dir.clone(),
            (None, true) => std::env::temp_dir(),
            (None, false) => PathBuf::from("."),
        };

        let database = args
            .database
            .clone()
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE));

        let categories = match (&args.categories, args.ephemeral) {
            (Some(path), _) => CategorySource::file(path),
            (None, true) => CategorySource::builtin(),
            (None, false) => CategorySource::file(data_dir.join(CATEGORIES_FILE)),
        };

        let store = StoreConfig::new(database)
            .with_wal(!args.no_wal && !args.ephemeral)
            .with_busy_timeout(Duration::from_millis(args.busy_timeout_ms));

        Self { store, categories }
    }
}

/// Install the stderr logger. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
