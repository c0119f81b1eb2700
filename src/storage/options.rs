use std::path::PathBuf;
use std::time::Duration;

/// Default wait for a locked database before a statement fails.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how the store opens its SQLite file.
///
/// Resolved by the hosting process; the store never inspects the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Use write-ahead logging. Turned off for throwaway temp-dir deployments.
    pub wal: bool,
    pub busy_timeout: Duration,
    pub max_connections: u32,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            wal: true,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            max_connections: 8,
        }
    }

    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}
