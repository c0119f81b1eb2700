use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::domain::CategorySet;

/// Supplies the advisory category list.
///
/// Backed by an optional JSON document; any problem reading it falls back
/// to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct CategorySource {
    path: Option<PathBuf>,
}

impl CategorySource {
    /// Always serve the built-in list.
    pub fn builtin() -> Self {
        Self { path: None }
    }

    /// Read `{"categories": [...]}` from `path` when it exists.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> CategorySet {
        let Some(path) = &self.path else {
            return CategorySet::default();
        };

        if !path.exists() {
            debug!("No category file at {}, using defaults", path.display());
            return CategorySet::default();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| CategorySet::from_json(&text).map_err(|e| e.to_string()));

        match parsed {
            Ok(set) => set,
            Err(reason) => {
                warn!(
                    "Ignoring category file {}: {}; using defaults",
                    path.display(),
                    reason
                );
                CategorySet::default()
            }
        }
    }
}
