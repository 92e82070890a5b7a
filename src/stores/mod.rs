//! Persisted configuration stores.
//!
//! The configuration lives in two places:
//! - the UI-managed JSON store, written by the add-on UI
//! - the user-editable YAML store, for people who prefer a file
//!
//! `convert.rs` turns the UI store into the generator input, and
//! `reconcile.rs` keeps the YAML store in step with the UI store.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod convert;
pub mod reconcile;

pub use convert::convert_ui_store;
pub use reconcile::{reconcile, SyncOutcome};

/// Default UI-managed store.
pub const DEFAULT_UI_STORE: &str = "/data/options.json";
/// Default user-editable store.
pub const DEFAULT_FILE_STORE: &str = "/config/multi-app-proxy.yaml";

/// Errors raised while reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode YAML for {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Read the UI store as an untyped JSON value, keeping every key.
fn read_ui_store(ui: &Path) -> Result<serde_json::Value, StoreError> {
    let content = std::fs::read_to_string(ui).map_err(|e| StoreError::io(ui, e))?;
    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: ui.to_path_buf(),
        source,
    })
}

fn to_yaml(value: &serde_json::Value, ui: &Path) -> Result<String, StoreError> {
    serde_yaml::to_string(value).map_err(|source| StoreError::Yaml {
        path: ui.to_path_buf(),
        source,
    })
}

fn write_store(path: &Path, contents: &str) -> Result<(), StoreError> {
    crate::lifecycle::output::write_atomic(path, contents).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
