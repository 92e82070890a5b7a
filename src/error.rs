//! Crate-level error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::stores::StoreError;

/// Every way a run can fail. All of them are terminal for the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Input missing, malformed or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Converter or reconciler failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode app registry: {0}")]
    Registry(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Anything that does not fit above.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
