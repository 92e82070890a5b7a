//! Timestamp reconciliation between the UI store and the YAML store.
//!
//! # Rules
//! ```text
//! YAML missing          → create it from the UI store
//! UI strictly newer     → overwrite YAML with the UI content
//! YAML strictly newer   → report only; manual edits are never auto-applied
//! same mtime            → nothing to do
//! ```

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::stores::{read_ui_store, to_yaml, write_store, StoreError};

/// What a reconcile pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The YAML store did not exist and was created.
    Created,
    /// The UI store was newer and was written to the YAML store.
    UiApplied,
    /// The YAML store was edited by hand after the UI; left as is.
    FileNewer,
    /// Both stores carry the same timestamp.
    InSync,
}

fn modified(path: &Path) -> Result<SystemTime, StoreError> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| StoreError::io(path, e))
}

fn copy_ui_to_file(ui: &Path, file: &Path) -> Result<(), StoreError> {
    let value = read_ui_store(ui)?;
    write_store(file, &to_yaml(&value, ui)?)
}

/// Reconcile the UI store at `ui` with the YAML store at `file`.
pub fn reconcile(ui: &Path, file: &Path) -> Result<SyncOutcome, StoreError> {
    if !file.exists() {
        copy_ui_to_file(ui, file)?;
        tracing::info!(path = %file.display(), "YAML store created from UI store");
        return Ok(SyncOutcome::Created);
    }

    let ui_mtime = modified(ui)?;
    let file_mtime = modified(file)?;

    let outcome = if ui_mtime > file_mtime {
        copy_ui_to_file(ui, file)?;
        tracing::info!(path = %file.display(), "UI store is newer, saved to YAML store");
        SyncOutcome::UiApplied
    } else if file_mtime > ui_mtime {
        tracing::info!(
            path = %file.display(),
            "YAML store is newer (manual edit detected); copy it into the add-on configuration to use it"
        );
        SyncOutcome::FileNewer
    } else {
        tracing::info!("Stores are in sync");
        SyncOutcome::InSync
    };

    Ok(outcome)
}
