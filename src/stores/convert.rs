//! UI store → generator input conversion.

use std::path::Path;

use crate::stores::{read_ui_store, to_yaml, write_store, StoreError};

/// Convert the UI-managed JSON store at `ui` into YAML at `out`.
///
/// Returns the number of entries under `apps`, for logging.
pub fn convert_ui_store(ui: &Path, out: &Path) -> Result<usize, StoreError> {
    let value = read_ui_store(ui)?;
    let apps = value["apps"].as_array().map_or(0, Vec::len);

    write_store(out, &to_yaml(&value, ui)?)?;
    tracing::info!(from = %ui.display(), to = %out.display(), apps, "UI store converted to YAML");
    Ok(apps)
}
