//! Atomic artifact writes.
//!
//! A write is split into [`stage`], which does all the I/O that can fail
//! into a temp file next to the target, and [`StagedFile::commit`], a single
//! rename. Staging every artifact before committing any of them keeps a
//! failed run from leaving a mix of old and new files behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Contents fully written and synced, waiting to replace their target.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged contents over the target.
    pub fn commit(self) -> io::Result<()> {
        self.tmp.persist(&self.target).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Write `contents` to a temp file in the directory of `path`.
///
/// Fails without touching `path` if the directory is missing or unwritable,
/// or if `path` is itself a directory.
pub fn stage(path: &Path, contents: &str) -> io::Result<StagedFile> {
    let existing = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            ));
        }
        Ok(meta) => Some(meta),
        Err(_) => None,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    set_permissions(tmp.as_file(), existing.as_ref())?;
    tmp.as_file().sync_all()?;

    Ok(StagedFile {
        tmp,
        target: path.to_path_buf(),
    })
}

/// Replace `path` with `contents` in one rename.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    stage(path, contents)?.commit()
}

/// Temp files are created 0600. Keep the target's mode, or make a new file
/// world-readable so nginx workers can serve it.
#[cfg(unix)]
fn set_permissions(file: &fs::File, existing: Option<&fs::Metadata>) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match existing {
        Some(meta) => meta.permissions(),
        None => fs::Permissions::from_mode(0o644),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_permissions(_file: &fs::File, _existing: Option<&fs::Metadata>) -> io::Result<()> {
    Ok(())
}
