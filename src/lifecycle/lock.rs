//! Advisory lock serializing concurrent generate runs.
//!
//! Each run takes an exclusive `flock` on `<output>.lock` before reading its
//! input and holds it until both artifacts are written. A second run blocks
//! until the first finishes, then renders whatever the input is by then.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Held for the duration of one run; released on drop.
#[derive(Debug)]
pub struct OutputLock {
    _file: File,
    path: PathBuf,
}

impl OutputLock {
    /// Lock file guarding `output`.
    pub fn path_for(output: &Path) -> PathBuf {
        let mut name = output
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        output.with_file_name(name)
    }

    /// Block until the lock guarding `output` is ours.
    pub fn acquire(output: &Path) -> Result<Self> {
        let path = Self::path_for(output);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| Error::Lock {
                path: path.clone(),
                source,
            })?;

        lock_exclusive(&file).map_err(|source| Error::Lock {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Output lock acquired");
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    loop {
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    // no advisory locking; callers must serialize runs themselves
    Ok(())
}
