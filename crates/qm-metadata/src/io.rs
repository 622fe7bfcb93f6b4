//! Normalized atomic writes with file locking.
//!
//! Metadata files are always replaced whole: content is normalized to end
//! in exactly one newline, written to a locked temp file in the same
//! directory and renamed over the target. The parent directory must
//! already exist; individual writes never create layout.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::error::{Error, Result};

/// Write `content` to `path`, enforcing a single trailing newline.
///
/// Fails with [`Error::InvalidTargetPath`] when the parent directory does
/// not exist; bootstrap is the only operation that creates directories.
pub fn write_normalized(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| Error::InvalidTargetPath {
        path: path.to_path_buf(),
    })?;
    if !parent.is_dir() {
        return Err(Error::InvalidTargetPath {
            path: path.to_path_buf(),
        });
    }

    let mut normalized = content.trim_end_matches('\n').to_string();
    normalized.push('\n');

    write_atomic(path, normalized.as_bytes())
}

/// Write bytes atomically via a locked temp file in the same directory.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    // Temp file in the same directory, so the rename stays on one filesystem.
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    // Lock released when the handle drops.
    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Read a metadata file as text.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
