//! Provisioning definition snapshots.
//!
//! The external provisioning engine keeps its definition file outside the
//! metadata directory; updates snapshot it into
//! `provisioning_record.xml` so the installation stays self-describing.
//! Line endings are normalized on the way in, and a snapshot whose lines
//! already match the source is left untouched so repeated runs do not
//! churn the file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::io::write_normalized;
use crate::layout::{MetadataFile, metadata_path};

/// Snapshot the provisioning definition into the metadata directory.
///
/// Returns `true` when the snapshot was written, `false` when the source
/// is missing or the existing snapshot already matches line for line.
pub fn record_provisioning_definition(install_dir: &Path, source: &Path) -> Result<bool> {
    if !source.is_file() {
        debug!(source = %source.display(), "no provisioning definition to snapshot");
        return Ok(false);
    }

    let raw = fs::read_to_string(source).map_err(|e| Error::io(source, e))?;
    let normalized = normalize_line_endings(&raw);

    let target = metadata_path(install_dir, MetadataFile::ProvisioningRecord);
    if target.is_file() {
        let existing = fs::read_to_string(&target).map_err(|e| Error::io(&target, e))?;
        if lines_identical(&existing, &normalized) {
            debug!(target = %target.display(), "snapshot content unchanged, skipping");
            return Ok(false);
        }
    }

    write_normalized(&target, &normalized)?;
    Ok(true)
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Sequential line comparison; both sides must also run out of lines at
/// the same time.
fn lines_identical(left: &str, right: &str) -> bool {
    let mut left_lines = left.lines();
    let mut right_lines = right.lines();
    loop {
        match (left_lines.next(), right_lines.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l == r => {}
            _ => return false,
        }
    }
}
