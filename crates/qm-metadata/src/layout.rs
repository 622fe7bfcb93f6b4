//! The `.installation` metadata layout.
//!
//! File names here are fixed contracts other tooling depends on; renaming
//! any of them breaks installations in the field.

use std::path::{Path, PathBuf};

/// The reserved metadata directory inside an installation.
pub const METADATA_DIR: &str = ".installation";

/// Warning text written to the metadata README.
pub const README_CONTENT: &str =
    "WARNING: The files in .installation directory should be only edited by the provisioning tool.";

/// The files kept inside the metadata directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFile {
    /// The current component manifest.
    Manifest,
    /// The channel list with resolved names.
    Channels,
    /// The per-channel manifest version record.
    VersionRecord,
    /// The snapshot of the provisioning definition.
    ProvisioningRecord,
    /// The fixed warning text.
    Readme,
    /// Maven options owned by other tooling; only the slot is reserved.
    MavenOpts,
}

impl MetadataFile {
    /// Get the file name inside the metadata directory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest.yaml",
            Self::Channels => "installer-channels.yaml",
            Self::VersionRecord => "manifest_version.yaml",
            Self::ProvisioningRecord => "provisioning_record.xml",
            Self::Readme => "README.txt",
            Self::MavenOpts => "maven_opts.yaml",
        }
    }
}

impl AsRef<Path> for MetadataFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for MetadataFile {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for MetadataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The metadata directory of an installation.
pub fn metadata_dir(install_dir: &Path) -> PathBuf {
    install_dir.join(METADATA_DIR)
}

/// The full path of one metadata file.
pub fn metadata_path(install_dir: &Path, file: MetadataFile) -> PathBuf {
    metadata_dir(install_dir).join(file.as_str())
}
