//! [`TestInstallation`] builder: a provisioned installation directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use qm_channels::Channel;
use qm_model::{Artifact, ComponentId, Manifest, Version};

/// A temporary installation directory with helper methods for metadata
/// bootstrap and assertions.
pub struct TestInstallation {
    temp_dir: TempDir,
}

impl Default for TestInstallation {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInstallation {
    /// Create an empty installation directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the installation root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Build a manifest from `(group, artifact, version)` triples.
    pub fn manifest_of(components: &[(&str, &str, &str)]) -> Manifest {
        Manifest::from_artifacts(
            components
                .iter()
                .map(|(g, a, v)| {
                    Artifact::new(
                        ComponentId::new(g, a).unwrap(),
                        Version::parse(v).unwrap(),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    /// Bootstrap the `.installation` metadata directory.
    pub fn bootstrap(&self, channels: &[Channel], components: &[(&str, &str, &str)]) {
        qm_metadata::generate(
            self.root(),
            channels,
            &Self::manifest_of(components),
            None,
            None,
        )
        .unwrap();
    }

    /// Write a provisioning definition at the default collaborator path
    /// and return its location.
    pub fn write_provisioning_definition(&self, content: &str) -> PathBuf {
        let dir = self.root().join(".provisioning");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("provisioning.xml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a metadata file relative to the installation root.
    pub fn read_file(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("could not read file: {}", path.display()))
    }

    /// Assert that `relative` exists under the installation root.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(path.exists(), "expected file to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist under the installation root.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(!path.exists(), "expected file NOT to exist: {}", path.display());
    }
}
