//! [`TestRepository`] builder: a Maven-layout artifact repository on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use url::Url;

use qm_channels::{Channel, Repository};

/// A temporary artifact repository in the conventional
/// `group/segments/artifact/version/file` layout.
///
/// # Example
///
/// ```rust,no_run
/// use qm_test_utils::TestRepository;
///
/// let repo = TestRepository::new();
/// repo.deploy("org.acme", "core", "1.1.0", b"content");
/// repo.deploy_descriptor("org.acme", "core", "1.1.0", &[("org.acme", "api", "2.0.0")]);
/// let channel = repo.channel();
/// ```
pub struct TestRepository {
    temp_dir: TempDir,
}

impl Default for TestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepository {
    /// Create an empty repository directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the repository root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the repository root as a `file://` URL string.
    pub fn url(&self) -> String {
        Url::from_directory_path(self.root()).unwrap().to_string()
    }

    /// Return a [`Repository`] definition pointing at this repository.
    pub fn repository(&self, id: &str) -> Repository {
        Repository::new(id, self.url())
    }

    /// Return an open channel backed by this repository alone.
    pub fn channel(&self) -> Channel {
        Channel::new(vec![self.repository("test")])
    }

    fn version_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        let mut dir = self.root().to_path_buf();
        for segment in group.split('.') {
            dir.push(segment);
        }
        dir.push(artifact);
        dir.push(version);
        dir
    }

    /// Deploy artifact content as `artifact-version.jar`.
    pub fn deploy(&self, group: &str, artifact: &str, version: &str, content: &[u8]) {
        self.deploy_file(
            group,
            artifact,
            version,
            &format!("{artifact}-{version}.jar"),
            content,
        );
    }

    /// Deploy a dependency descriptor listing `(group, artifact, version)`
    /// floors for the given artifact version.
    pub fn deploy_descriptor(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        requirements: &[(&str, &str, &str)],
    ) {
        let mut yaml = String::from("schemaVersion: 1.0.0\ndependencies:\n");
        for (g, a, v) in requirements {
            yaml.push_str(&format!(
                "  - groupId: {g}\n    artifactId: {a}\n    version: {v}\n"
            ));
        }
        self.deploy_file(
            group,
            artifact,
            version,
            &format!("{artifact}-{version}-dependencies.yaml"),
            yaml.as_bytes(),
        );
    }

    /// Deploy a channel manifest artifact with the given declared name.
    pub fn deploy_manifest(&self, group: &str, artifact: &str, version: &str, name: &str) {
        let yaml = format!("schemaVersion: 1.0.0\nname: {name}\nstreams: []\n");
        self.deploy_file(
            group,
            artifact,
            version,
            &format!("{artifact}-{version}-manifest.yaml"),
            yaml.as_bytes(),
        );
    }

    /// Deploy an arbitrary file under the artifact version directory.
    pub fn deploy_file(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        file_name: &str,
        content: &[u8],
    ) {
        let dir = self.version_dir(group, artifact, version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), content).unwrap();
    }
}
