//! The update session over one provisioned installation.
//!
//! [`UpdateEngine::open`] loads the persisted manifest and channel list,
//! opens every repository, and then serves plan/apply cycles. Applying a
//! set installs content, reconciles the in-memory manifest, and only
//! writes metadata back once every action has succeeded, so a failed
//! apply leaves the persisted state describing the pre-update
//! installation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use qm_channels::{Channel, ChannelResolver, DefaultSourceFactory, Repository, SourceFactory};
use qm_metadata::record_provisioning_definition;
use qm_model::{ComponentId, Manifest, ManifestVersionRecord};

use crate::error::Result;
use crate::finder::UpdateFinder;
use crate::provisioning::{LocalInstaller, ProvisioningEngine, UpdateSet};
use crate::versions::ManifestVersionResolver;

/// Session-level configuration, typically sourced from user settings.
#[derive(Debug, Default, Clone)]
pub struct EngineConfig {
    /// Component whose update the session calls out for post-update steps.
    pub anchor: Option<ComponentId>,
    /// Repositories consulted only when every channel misses.
    pub fallback_repositories: Vec<Repository>,
}

/// An open update session: the installation's metadata in memory plus its
/// channels' repositories opened for resolution.
pub struct UpdateEngine {
    install_dir: PathBuf,
    manifest: Manifest,
    channels: Vec<Channel>,
    resolver: ChannelResolver,
    config: EngineConfig,
    provisioning: Box<dyn ProvisioningEngine>,
}

impl UpdateEngine {
    /// Open a session over an installation with the default local
    /// provisioning collaborator.
    pub fn open(install_dir: impl Into<PathBuf>, config: EngineConfig) -> Result<Self> {
        let install_dir = install_dir.into();
        let installer = LocalInstaller::new(&install_dir);
        Self::open_with(install_dir, config, Box::new(installer), &DefaultSourceFactory)
    }

    /// Open a session with explicit collaborators.
    pub fn open_with(
        install_dir: impl Into<PathBuf>,
        config: EngineConfig,
        provisioning: Box<dyn ProvisioningEngine>,
        factory: &dyn SourceFactory,
    ) -> Result<Self> {
        let install_dir = install_dir.into();
        let manifest = qm_metadata::read_manifest(&install_dir)?;
        let channels = qm_metadata::read_channels(&install_dir)?;
        let resolver =
            ChannelResolver::open(&channels, &config.fallback_repositories, factory)?;
        debug!(
            dir = %install_dir.display(),
            components = manifest.len(),
            channels = channels.len(),
            "opened update session"
        );
        Ok(Self {
            install_dir,
            manifest,
            channels,
            resolver,
            config,
            provisioning,
        })
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plan updates for every installed component.
    pub fn find_updates(&self) -> Result<UpdateSet> {
        let plan = UpdateFinder::new(&self.manifest, &self.resolver).find_updates()?;
        Ok(UpdateSet::new(self.provisioning.feature_pack_plan()?, plan))
    }

    /// Plan updates rooted at a single component.
    pub fn find_update(&self, id: &ComponentId) -> Result<UpdateSet> {
        let plan = UpdateFinder::new(&self.manifest, &self.resolver).find_update(id)?;
        Ok(UpdateSet::new(self.provisioning.feature_pack_plan()?, plan))
    }

    /// The manifest version currently served by each channel.
    pub fn current_versions(&self) -> ManifestVersionRecord {
        ManifestVersionResolver::new(&self.resolver).current_versions()
    }

    /// Execute an update set against the installation.
    ///
    /// Feature packs apply first; any component artifact they refresh is
    /// skipped by the action loop. Metadata is only persisted after the
    /// whole set has been installed. Returns the manifest version record
    /// written alongside.
    pub fn apply(&mut self, set: &UpdateSet) -> Result<ManifestVersionRecord> {
        let refreshed = self.provisioning.apply_feature_packs(set.feature_packs())?;
        let mut covered: HashSet<ComponentId> = HashSet::with_capacity(refreshed.len());
        for artifact in refreshed {
            debug!(component = %artifact.id(), version = %artifact.version(), "refreshed by feature pack");
            covered.insert(artifact.id().clone());
            self.manifest.record(artifact);
        }

        for action in set.artifacts().actions() {
            if covered.contains(action.id()) {
                debug!(component = %action.id(), "already covered by a feature pack, skipping");
                continue;
            }
            let resolved = self.resolver.resolve(action.new_artifact())?;
            self.provisioning.install_artifact(action.old(), &resolved)?;
            self.manifest.apply(action)?;
            info!(action = %action, "updated");
        }

        qm_metadata::write_manifest(&self.install_dir, &self.manifest)?;
        let record = self.current_versions();
        qm_metadata::write_version_record(&self.install_dir, &record)?;
        record_provisioning_definition(&self.install_dir, &self.provisioning.definition_path())?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use qm_metadata::{MetadataFile, metadata_path};
    use qm_model::{Artifact, Version};
    use qm_test_utils::{TestInstallation, TestRepository};

    use crate::provisioning::{FeaturePackPlan, FeaturePackUpdate};

    use super::*;

    fn id(g: &str, a: &str) -> ComponentId {
        ComponentId::new(g, a).unwrap()
    }

    fn open(install: &TestInstallation) -> UpdateEngine {
        UpdateEngine::open(install.root(), EngineConfig::default()).unwrap()
    }

    // --- open ---

    #[test]
    fn test_open_requires_metadata() {
        let install = TestInstallation::new();
        let result = UpdateEngine::open(install.root(), EngineConfig::default());
        assert!(matches!(
            result,
            Err(crate::Error::Metadata(
                qm_metadata::Error::MetadataMissing { .. }
            ))
        ));
    }

    #[test]
    fn test_open_loads_manifest_and_channels() {
        let repo = TestRepository::new();
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let engine = open(&install);
        assert_eq!(engine.manifest().len(), 1);
        assert_eq!(engine.channels().len(), 1);
    }

    // --- plan and apply ---

    #[test]
    fn test_no_updates_available() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.0.0", b"same");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let set = open(&install).find_updates().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_apply_installs_content_and_persists_manifest() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.1.0", b"new content");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        assert_eq!(set.artifacts().len(), 1);

        engine.apply(&set).unwrap();

        install.assert_file_exists("artifacts/core-1.1.0.jar");
        assert_eq!(install.read_file("artifacts/core-1.1.0.jar"), "new content");

        let persisted = qm_metadata::read_manifest(install.root()).unwrap();
        assert_eq!(
            persisted.find(&id("org.acme", "core")).unwrap().version(),
            &Version::parse("1.1.0").unwrap()
        );
    }

    #[test]
    fn test_apply_writes_version_record() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.1.0", b"content");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        let record = engine.apply(&set).unwrap();

        assert_eq!(record.open.len(), 1);
        let persisted = qm_metadata::read_version_record(install.root())
            .unwrap()
            .unwrap();
        assert_eq!(persisted, record);
    }

    #[test]
    fn test_apply_snapshots_provisioning_definition() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.1.0", b"content");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);
        install.write_provisioning_definition("<installation/>\n");

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        engine.apply(&set).unwrap();

        assert_eq!(
            install.read_file(".installation/provisioning_record.xml"),
            "<installation/>\n"
        );
    }

    #[test]
    fn test_apply_without_definition_skips_snapshot() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.1.0", b"content");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        engine.apply(&set).unwrap();

        install.assert_file_not_exists(".installation/provisioning_record.xml");
    }

    #[test]
    fn test_transitive_requirement_updates_in_one_apply() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "2.0.0", b"core");
        repo.deploy_descriptor("org.acme", "core", "2.0.0", &[("org.acme", "api", "2.0.0")]);
        repo.deploy("org.acme", "api", "2.0.0", b"api");
        let install = TestInstallation::new();
        install.bootstrap(
            &[repo.channel()],
            &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "1.0.0")],
        );

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        assert_eq!(set.artifacts().len(), 2);
        engine.apply(&set).unwrap();

        let persisted = qm_metadata::read_manifest(install.root()).unwrap();
        assert_eq!(
            persisted.find(&id("org.acme", "api")).unwrap().version(),
            &Version::parse("2.0.0").unwrap()
        );
    }

    #[test]
    fn test_single_component_plan_leaves_others_alone() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "2.0.0", b"core");
        repo.deploy("org.acme", "api", "2.0.0", b"api");
        let install = TestInstallation::new();
        install.bootstrap(
            &[repo.channel()],
            &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "1.0.0")],
        );

        let engine = open(&install);
        let set = engine.find_update(&id("org.acme", "core")).unwrap();
        assert_eq!(set.artifacts().len(), 1);
        assert_eq!(set.artifacts().actions()[0].id(), &id("org.acme", "core"));
    }

    #[test]
    fn test_fallback_repositories_from_config() {
        let empty = TestRepository::new();
        let fallback = TestRepository::new();
        fallback.deploy("org.acme", "core", "1.0.0", b"pinned");
        let install = TestInstallation::new();
        install.bootstrap(&[empty.channel()], &[("org.acme", "core", "1.0.0")]);

        let config = EngineConfig {
            anchor: None,
            fallback_repositories: vec![fallback.repository("fallback")],
        };
        let engine = UpdateEngine::open(install.root(), config).unwrap();

        // The pinned version exists only in the fallback, so the plan is
        // empty rather than an error.
        let set = engine.find_updates().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_anchor_action_surfaces_from_plan() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "installer", "2.0.0", b"installer");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "installer", "1.0.0")]);

        let config = EngineConfig {
            anchor: Some(id("org.acme", "installer")),
            fallback_repositories: vec![],
        };
        let engine = UpdateEngine::open(install.root(), config).unwrap();
        let set = engine.find_updates().unwrap();

        let action = set.anchor_action(engine.config().anchor.as_ref()).unwrap();
        assert_eq!(action.new_version(), &Version::parse("2.0.0").unwrap());
    }

    // --- feature-pack interplay ---

    struct RefreshingInstaller {
        inner: LocalInstaller,
        refreshed: Artifact,
    }

    impl ProvisioningEngine for RefreshingInstaller {
        fn feature_pack_plan(&self) -> Result<FeaturePackPlan> {
            Ok(FeaturePackPlan::new(vec![FeaturePackUpdate::new(
                "org.acme:server-pack",
                "1.0.0",
                "1.1.0",
            )]))
        }

        fn apply_feature_packs(&self, _plan: &FeaturePackPlan) -> Result<Vec<Artifact>> {
            Ok(vec![self.refreshed.clone()])
        }

        fn install_artifact(&self, old: &Artifact, new: &Artifact) -> Result<()> {
            self.inner.install_artifact(old, new)
        }

        fn definition_path(&self) -> PathBuf {
            self.inner.definition_path()
        }
    }

    #[test]
    fn test_feature_pack_refresh_skips_duplicate_action() {
        let repo = TestRepository::new();
        repo.deploy("org.acme", "core", "1.1.0", b"core");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let refreshed = Artifact::new(id("org.acme", "core"), Version::parse("1.1.0").unwrap());
        let provisioning = RefreshingInstaller {
            inner: LocalInstaller::new(install.root()),
            refreshed,
        };
        let mut engine = UpdateEngine::open_with(
            install.root(),
            EngineConfig::default(),
            Box::new(provisioning),
            &DefaultSourceFactory,
        )
        .unwrap();

        let set = engine.find_updates().unwrap();
        assert!(!set.feature_packs().is_empty());
        assert_eq!(set.artifacts().len(), 1);
        engine.apply(&set).unwrap();

        // The feature pack covered the component; no copy took place.
        install.assert_file_not_exists("artifacts/core-1.1.0.jar");
        let persisted = qm_metadata::read_manifest(install.root()).unwrap();
        assert_eq!(
            persisted.find(&id("org.acme", "core")).unwrap().version(),
            &Version::parse("1.1.0").unwrap()
        );
    }

    #[test]
    fn test_failed_apply_leaves_metadata_untouched() {
        let repo = TestRepository::new();
        // Version is announced but its content file is a descriptor only,
        // so resolve() cannot materialize a jar.
        repo.deploy_file("org.acme", "core", "1.1.0", "unrelated.txt", b"");
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

        let mut engine = open(&install);
        let set = engine.find_updates().unwrap();
        assert_eq!(set.artifacts().len(), 1);
        assert!(engine.apply(&set).is_err());

        let persisted = qm_metadata::read_manifest(install.root()).unwrap();
        assert_eq!(
            persisted.find(&id("org.acme", "core")).unwrap().version(),
            &Version::parse("1.0.0").unwrap()
        );
        assert!(!metadata_path(install.root(), MetadataFile::VersionRecord).exists());
    }
}
