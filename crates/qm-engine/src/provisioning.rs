//! The provisioning-engine seam and feature-pack interop.
//!
//! The engine that actually lays files on disk is an external
//! collaborator behind [`ProvisioningEngine`]. Applying its feature-pack
//! plan may refresh component artifacts as a side effect; the update set
//! reconciles by identity so those components are never updated twice.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use qm_model::{Artifact, ComponentId, UpdateAction};

use crate::error::{Error, Result};
use crate::finder::UpdatePlan;

/// One feature-pack level version transition.
#[derive(Debug, Clone)]
pub struct FeaturePackUpdate {
    producer: String,
    old_version: String,
    new_version: String,
}

impl FeaturePackUpdate {
    pub fn new(
        producer: impl Into<String>,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
    ) -> Self {
        Self {
            producer: producer.into(),
            old_version: old_version.into(),
            new_version: new_version.into(),
        }
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }
}

impl fmt::Display for FeaturePackUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ==> {}",
            self.producer, self.old_version, self.new_version
        )
    }
}

/// The feature-pack updates the collaborator proposes for one session.
#[derive(Debug, Clone, Default)]
pub struct FeaturePackPlan {
    updates: Vec<FeaturePackUpdate>,
}

impl FeaturePackPlan {
    pub fn new(updates: Vec<FeaturePackUpdate>) -> Self {
        Self { updates }
    }

    pub fn updates(&self) -> &[FeaturePackUpdate] {
        &self.updates
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// The external provisioning engine, at its interface.
pub trait ProvisioningEngine {
    /// The feature-pack updates currently available.
    fn feature_pack_plan(&self) -> Result<FeaturePackPlan>;

    /// Apply a feature-pack plan, returning the component artifacts it
    /// refreshed as a side effect.
    fn apply_feature_packs(&self, plan: &FeaturePackPlan) -> Result<Vec<Artifact>>;

    /// Install one resolved artifact over its previous version.
    fn install_artifact(&self, old: &Artifact, new: &Artifact) -> Result<()>;

    /// Where the collaborator keeps its provisioning definition.
    fn definition_path(&self) -> PathBuf;
}

/// Default collaborator: no feature packs, artifacts copied into
/// `<install>/artifacts/`.
pub struct LocalInstaller {
    install_dir: PathBuf,
}

impl LocalInstaller {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    fn artifacts_dir(&self) -> PathBuf {
        self.install_dir.join("artifacts")
    }
}

impl ProvisioningEngine for LocalInstaller {
    fn feature_pack_plan(&self) -> Result<FeaturePackPlan> {
        Ok(FeaturePackPlan::default())
    }

    fn apply_feature_packs(&self, _plan: &FeaturePackPlan) -> Result<Vec<Artifact>> {
        Ok(Vec::new())
    }

    fn install_artifact(&self, old: &Artifact, new: &Artifact) -> Result<()> {
        let content = new.path().ok_or_else(|| Error::MissingContent {
            id: new.id().clone(),
        })?;

        let dir = self.artifacts_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let target = dir.join(new.file_name());
        fs::copy(content, &target).map_err(|e| Error::io(&target, e))?;

        let previous = dir.join(old.file_name());
        if previous.is_file() {
            fs::remove_file(&previous).map_err(|e| Error::io(&previous, e))?;
        }
        Ok(())
    }

    fn definition_path(&self) -> PathBuf {
        self.install_dir.join(".provisioning").join("provisioning.xml")
    }
}

/// One session's proposed updates: the collaborator's feature-pack plan
/// paired with the component-level plan.
#[derive(Debug, Default)]
pub struct UpdateSet {
    feature_packs: FeaturePackPlan,
    artifacts: UpdatePlan,
}

impl UpdateSet {
    pub fn new(feature_packs: FeaturePackPlan, artifacts: UpdatePlan) -> Self {
        Self {
            feature_packs,
            artifacts,
        }
    }

    pub fn feature_packs(&self) -> &FeaturePackPlan {
        &self.feature_packs
    }

    pub fn artifacts(&self) -> &UpdatePlan {
        &self.artifacts
    }

    pub fn is_empty(&self) -> bool {
        self.feature_packs.is_empty() && self.artifacts.is_empty()
    }

    /// The action updating the configured anchor component, if the plan
    /// contains one.
    pub fn anchor_action(&self, anchor: Option<&ComponentId>) -> Option<&UpdateAction> {
        anchor.and_then(|id| self.artifacts.action_for(id))
    }
}

/// Copy helper shared by installers: where content for `artifact` lives
/// under an installation.
pub fn installed_artifact_path(install_dir: &Path, artifact: &Artifact) -> PathBuf {
    install_dir.join("artifacts").join(artifact.file_name())
}
