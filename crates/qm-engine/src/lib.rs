//! Update resolution and manifest reconciliation for Quartermaster.
//!
//! The engine plans and executes updates against a provisioned
//! installation: [`UpdateFinder`] computes the closure of update actions a
//! root set needs, [`UpdateEngine`] runs whole plan/apply sessions over
//! the installation's metadata, channels, and provisioning collaborator.

pub mod engine;
pub mod error;
pub mod finder;
pub mod provisioning;
pub mod versions;

pub use engine::{EngineConfig, UpdateEngine};
pub use error::{Error, Result};
pub use finder::{ConstraintOutcome, UpdateFinder, UpdatePlan};
pub use provisioning::{
    FeaturePackPlan, FeaturePackUpdate, LocalInstaller, ProvisioningEngine, UpdateSet,
};
pub use versions::ManifestVersionResolver;
