//! End-to-end update flows over file-backed repositories.
//!
//! These tests exercise the complete session: metadata bootstrap,
//! channel resolution, update planning, content installation, and
//! metadata rewrite.

use pretty_assertions::assert_eq;

use qm_channels::{ManifestCoordinate, MavenCoordinate};
use qm_engine::{EngineConfig, UpdateEngine};
use qm_model::{ComponentId, Version};
use qm_test_utils::{TestInstallation, TestRepository};

fn id(g: &str, a: &str) -> ComponentId {
    ComponentId::new(g, a).unwrap()
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

#[test]
fn test_full_update_cycle() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "1.2.0", b"core 1.2.0");
    repo.deploy("org.acme", "api", "2.1.0", b"api 2.1.0");
    let install = TestInstallation::new();
    install.bootstrap(
        &[repo.channel()],
        &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "2.0.0")],
    );

    let mut engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    assert_eq!(set.artifacts().len(), 2);

    engine.apply(&set).unwrap();

    // Content landed under artifacts/.
    assert_eq!(install.read_file("artifacts/core-1.2.0.jar"), "core 1.2.0");
    assert_eq!(install.read_file("artifacts/api-2.1.0.jar"), "api 2.1.0");

    // Metadata reflects the new versions.
    let manifest = qm_metadata::read_manifest(install.root()).unwrap();
    assert_eq!(manifest.find(&id("org.acme", "core")).unwrap().version(), &v("1.2.0"));
    assert_eq!(manifest.find(&id("org.acme", "api")).unwrap().version(), &v("2.1.0"));
    install.assert_file_exists(".installation/manifest_version.yaml");
}

#[test]
fn test_rescan_after_apply_is_empty() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "1.1.0", b"core");
    let install = TestInstallation::new();
    install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

    let mut engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    engine.apply(&set).unwrap();

    // A fresh session over the updated installation finds nothing.
    let engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    assert!(engine.find_updates().unwrap().is_empty());
}

#[test]
fn test_transitive_requirement_pulls_dependency_forward() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "2.0.0", b"core");
    repo.deploy_descriptor("org.acme", "core", "2.0.0", &[("org.acme", "api", "2.0.0")]);
    repo.deploy("org.acme", "api", "1.5.0", b"api old");
    repo.deploy("org.acme", "api", "2.0.0", b"api new");
    let install = TestInstallation::new();
    install.bootstrap(
        &[repo.channel()],
        &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "1.5.0")],
    );

    let mut engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_update(&id("org.acme", "core")).unwrap();

    // The single-component scan still pulls the requirement in.
    assert_eq!(set.artifacts().len(), 2);
    engine.apply(&set).unwrap();

    let manifest = qm_metadata::read_manifest(install.root()).unwrap();
    assert_eq!(manifest.find(&id("org.acme", "api")).unwrap().version(), &v("2.0.0"));
}

#[test]
fn test_requirement_already_satisfied_is_left_alone() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "2.0.0", b"core");
    repo.deploy_descriptor("org.acme", "core", "2.0.0", &[("org.acme", "api", "1.0.0")]);
    let install = TestInstallation::new();
    install.bootstrap(
        &[repo.channel()],
        &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "1.0.0")],
    );

    let engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    assert_eq!(set.artifacts().len(), 1);
    assert_eq!(set.artifacts().actions()[0].id(), &id("org.acme", "core"));
}

#[test]
fn test_unsatisfiable_requirement_fails_the_scan() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "2.0.0", b"core");
    repo.deploy_descriptor("org.acme", "core", "2.0.0", &[("org.acme", "api", "3.0.0")]);
    repo.deploy("org.acme", "api", "2.0.0", b"api");
    let install = TestInstallation::new();
    install.bootstrap(
        &[repo.channel()],
        &[("org.acme", "core", "1.0.0"), ("org.acme", "api", "1.0.0")],
    );

    let engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let err = engine.find_updates().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unable to find [org.acme:api] in version >= 3.0.0"
    );
}

#[test]
fn test_version_record_written_for_pinned_channel() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "1.1.0", b"core");
    repo.deploy_manifest("org.acme", "acme-manifest", "5.0.0", "Acme Platform");
    let channel = repo.channel().with_manifest(ManifestCoordinate::Maven(
        MavenCoordinate::new("org.acme", "acme-manifest").with_version("5.0.0"),
    ));
    let install = TestInstallation::new();
    install.bootstrap(&[channel], &[("org.acme", "core", "1.0.0")]);

    let mut engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    let record = engine.apply(&set).unwrap();

    assert_eq!(record.summary(), "[org.acme:acme-manifest:5.0.0]");
    assert_eq!(record.maven[0].description.as_deref(), Some("Acme Platform"));

    let persisted = qm_metadata::read_version_record(install.root()).unwrap().unwrap();
    assert_eq!(persisted, record);
}

#[test]
fn test_provisioning_definition_snapshot_tracks_updates() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "1.1.0", b"core");
    let install = TestInstallation::new();
    install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);
    install.write_provisioning_definition("<installation version=\"1\"/>\r\n");

    let mut engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    engine.apply(&set).unwrap();

    // The snapshot is normalized to LF.
    assert_eq!(
        install.read_file(".installation/provisioning_record.xml"),
        "<installation version=\"1\"/>\n"
    );
}
