//! Channel precedence and fallback behavior across real repositories.

use pretty_assertions::assert_eq;

use qm_channels::{ChannelResolver, DefaultSourceFactory, Error as ChannelError};
use qm_engine::{EngineConfig, UpdateEngine};
use qm_model::{Artifact, ComponentId, Version, VersionRange};
use qm_test_utils::{TestInstallation, TestRepository};

fn id(g: &str, a: &str) -> ComponentId {
    ComponentId::new(g, a).unwrap()
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

#[test]
fn test_highest_version_across_channels_wins() {
    let stable = TestRepository::new();
    let dev = TestRepository::new();
    stable.deploy("org.acme", "core", "1.2.0", b"stable");
    dev.deploy("org.acme", "core", "1.5.0", b"dev");

    let resolver = ChannelResolver::open(
        &[stable.channel(), dev.channel()],
        &[],
        &DefaultSourceFactory,
    )
    .unwrap();

    let artifact = Artifact::new(id("org.acme", "core"), v("1.0.0"));
    let latest = resolver.find_latest(&artifact).unwrap();
    assert_eq!(latest.version(), &v("1.5.0"));
}

#[test]
fn test_fallback_only_consulted_on_full_miss() {
    let channel = TestRepository::new();
    let fallback = TestRepository::new();
    channel.deploy("org.acme", "core", "1.1.0", b"channel");
    fallback.deploy("org.acme", "core", "9.9.0", b"fallback");

    let resolver = ChannelResolver::open(
        &[channel.channel()],
        &[fallback.repository("fallback")],
        &DefaultSourceFactory,
    )
    .unwrap();

    // The channel answered, so the fallback's higher version is ignored.
    let artifact = Artifact::new(id("org.acme", "core"), v("1.0.0"));
    let latest = resolver.find_latest(&artifact).unwrap();
    assert_eq!(latest.version(), &v("1.1.0"));
}

#[test]
fn test_fallback_reuses_explicit_version() {
    let empty = TestRepository::new();
    let fallback = TestRepository::new();
    fallback.deploy("org.acme", "core", "1.0.0", b"pinned");
    fallback.deploy("org.acme", "core", "2.0.0", b"newer");

    let resolver = ChannelResolver::open(
        &[empty.channel()],
        &[fallback.repository("fallback")],
        &DefaultSourceFactory,
    )
    .unwrap();

    // Without a range the fallback must re-use 1.0.0, not search upward.
    let artifact = Artifact::new(id("org.acme", "core"), v("1.0.0"));
    let latest = resolver.find_latest(&artifact).unwrap();
    assert_eq!(latest.version(), &v("1.0.0"));
}

#[test]
fn test_fallback_searches_explicit_range() {
    let empty = TestRepository::new();
    let fallback = TestRepository::new();
    fallback.deploy("org.acme", "core", "1.4.0", b"in range");
    fallback.deploy("org.acme", "core", "2.0.0", b"out of range");

    let resolver = ChannelResolver::open(
        &[empty.channel()],
        &[fallback.repository("fallback")],
        &DefaultSourceFactory,
    )
    .unwrap();

    let artifact = Artifact::new(id("org.acme", "core"), v("1.0.0"))
        .with_range(VersionRange::parse("[1.0,2.0)").unwrap());
    let latest = resolver.find_latest(&artifact).unwrap();
    assert_eq!(latest.version(), &v("1.4.0"));
}

#[test]
fn test_miss_everywhere_is_artifact_not_found() {
    let empty = TestRepository::new();
    let resolver =
        ChannelResolver::open(&[empty.channel()], &[], &DefaultSourceFactory).unwrap();

    let artifact = Artifact::new(id("org.acme", "core"), v("1.0.0"));
    let err = resolver.find_latest(&artifact).unwrap_err();
    assert!(matches!(err, ChannelError::ArtifactNotFound { .. }));
}

#[test]
fn test_qualifier_ordering_prefers_final_release() {
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "2.0.0.Beta1", b"beta");
    repo.deploy("org.acme", "core", "2.0.0.Final", b"final");
    let install = TestInstallation::new();
    install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

    let engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    let set = engine.find_updates().unwrap();
    assert_eq!(
        set.artifacts().actions()[0].new_version(),
        &v("2.0.0.Final")
    );
}

#[test]
fn test_equivalent_spelling_is_not_an_update() {
    // 1.0 and 1.0.0 denote the same version.
    let repo = TestRepository::new();
    repo.deploy("org.acme", "core", "1.0", b"same");
    let install = TestInstallation::new();
    install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);

    let engine = UpdateEngine::open(install.root(), EngineConfig::default()).unwrap();
    assert!(engine.find_updates().unwrap().is_empty());
}
