//! Resolving the manifest version record of an open session.
//!
//! Every channel contributes one entry, keyed by how its manifest is
//! addressed: a coordinate with or without a pinned version, a URL pinned
//! by content hash, or no manifest at all. Recording versions is
//! best-effort; a channel whose manifest cannot be reached degrades to a
//! partial entry with a warning instead of failing the session.

use tracing::warn;

use qm_channels::{
    ChannelResolver, ChannelSession, ManifestCoordinate, MavenCoordinate, UrlFetcher,
    MANIFEST_CLASSIFIER, MANIFEST_EXTENSION,
};
use qm_metadata::content_checksum;
use qm_model::{
    Artifact, Manifest, ManifestVersionRecord, MavenManifestVersion, OpenManifestVersion,
    UrlManifestVersion, Version, VersionRange,
};

/// Collects the current manifest version of every channel a resolver has
/// open.
pub struct ManifestVersionResolver<'a> {
    resolver: &'a ChannelResolver,
}

impl<'a> ManifestVersionResolver<'a> {
    pub fn new(resolver: &'a ChannelResolver) -> Self {
        Self { resolver }
    }

    /// The manifest version of every channel, in configuration order.
    pub fn current_versions(&self) -> ManifestVersionRecord {
        let mut record = ManifestVersionRecord::new();
        for session in self.resolver.sessions() {
            match session.channel().manifest() {
                None => record.add_open(open_entry(session)),
                Some(ManifestCoordinate::Url(url)) => record.add_url(url_entry(url)),
                Some(ManifestCoordinate::Maven(coordinate)) => {
                    record.add_maven(maven_entry(session, coordinate));
                }
            }
        }
        record
    }
}

fn open_entry(session: &ChannelSession) -> OpenManifestVersion {
    OpenManifestVersion {
        repos: session
            .channel()
            .repositories()
            .iter()
            .map(|r| r.id().to_string())
            .collect(),
        strategy: session.channel().resolve_if_no_stream().to_string(),
    }
}

fn url_entry(url: &str) -> UrlManifestVersion {
    let content = UrlFetcher::new().and_then(|fetcher| fetcher.fetch_str(url));
    match content {
        Ok(content) => UrlManifestVersion {
            url: url.to_string(),
            hash: content_checksum(&content),
            description: Manifest::from_yaml(&content)
                .ok()
                .and_then(|m| m.name().map(String::from)),
        },
        Err(error) => {
            warn!(url, %error, "unable to fetch channel manifest, recording without hash");
            UrlManifestVersion {
                url: url.to_string(),
                hash: String::new(),
                description: None,
            }
        }
    }
}

fn maven_entry(session: &ChannelSession, coordinate: &MavenCoordinate) -> MavenManifestVersion {
    let mut entry = MavenManifestVersion {
        group_id: coordinate.group_id().to_string(),
        artifact_id: coordinate.artifact_id().to_string(),
        version: String::new(),
        description: None,
    };

    match coordinate.raw_version() {
        Some(raw) => {
            entry.version = raw.to_string();
            entry.description = pinned_manifest_name(session, coordinate);
        }
        None => match resolved_manifest_version(session, coordinate) {
            Some(version) => entry.version = version.to_string(),
            None => {
                warn!(
                    group = coordinate.group_id(),
                    artifact = coordinate.artifact_id(),
                    "channel manifest version could not be determined"
                );
            }
        },
    }
    entry
}

fn resolved_manifest_version(
    session: &ChannelSession,
    coordinate: &MavenCoordinate,
) -> Option<Version> {
    let id = coordinate.component_id().ok()?;
    match session.latest_version(&id, &VersionRange::any()) {
        Ok(version) => version,
        Err(error) => {
            warn!(coordinate = %id, %error, "channel manifest lookup failed");
            None
        }
    }
}

/// The declared name of a pinned channel manifest, if its document can be
/// fetched and parsed.
fn pinned_manifest_name(session: &ChannelSession, coordinate: &MavenCoordinate) -> Option<String> {
    let id = coordinate.component_id().ok()?;
    let version = coordinate.parsed_version().ok()??;
    let artifact = Artifact::new(id, version)
        .with_classifier(MANIFEST_CLASSIFIER)
        .with_extension(MANIFEST_EXTENSION);
    let path = match session.fetch(&artifact) {
        Ok(Some(path)) => path,
        Ok(None) => return None,
        Err(error) => {
            warn!(artifact = %artifact, %error, "channel manifest fetch failed");
            return None;
        }
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => Manifest::from_yaml(&content)
            .ok()
            .and_then(|m| m.name().map(String::from)),
        Err(error) => {
            warn!(path = %path.display(), %error, "channel manifest unreadable");
            None
        }
    }
}
