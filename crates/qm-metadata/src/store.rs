//! Reading and writing the installation metadata files.
//!
//! `generate` is the one-time bootstrap that creates the reserved
//! directory; everything else replaces individual files idempotently and
//! requires the layout to already exist.

use std::fs;
use std::path::Path;

use tracing::info;

use qm_channels::{Channel, channels_from_yaml, channels_to_yaml};
use qm_model::{Manifest, ManifestVersionRecord};

use crate::error::{Error, Result};
use crate::io::{read_text, write_normalized};
use crate::layout::{MetadataFile, README_CONTENT, metadata_dir, metadata_path};
use crate::naming::assign_channel_names;
use crate::snapshot::record_provisioning_definition;

/// Bootstrap the metadata directory of a fresh installation.
///
/// Refuses to run when the reserved path exists as a non-directory or
/// when the manifest or channel files are already present; bootstrap is
/// not an overwrite operation.
pub fn generate(
    install_dir: &Path,
    channels: &[Channel],
    manifest: &Manifest,
    version_record: Option<&ManifestVersionRecord>,
    provisioning_source: Option<&Path>,
) -> Result<()> {
    let dir = metadata_dir(install_dir);
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotADirectory { path: dir });
    }

    let manifest_path = metadata_path(install_dir, MetadataFile::Manifest);
    let channels_path = metadata_path(install_dir, MetadataFile::Channels);
    if manifest_path.exists() || channels_path.exists() {
        return Err(Error::AlreadyInitialized { path: dir });
    }

    fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
    info!(dir = %dir.display(), "generating installation metadata");

    write_manifest(install_dir, manifest)?;
    write_channels(install_dir, channels)?;
    if let Some(record) = version_record {
        write_version_record(install_dir, record)?;
    }
    if let Some(source) = provisioning_source {
        record_provisioning_definition(install_dir, source)?;
    }
    write_readme(install_dir)?;
    Ok(())
}

/// Replace the persisted component manifest.
pub fn write_manifest(install_dir: &Path, manifest: &Manifest) -> Result<()> {
    let path = metadata_path(install_dir, MetadataFile::Manifest);
    write_normalized(&path, &manifest.to_yaml()?)
}

/// Replace the persisted channel list, naming any unnamed channel.
pub fn write_channels(install_dir: &Path, channels: &[Channel]) -> Result<()> {
    let named = assign_channel_names(channels);
    let path = metadata_path(install_dir, MetadataFile::Channels);
    write_normalized(&path, &channels_to_yaml(&named)?)
}

/// Replace the persisted manifest version record.
pub fn write_version_record(install_dir: &Path, record: &ManifestVersionRecord) -> Result<()> {
    let path = metadata_path(install_dir, MetadataFile::VersionRecord);
    write_normalized(&path, &record.to_yaml()?)
}

/// Write the metadata README once; an existing file is left alone.
pub fn write_readme(install_dir: &Path) -> Result<()> {
    let path = metadata_path(install_dir, MetadataFile::Readme);
    if path.exists() {
        return Ok(());
    }
    write_normalized(&path, README_CONTENT)
}

/// Load the persisted component manifest.
pub fn read_manifest(install_dir: &Path) -> Result<Manifest> {
    let path = metadata_path(install_dir, MetadataFile::Manifest);
    if !path.is_file() {
        return Err(Error::MetadataMissing { path });
    }
    Ok(Manifest::from_yaml(&read_text(&path)?)?)
}

/// Load the persisted channel list.
pub fn read_channels(install_dir: &Path) -> Result<Vec<Channel>> {
    let path = metadata_path(install_dir, MetadataFile::Channels);
    if !path.is_file() {
        return Err(Error::MetadataMissing { path });
    }
    Ok(channels_from_yaml(&read_text(&path)?)?)
}

/// Load the manifest version record; the record is advisory and may be
/// absent.
pub fn read_version_record(install_dir: &Path) -> Result<Option<ManifestVersionRecord>> {
    let path = metadata_path(install_dir, MetadataFile::VersionRecord);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(ManifestVersionRecord::from_yaml(&read_text(&path)?)?))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use qm_channels::Repository;
    use qm_model::{Artifact, ComponentId, Version};

    use super::*;

    fn manifest() -> Manifest {
        Manifest::from_artifacts(vec![Artifact::new(
            ComponentId::new("org.acme", "core").unwrap(),
            Version::parse("1.0.0").unwrap(),
        )])
        .unwrap()
    }

    fn channels() -> Vec<Channel> {
        vec![Channel::new(vec![Repository::new("central", "file:///repo")])]
    }

    // --- generate ---

    #[test]
    fn test_generate_creates_layout() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path(), &channels(), &manifest(), None, None).unwrap();

        assert!(metadata_path(tmp.path(), MetadataFile::Manifest).is_file());
        assert!(metadata_path(tmp.path(), MetadataFile::Channels).is_file());
        assert!(metadata_path(tmp.path(), MetadataFile::Readme).is_file());
        assert!(!metadata_path(tmp.path(), MetadataFile::VersionRecord).exists());
    }

    #[test]
    fn test_generate_writes_readme_contract() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path(), &channels(), &manifest(), None, None).unwrap();

        let readme = fs::read_to_string(metadata_path(tmp.path(), MetadataFile::Readme)).unwrap();
        assert_eq!(readme, format!("{README_CONTENT}\n"));
    }

    #[test]
    fn test_generate_names_channels() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path(), &channels(), &manifest(), None, None).unwrap();

        let persisted = read_channels(tmp.path()).unwrap();
        assert_eq!(persisted[0].name(), Some("channel-0"));
    }

    #[test]
    fn test_generate_rejects_non_directory_metadata_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".installation"), "not a directory").unwrap();

        let err = generate(tmp.path(), &channels(), &manifest(), None, None).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn test_generate_rejects_existing_manifest() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path(), &channels(), &manifest(), None, None).unwrap();

        let err = generate(tmp.path(), &channels(), &manifest(), None, None).unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized { .. }));
    }

    #[test]
    fn test_generate_snapshots_provisioning_definition() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("provisioning.xml");
        fs::write(&source, "<installation/>\n").unwrap();

        generate(tmp.path(), &channels(), &manifest(), None, Some(&source)).unwrap();
        let record = metadata_path(tmp.path(), MetadataFile::ProvisioningRecord);
        assert_eq!(fs::read_to_string(record).unwrap(), "<installation/>\n");
    }

    // --- individual writes and loaders ---

    #[test]
    fn test_manifest_roundtrip() {
        let tmp = TempDir::new().unwrap();
        generate(tmp.path(), &channels(), &manifest(), None, None).unwrap();

        let loaded = read_manifest(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.artifacts()[0].id().to_string(),
            "org.acme:core"
        );
    }

    #[test]
    fn test_write_manifest_requires_layout() {
        let tmp = TempDir::new().unwrap();
        let err = write_manifest(tmp.path(), &manifest()).unwrap_err();
        assert!(matches!(err, Error::InvalidTargetPath { .. }));
    }

    #[test]
    fn test_write_readme_does_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".installation")).unwrap();
        let path = metadata_path(tmp.path(), MetadataFile::Readme);
        fs::write(&path, "custom note\n").unwrap();

        write_readme(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "custom note\n");
    }

    #[test]
    fn test_read_manifest_missing_fails() {
        let tmp = TempDir::new().unwrap();
        let err = read_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::MetadataMissing { .. }));
    }

    #[test]
    fn test_read_channels_missing_fails() {
        let tmp = TempDir::new().unwrap();
        let err = read_channels(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::MetadataMissing { .. }));
    }

    #[test]
    fn test_read_version_record_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(read_version_record(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn test_version_record_roundtrip() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".installation")).unwrap();

        let mut record = ManifestVersionRecord::new();
        record.add_open(qm_model::OpenManifestVersion {
            repos: vec!["central".to_string()],
            strategy: "latest".to_string(),
        });
        write_version_record(tmp.path(), &record).unwrap();

        let loaded = read_version_record(tmp.path()).unwrap().unwrap();
        assert_eq!(loaded, record);
    }
}
