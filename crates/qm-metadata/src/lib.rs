//! Installation metadata persistence for Quartermaster.
//!
//! Every provisioned installation carries a reserved `.installation`
//! directory describing what is installed and where it came from: the
//! component manifest, the channel list, the manifest version record and a
//! snapshot of the provisioning definition. This crate owns that layout:
//! one-time bootstrap, idempotent normalized rewrites, channel naming and
//! the snapshot logic that avoids spurious diffs.

pub mod checksum;
pub mod error;
pub mod io;
pub mod layout;
pub mod naming;
pub mod snapshot;
pub mod store;

pub use checksum::{content_checksum, file_checksum};
pub use error::{Error, Result};
pub use layout::{METADATA_DIR, MetadataFile, README_CONTENT, metadata_dir, metadata_path};
pub use naming::assign_channel_names;
pub use snapshot::record_provisioning_definition;
pub use store::{
    generate, read_channels, read_manifest, read_version_record, write_channels, write_manifest,
    write_readme, write_version_record,
};
