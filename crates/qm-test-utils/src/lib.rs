//! Shared test builders for Quartermaster workspace tests.
//!
//! Not published; depended on as a dev-dependency by the other crates and
//! the integration test member.

pub mod installation;
pub mod repository;
pub mod source;

pub use installation::TestInstallation;
pub use repository::TestRepository;
pub use source::{StaticFactory, StaticSource};
