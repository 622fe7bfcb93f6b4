//! Command implementations

pub mod status;
pub mod update;

pub use status::run_status;
pub use update::run_update;
