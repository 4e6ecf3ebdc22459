//! Shared test fixtures for the luna workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`project`]: [`TestProject`] builder for a temporary Luna project
//! - [`bundle`]: [`TestBundle`] folder of declaration files

pub mod bundle;
pub mod project;

pub use bundle::TestBundle;
pub use project::TestProject;
