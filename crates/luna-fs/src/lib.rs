//! Filesystem primitives for the Luna typings tools
//!
//! Provides normalized path handling, atomic writes, streaming copies and
//! the scoped advisory lock that serializes index rewrites within a project.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod lock;
pub mod path;

pub use config::ConfigStore;
pub use constants::LunaPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use lock::ProjectLock;
pub use path::NormalizedPath;
