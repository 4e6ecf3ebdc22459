//! Typings synchronizer for Luna projects
//!
//! Installs the declaration files bundled with the Luna tools into a
//! project and maintains the project's reference index:
//!
//! ```text
//!   <project>/luna.project                    marker file
//!   <project>/.vscode/typings/<relative path> installed declarations
//!   <project>/typings/luna-typings.d.ts       reference index
//! ```
//!
//! - [`ProjectLocator`] recognizes projects and resolves their folders
//! - [`DeclarationSource`] abstracts where bundled declarations come from
//! - [`ReferenceIndex`] reads and rewrites the index file
//! - [`TypingsSynchronizer`] installs, removes and reports on declarations
//! - [`Activation`] runs the synchronizer when a workspace folder appears
//! - [`telemetry`] wraps operations in anonymized usage events

pub mod activation;
pub mod bundle;
pub mod config;
pub mod error;
pub mod index;
pub mod plugins;
pub mod project;
pub mod synchronizer;
pub mod telemetry;

pub use activation::Activation;
pub use bundle::{DeclarationSource, DirectoryBundle, EmbeddedBundle, validate_reference};
pub use config::SyncConfig;
pub use error::{Error, Result};
pub use index::{ReferenceIndex, reference_line};
pub use plugins::PluginTypings;
pub use project::ProjectLocator;
pub use synchronizer::{
    EntryFailure, IndexOutcome, InstallReport, InstallRequest, RemoveReport, RemoveRequest,
    TypingsStatus, TypingsSynchronizer,
};
pub use telemetry::{Telemetry, TelemetryEvent, TelemetrySettings};
