//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Luna - keep bundled type declarations in sync with your projects
#[derive(Parser, Debug)]
#[command(name = "luna")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Synchronizer config file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "LUNA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Declaration bundle folder (defaults to the declarations built into luna)
    #[arg(long, global = true, env = "LUNA_BUNDLE")]
    pub bundle: Option<PathBuf>,

    /// Telemetry settings file
    #[arg(long, global = true, env = "LUNA_TELEMETRY_SETTINGS", hide = true)]
    pub telemetry_settings: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Set up typings for a workspace folder, if it is a Luna project
    ///
    /// Examples:
    ///   luna open .                          # Default typings
    ///   luna open app --plugin luna-plugin-qrcode
    Open {
        /// Workspace folder
        #[arg(default_value = ".")]
        folder: PathBuf,

        /// Plugins used by the project
        #[arg(short, long = "plugin")]
        plugins: Vec<String>,
    },

    /// Install declarations and reference them from the index
    ///
    /// Without paths or plugins, the default declarations are installed.
    Install {
        /// Project root (defaults to the current directory unless --target is given)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Folder receiving the declarations
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Also install the declarations of these plugins
        #[arg(long = "plugin")]
        plugins: Vec<String>,

        /// Bundle-relative declaration paths
        paths: Vec<String>,
    },

    /// Delete installed declarations and drop their references
    Remove {
        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Folder holding the declarations
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Bundle-relative declaration paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show installed declarations and index references
    Status {
        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the completions offered by a snippet file
    Snippets {
        /// TextMate snippet JSON file
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show or change the telemetry preference
    Telemetry {
        #[arg(value_enum)]
        action: TelemetryAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryAction {
    On,
    Off,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_with_plugins() {
        let cli = Cli::parse_from([
            "luna",
            "install",
            "--project",
            "app",
            "--plugin",
            "luna-plugin-qrcode",
            "luna/luna.d.ts",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Install {
                project: Some(PathBuf::from("app")),
                target: None,
                plugins: vec!["luna-plugin-qrcode".into()],
                paths: vec!["luna/luna.d.ts".into()],
            })
        );
    }

    #[test]
    fn remove_requires_paths() {
        assert!(Cli::try_parse_from(["luna", "remove"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["luna", "status", "--verbose", "--bundle", "b"]);
        assert!(cli.verbose);
        assert_eq!(cli.bundle, Some(PathBuf::from("b")));
    }

    #[test]
    fn telemetry_action_parses() {
        let cli = Cli::parse_from(["luna", "telemetry", "off"]);
        assert_eq!(
            cli.command,
            Some(Commands::Telemetry {
                action: TelemetryAction::Off
            })
        );
    }
}
