//! Luna CLI
//!
//! Installs the bundled Luna type declarations into projects and keeps
//! their reference index up to date.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands};
use context::LunaContext;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let ctx = LunaContext::from_cli(&cli)?;
    match cli.command {
        Some(cmd) => execute_command(&ctx, cmd).await,
        None => {
            println!("{} Luna typings CLI", "luna".green().bold());
            println!();
            println!("Run {} for available commands.", "luna --help".cyan());
            Ok(())
        }
    }
}

async fn execute_command(ctx: &LunaContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Open { folder, plugins } => commands::run_open(ctx, &folder, &plugins).await,
        Commands::Install {
            project,
            target,
            plugins,
            paths,
        } => {
            commands::run_install(ctx, project.as_deref(), target.as_deref(), &plugins, &paths)
                .await
        }
        Commands::Remove {
            project,
            target,
            paths,
        } => commands::run_remove(ctx, project.as_deref(), target.as_deref(), &paths).await,
        Commands::Status { project, json } => commands::run_status(ctx, project.as_deref(), json),
        Commands::Snippets { file, json } => commands::run_snippets(&file, json),
        Commands::Telemetry { action } => commands::run_telemetry(ctx, action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "luna", &mut std::io::stdout());
            Ok(())
        }
    }
}
