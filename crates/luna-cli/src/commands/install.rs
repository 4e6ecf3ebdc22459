//! Install command

use std::path::Path;

use colored::Colorize;
use luna_typings::InstallRequest;

use super::print_install_report;
use crate::context::{LunaContext, project_or_cwd, resolve_dir};
use crate::error::{CliError, Result};

/// Install `paths` plus the declarations of `plugins`.
///
/// With neither, the configured default declarations are installed. The
/// project root defaults to the current directory unless only `--target`
/// is given, in which case the index is kept in the target folder.
pub async fn run_install(
    ctx: &LunaContext,
    project: Option<&Path>,
    target: Option<&Path>,
    plugins: &[String],
    paths: &[String],
) -> Result<()> {
    let root = match (project, target) {
        (None, Some(_)) => None,
        (project, _) => Some(project_or_cwd(project)?),
    };
    let synchronizer = ctx.synchronizer(root.as_ref())?;

    let target = match target {
        Some(target) => resolve_dir(target)?,
        None => synchronizer
            .locator()
            .get_or_create_typings_target(root.as_ref())?
            .ok_or_else(|| CliError::user("No typings target: pass --project or --target"))?,
    };

    let mut relative_paths = paths.to_vec();
    if !plugins.is_empty() {
        match ctx.plugin_typings() {
            Some(mapping) => {
                for file in mapping.typings_for(plugins) {
                    if !relative_paths.contains(&file) {
                        relative_paths.push(file);
                    }
                }
            }
            None => println!("{} plugin typings unavailable, skipping plugins", "!".yellow()),
        }
    }
    if paths.is_empty() && plugins.is_empty() {
        relative_paths = synchronizer.config().default_typings.clone();
    }

    println!("{} into {}", "Installing typings".bold(), target.as_str().cyan());
    let report = synchronizer
        .install(InstallRequest {
            target,
            relative_paths,
            project_root: root,
        })
        .await?;
    print_install_report(&report)
}
