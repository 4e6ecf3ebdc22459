//! Remove command

use std::path::Path;

use colored::Colorize;
use luna_typings::{IndexOutcome, RemoveRequest};

use super::print_failures;
use crate::context::{LunaContext, project_or_cwd, resolve_dir};
use crate::error::Result;

pub async fn run_remove(
    ctx: &LunaContext,
    project: Option<&Path>,
    target: Option<&Path>,
    paths: &[String],
) -> Result<()> {
    let root = project_or_cwd(project)?;
    let synchronizer = ctx.synchronizer(Some(&root))?;
    let target = match target {
        Some(target) => resolve_dir(target)?,
        None => synchronizer.locator().typings_target(&root),
    };

    let report = synchronizer
        .remove(RemoveRequest {
            target,
            relative_paths: paths.to_vec(),
            project_root: root,
        })
        .await?;

    for reference in &report.deleted {
        println!("  {} {}", "-".red(), reference);
    }
    print_failures(&report.delete_failed);

    match report.index {
        IndexOutcome::Rewritten { removed_lines } => {
            println!("{} {} reference(s) removed from index", "OK".green().bold(), removed_lines)
        }
        IndexOutcome::Deleted => println!("{} index emptied and deleted", "OK".green().bold()),
        IndexOutcome::Unchanged => println!("{}", "Index unchanged".dimmed()),
        IndexOutcome::Skipped => println!("{}", "Index not updated".yellow()),
    }
    if let Some(e) = &report.index_error {
        println!("  {} reference index: {}", "!".yellow(), e);
    }
    Ok(())
}
