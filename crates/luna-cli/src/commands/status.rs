//! Status command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use crate::context::{LunaContext, project_or_cwd};
use crate::error::Result;

/// Run the status command
pub fn run_status(ctx: &LunaContext, project: Option<&Path>, json: bool) -> Result<()> {
    let root = project_or_cwd(project)?;
    let synchronizer = ctx.synchronizer(Some(&root))?;
    let locator = synchronizer.locator();
    let is_project = locator.is_recognized_project(&root);
    let target = locator.typings_target(&root);
    let status = synchronizer.status(Some(&target), Some(&root))?;

    if json {
        let output = json!({
            "project": root.as_str(),
            "isProject": is_project,
            "target": target.as_str(),
            "index": status.index_path.as_str(),
            "installed": status.installed,
            "missing": status.missing,
            "references": status.references,
            "dangling": status.dangling,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !is_project {
        println!("{}", "Not a Luna project".red().bold());
        println!();
        println!(
            "Create {} in {} to mark it as one.",
            locator.config().marker_file.cyan(),
            root
        );
        return Ok(());
    }

    println!("{}", "Typings Status".bold());
    println!();
    println!("{}:   {}", "Project".dimmed(), root);
    println!("{}:    {}", "Target".dimmed(), target);
    println!("{}:     {}", "Index".dimmed(), status.index_path);
    println!();

    println!("{}:", "Bundled Declarations".bold());
    for reference in &status.installed {
        println!("  {} {}", "+".green(), reference);
    }
    for reference in &status.missing {
        println!("  {} {} ({})", "-".dimmed(), reference, "not installed".yellow());
    }
    println!();

    println!("{}:", "Index References".bold());
    if status.references.is_empty() {
        println!("  {} (use {} to add)", "None".dimmed(), "luna install".cyan());
    }
    for reference in &status.references {
        if status.dangling.contains(reference) {
            println!("  {} {} ({})", "!".yellow(), reference, "missing file".yellow());
        } else {
            println!("  {} {}", "+".green(), reference);
        }
    }

    Ok(())
}
