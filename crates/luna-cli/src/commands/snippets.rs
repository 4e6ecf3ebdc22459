//! Snippets command

use std::path::Path;

use colored::Colorize;
use luna_snippets::SnippetCompletionProvider;

use crate::context::resolve_dir;
use crate::error::{CliError, Result};

pub fn run_snippets(file: &Path, json: bool) -> Result<()> {
    let path = resolve_dir(file)?;
    if !path.is_file() {
        return Err(CliError::user(format!("Snippet file not found: {}", path)));
    }

    let provider = SnippetCompletionProvider::new(path);
    let items = provider.provide_completion_items();

    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("{}", "No snippets".dimmed());
        return Ok(());
    }
    for item in items {
        println!("{}  {}", item.label.cyan().bold(), item.documentation.dimmed());
    }
    Ok(())
}
