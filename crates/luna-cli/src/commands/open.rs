//! Open command: run the activation workflow for one folder

use std::path::Path;

use colored::Colorize;
use luna_typings::Activation;

use super::print_install_report;
use crate::context::{LunaContext, resolve_dir};
use crate::error::Result;

pub async fn run_open(ctx: &LunaContext, folder: &Path, plugins: &[String]) -> Result<()> {
    let folder = resolve_dir(folder)?;
    let activation = Activation::new(ctx.synchronizer(Some(&folder))?, ctx.plugin_typings());

    match activation.on_folder_added(&folder, plugins).await? {
        Some(report) => {
            println!("{} {}", "Luna project".bold(), folder.as_str().cyan());
            print_install_report(&report)
        }
        None => {
            println!("{} {}", "Not a Luna project:".yellow(), folder);
            Ok(())
        }
    }
}
