//! Telemetry preference command

use colored::Colorize;
use luna_typings::TelemetrySettings;

use crate::cli::TelemetryAction;
use crate::context::LunaContext;
use crate::error::Result;

pub fn run_telemetry(ctx: &LunaContext, action: TelemetryAction) -> Result<()> {
    let path = ctx.settings_path()?;
    let mut settings = TelemetrySettings::load_or_init(&path)?;

    match action {
        TelemetryAction::On | TelemetryAction::Off => {
            settings.set_opt_in(action == TelemetryAction::On);
            settings.save(&path)?;
            tracing::debug!(path = %path, opt_in = settings.opt_in(), "Saved telemetry settings");
        }
        TelemetryAction::Status => {}
    }

    let state = if settings.opt_in() {
        "enabled".green()
    } else {
        "disabled".yellow()
    };
    println!("{}: {}", "Telemetry".bold(), state);
    println!("{}: {}", "User type".dimmed(), settings.user_type().as_str());
    Ok(())
}
