use alu_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::formatters::CliFormatters;
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;

const CONFIG_USAGE: &str = "config show | config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        CONFIG_USAGE,
        cmd_config,
    )
    .with_keywords(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_config(context),
        ["set", key, rest @ ..] => set_config_value(context, key, &rest.join(" ")),
        _ => Err(CommandError::InvalidArguments(format!("usage: {CONFIG_USAGE}"))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    section("Configuration");
    for key in Config::KEYS {
        line(format!("  {:<30} {}", key, context.config.value_of(key)?));
    }
    line(format!(
        "  {:<30} {}",
        "(file)",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_lowercase();
    let mut updated = context.config.clone();
    updated.set_value(&key, value)?;
    context.config = updated;
    context.persist_config()?;
    io::apply_config(&context.config);
    context.formatters = CliFormatters::new(&context.config);
    io::print_success("Configuration updated.");
    if key.starts_with("backend.") {
        context.print_hint("Backend changes apply to the next session. Run `reset` to switch now.");
    }
    Ok(())
}
