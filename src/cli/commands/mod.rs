pub mod config;
pub mod items;
pub mod quote;
pub mod system;
pub mod wizard;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "status", "choose", "dims", "client", "acc", "next", "prev", "summary", "qty", "commit",
    "another", "items", "edit", "remove", "finalize", "quote", "reset", "catalog", "config",
    "help", "version", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(wizard::definitions());
    commands.extend(items::definitions());
    commands.extend(quote::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Reads a 1-based item position as typed by the operator.
pub(crate) fn parse_position(raw: Option<&&str>, usage: &str) -> Result<usize, CommandError> {
    raw.and_then(|value| value.parse::<usize>().ok())
        .filter(|position| *position >= 1)
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_a_fixed_position() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
    }

    #[test]
    fn positions_start_at_one() {
        assert_eq!(parse_position(Some(&"2"), "edit <n>").expect("valid"), 2);
        assert!(parse_position(Some(&"0"), "edit <n>").is_err());
        assert!(parse_position(None, "edit <n>").is_err());
    }
}
