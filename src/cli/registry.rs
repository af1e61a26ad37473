use std::collections::BTreeMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command. `keywords` are the fixed words accepted as the first
/// argument (`choose series`, `quote list`); they feed completion and help.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub aliases: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            aliases: &[],
            keywords: &[],
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_keywords(mut self, keywords: &'static [&'static str]) -> Self {
        self.keywords = keywords;
        self
    }

    fn spellings(&self) -> impl Iterator<Item = &'static str> {
        let aliases: &'static [&'static str] = self.aliases;
        std::iter::once(self.name).chain(aliases.iter().copied())
    }
}

/// Commands in registration order, looked up by name or alias. Registering a
/// name twice replaces the earlier entry in its original slot.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let slot = match self.lookup.get(entry.name) {
            Some(&slot) => {
                self.entries[slot] = entry;
                slot
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        for spelling in self.entries[slot].spellings() {
            self.lookup.insert(spelling, slot);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Primary names only; aliases are left out of suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Every accepted spelling with the keywords its command takes.
    pub fn vocabulary(&self) -> impl Iterator<Item = (&'static str, &'static [&'static str])> + '_ {
        self.lookup
            .iter()
            .map(|(&spelling, &slot)| (spelling, self.entries[slot].keywords))
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn aliases_resolve_to_the_primary_entry() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("exit", "Leave", "exit", noop).with_aliases(&["quit"]));
        assert_eq!(registry.get("quit").map(|entry| entry.name), Some("exit"));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["exit"]);
    }

    #[test]
    fn re_registering_keeps_the_slot() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("next", "Forward", "next", noop));
        registry.register(CommandEntry::new("prev", "Back", "prev", noop));
        registry.register(CommandEntry::new("next", "Advance", "next", noop));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["next", "prev"]);
        assert_eq!(registry.get("next").map(|entry| entry.description), Some("Advance"));
    }
}
