//! Shared runtime state for CLI interactions and command execution.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use tokio::runtime::Runtime;

use alu_config::{Config, ConfigManager};
use alu_core::WizardSession;

use crate::backend::Backend;

use super::{formatters::CliFormatters, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    /// Drives collaborator calls; commands block on them one at a time.
    pub runtime: Runtime,
    pub home: PathBuf,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub backend: Backend,
    pub formatters: CliFormatters,
    pub session: WizardSession,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, session: {}, step: {} }}",
            self.running,
            self.last_command,
            self.session.id(),
            self.session.step()
        )
    }
}
