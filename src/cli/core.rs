//! Core CLI dispatch and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tokio::runtime::Builder;
use tracing::info;

use alu_config::{resolve_home_dir, ConfigError, ConfigManager};
use alu_core::{
    open_session, CatalogLoadError, FinalizeError, LoadQuoteError, WizardError, WizardStep,
};
use alu_storage_json::StorageError;

pub use crate::errors::CliError;
use crate::{backend::build_backend, errors::AppError};

use super::commands;
use super::formatters::CliFormatters;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, resolve_home_dir())
    }

    /// Loads configuration under `home`, wires the backend it names and
    /// opens the first session. A catalog that fails to load is fatal.
    pub(crate) fn open(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::from)?;
        let backend = build_backend(&config, &home)?;
        let session = runtime.block_on(open_session(backend.services.catalog.as_ref()))?;
        info!(session_id = %session.id(), "session opened");

        Ok(ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            runtime,
            home,
            config_manager,
            formatters: CliFormatters::new(&config),
            config,
            backend,
            session,
            last_command: None,
            running: true,
        })
    }

    /// Rebuilds the backend from the current configuration and replaces the
    /// session with a fresh one over a newly loaded catalog. On failure the
    /// current session is kept.
    pub(crate) fn start_new_session(&mut self) -> CommandResult {
        let backend = build_backend(&self.config, &self.home)?;
        let session = self
            .runtime
            .block_on(open_session(backend.services.catalog.as_ref()))?;
        info!(
            previous_session = %self.session.id(),
            session_id = %session.id(),
            "session replaced"
        );
        self.backend = backend;
        self.session = session;
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn prompt(&self) -> String {
        let step = self.session.step();
        let items = self.session.ledger().len();
        let quote = match items {
            0 => String::new(),
            1 => " | 1 item".to_string(),
            n => format!(" | {n} items"),
        };
        format!(
            "alu [{}/{} {}{}]> ",
            step.number(),
            WizardStep::COUNT,
            step.title(),
            quote
        )
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Did you mean `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.session.ledger().is_empty() {
            "Exit shell?"
        } else {
            "Exit shell? Unsaved quote items will be lost."
        };
        cli_io::confirm_action(&self.theme, prompt, false).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Wizard(WizardError::Validation(validation)) => {
                for issue in &validation.issues {
                    self.print_error(&format!("{}: {}", issue.field, issue.message));
                }
            }
            CommandError::Wizard(WizardError::SummaryRequired) => {
                self.print_error(&WizardError::SummaryRequired.to_string());
                self.print_hint("Run `summary` to price this configuration.");
            }
            CommandError::Wizard(WizardError::Pricing(pricing)) => {
                self.print_error(&pricing.to_string());
                self.print_hint("Your selection is kept. Adjust it and run `summary` again.");
            }
            CommandError::LoadQuote(LoadQuoteError::Parse(parse)) => {
                self.print_error(&parse.to_string());
                self.print_hint("Started a fresh session instead.");
            }
            CommandError::Finalize(err @ FinalizeError::Document { .. }) => {
                self.print_warning(&err.to_string());
            }
            other => self.print_error(&other.to_string()),
        }
        Ok(())
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
    #[error(transparent)]
    LoadQuote(#[from] LoadQuoteError),
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(home: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::open(CliMode::Script, home)?;
    crate::cli::shell::run_script(&mut app, lines.join("\n").as_bytes())?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alu_core::{build_save_payload, ItemLedger};
    use alu_domain::{
        Accessory, ChassisType, ConfiguredItem, Finish, GlazingType, PricedBreakdown,
        ProfileSeries, SelectionState,
    };
    use alu_storage_json::{CatalogFile, JsonCatalog, JsonQuoteStore, StoragePaths};
    use tempfile::{tempdir, TempDir};

    fn seeded_home() -> TempDir {
        let home = tempdir().expect("tempdir");
        let paths = StoragePaths::under(&home.path().join("data"));
        JsonCatalog::new(paths.catalog_file)
            .save(&CatalogFile {
                chassis_types: vec![ChassisType::new("Fenêtre", (400, 2400), (300, 2200))],
                profile_series: vec![
                    ProfileSeries::new("Serie 40", 85.0),
                    ProfileSeries::new("Serie 60", 110.0),
                ],
                glazing_types: vec![GlazingType::new("Double 4/16/4", 320.0)],
                finishes: vec![Finish::new("Brut", 1.0)],
                accessories: vec![
                    Accessory::new("Poignée", 40.0),
                    Accessory::new("Rail", 25.0).incompatible_with("Serie 60"),
                ],
            })
            .expect("seed catalog");
        home
    }

    fn seed_quote(home: &TempDir) -> i64 {
        let mut selection = SelectionState::new();
        selection.chassis_type = Some("Fenêtre".into());
        selection.width = Some(1200);
        selection.height = Some(1000);
        selection.profile_series = Some("Serie 40".into());
        selection.glazing_type = Some("Double 4/16/4".into());
        selection.finish = Some("Brut".into());
        selection.client_name = "Atelier Benali".into();
        let ledger = ItemLedger::from_items(vec![
            ConfiguredItem::new(selection.clone(), PricedBreakdown::with_total(100.0), 2),
            ConfiguredItem::new(selection, PricedBreakdown::with_total(250.0), 1),
        ]);
        let store = JsonQuoteStore::new(StoragePaths::under(&home.path().join("data")).quotes_file);
        store
            .save_payload(&build_save_payload(&ledger).expect("payload"))
            .expect("seed quote")
            .quote_id
    }

    #[test]
    fn quoted_arguments_stay_whole() {
        let home = seeded_home();
        let context = process_script(
            home.path().to_path_buf(),
            &["# client first", "client name \"Atelier Benali\"", "client notes \"unclosed"],
        )
        .expect("script");
        assert_eq!(context.session.selection().client_name, "Atelier Benali");
        assert_eq!(context.session.selection().client_notes, "");
    }

    #[test]
    fn aliases_dispatch_like_the_command() {
        let home = seeded_home();
        let mut context =
            process_script(home.path().to_path_buf(), &["choose chassis Fenêtre", "next", "back"])
                .expect("script");
        assert_eq!(context.session.step(), WizardStep::ChassisType);
        assert_eq!(context.process_line("quit").expect("quit"), LoopControl::Exit);
    }

    #[test]
    fn missing_catalog_prevents_the_shell_from_starting() {
        let home = tempdir().expect("tempdir");
        let err = ShellContext::open(CliMode::Script, home.path().to_path_buf())
            .err()
            .expect("catalog error");
        assert!(err.to_string().contains("Failed to load catalog"));
    }

    #[test]
    fn script_walks_the_wizard_to_the_client_step() {
        let home = seeded_home();
        let context = process_script(
            home.path().to_path_buf(),
            &[
                "choose chassis fenêtre",
                "next",
                "dims 1200 1000",
                "next",
                "choose series \"serie 40\"",
                "next",
                "choose glazing \"Double 4/16/4\"",
                "next",
                "acc + Poignée 2",
                "next",
                "choose finish Brut",
                "next",
                "client name \"Atelier Benali\"",
            ],
        )
        .expect("script");

        assert_eq!(context.session.step(), WizardStep::Client);
        let selection = context.session.selection();
        assert_eq!(selection.chassis_type.as_deref(), Some("Fenêtre"));
        assert_eq!(selection.profile_series.as_deref(), Some("Serie 40"));
        assert_eq!(selection.accessory_quantity("Poignée"), 2);
        assert_eq!(selection.client_name, "Atelier Benali");
    }

    #[test]
    fn gate_failures_keep_the_step() {
        let home = seeded_home();
        let context = process_script(
            home.path().to_path_buf(),
            &["choose chassis Fenêtre", "next", "dims 5000 1000", "next"],
        )
        .expect("script");
        assert_eq!(context.session.step(), WizardStep::Dimensions);
    }

    #[test]
    fn oversized_quantities_and_dimensions_are_reported() {
        let home = seeded_home();
        let mut context = process_script(
            home.path().to_path_buf(),
            &[
                "choose chassis Fenêtre",
                "next",
                "dims 4000000000 4000000000",
                "acc + Poignée 9223372036854775807",
                "acc + Poignée 9223372036854775807",
            ],
        )
        .expect("script");
        assert_eq!(context.session.selection().width, Some(4_000_000_000));
        assert_eq!(context.session.selection().accessory_quantity("Poignée"), u32::MAX);
        assert!(context.process_line("next").is_err());
        assert_eq!(context.session.step(), WizardStep::Dimensions);
    }

    #[test]
    fn pricing_without_a_service_stays_on_client_step() {
        let home = seeded_home();
        let mut context = process_script(
            home.path().to_path_buf(),
            &[
                "choose chassis Fenêtre",
                "dims 1200 1000",
                "choose series \"Serie 40\"",
                "choose glazing \"Double 4/16/4\"",
                "choose finish Brut",
                "client name Benali",
            ],
        )
        .expect("script");
        for _ in 0..6 {
            context.process_line("next").expect("next");
        }
        assert_eq!(context.session.step(), WizardStep::Client);

        let err = context.process_line("summary").unwrap_err();
        assert!(matches!(err, CommandError::Wizard(WizardError::Pricing(_))));
        assert_eq!(context.session.step(), WizardStep::Client);
        assert_eq!(context.session.selection().client_name, "Benali");
    }

    #[test]
    fn incompatible_series_drops_forbidden_accessories() {
        let home = seeded_home();
        let context = process_script(
            home.path().to_path_buf(),
            &["acc + Rail", "choose series \"Serie 60\"", "acc + Rail"],
        )
        .expect("script");
        assert_eq!(context.session.selection().accessory_quantity("Rail"), 0);
        assert!(context.session.is_forbidden("Rail"));
    }

    #[test]
    fn stored_quote_loads_and_finalizes_again() {
        let home = seeded_home();
        let quote_id = seed_quote(&home);
        let mut context = process_script(
            home.path().to_path_buf(),
            &[&format!("quote edit {quote_id}")],
        )
        .expect("script");
        assert_eq!(context.session.ledger().len(), 2);
        assert_eq!(context.session.totals().total_price, 450.0);

        context.process_line("finalize").expect("finalize");
        assert!(context.session.ledger().is_empty());
        let book = context.backend.quote_book.clone().expect("local quotes");
        assert_eq!(book.list().expect("list").len(), 2);
        assert!(home
            .path()
            .join("data")
            .join("documents")
            .join("devis_2.txt")
            .exists());
    }

    #[test]
    fn unknown_quote_leaves_the_session_alone() {
        let home = seeded_home();
        let mut context =
            process_script(home.path().to_path_buf(), &["choose chassis Fenêtre"]).expect("script");
        let session_id = context.session.id();
        let err = context.process_line("quote edit 99").unwrap_err();
        assert!(matches!(err, CommandError::LoadQuote(LoadQuoteError::Fetch(_))));
        assert_eq!(context.session.id(), session_id);
        assert_eq!(
            context.session.selection().chassis_type.as_deref(),
            Some("Fenêtre")
        );
    }

    #[test]
    fn unknown_commands_do_not_fail_the_script() {
        let home = seeded_home();
        let mut context = process_script(home.path().to_path_buf(), &[]).expect("script");
        let outcome = context.process_line("sumary").expect("suggestion only");
        assert_eq!(outcome, LoopControl::Continue);
        assert_eq!(
            context.process_line("exit").expect("exit"),
            LoopControl::Exit
        );
    }

    #[test]
    fn reset_starts_a_new_session() {
        let home = seeded_home();
        let mut context =
            process_script(home.path().to_path_buf(), &["choose chassis Fenêtre"]).expect("script");
        let before = context.session.id();
        context.process_line("reset").expect("reset");
        assert_ne!(context.session.id(), before);
        assert!(context.session.selection().chassis_type.is_none());
    }
}
