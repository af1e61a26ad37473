//! Line sources for the shell: a rustyline editor for operators, stdin for
//! scripts. Both feed the same filter and dispatcher.

use std::collections::BTreeMap;
use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;
use crate::cli::views;

/// Environment switch that makes the shell read commands from stdin without
/// prompting.
pub const SCRIPT_MODE_ENV: &str = "ALU_CONFIGURATOR_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    views::print_welcome(context);

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if let Some(text) = command_text(&line) {
                    editor.add_history_entry(text).ok();
                }
                if execute(context, &line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

pub(crate) fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running || execute(context, &line?)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

/// The command part of a raw line, or `None` for blank lines and `#`
/// comments.
pub(crate) fn command_text(line: &str) -> Option<&str> {
    let text = line.trim();
    (!text.is_empty() && !text.starts_with('#')).then_some(text)
}

/// Runs one raw line. Command failures are reported and the shell carries
/// on; only terminal I/O failures end it.
pub(crate) fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    let Some(text) = command_text(line) else {
        return Ok(LoopControl::Continue);
    };
    match handle_line(context, text) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read `{line}`: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Completes command names and aliases, then the keywords a command takes
/// as its first argument (`choose gl` -> `choose glazing`).
struct CommandHelper {
    vocabulary: BTreeMap<String, Vec<String>>,
}

impl CommandHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let vocabulary = registry
            .vocabulary()
            .map(|(spelling, keywords)| {
                let keywords = keywords.iter().map(|word| word.to_string()).collect();
                (spelling.to_ascii_lowercase(), keywords)
            })
            .collect();
        Self { vocabulary }
    }

    fn candidates(&self, line: &str) -> Vec<&str> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let typing_new_word = line.is_empty() || line.ends_with(char::is_whitespace);
        let (done, partial) = match (typing_new_word, words.split_last()) {
            (true, _) | (false, None) => (words.as_slice(), ""),
            (false, Some((last, done))) => (done, *last),
        };
        let partial = partial.to_lowercase();
        let pool: Vec<&str> = match done {
            [] => self.vocabulary.keys().map(String::as_str).collect(),
            [command] => self
                .vocabulary
                .get(&command.to_lowercase())
                .map(|keywords| keywords.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        pool.into_iter()
            .filter(|word| word.starts_with(&partial))
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let pairs = self
            .candidates(prefix)
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::register_all;

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        CommandHelper::new(&registry)
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert_eq!(command_text("   "), None);
        assert_eq!(command_text("  # walk to the client step"), None);
        assert_eq!(command_text("  next  "), Some("next"));
        assert_eq!(command_text("client notes \"porte #2\""), Some("client notes \"porte #2\""));
    }

    #[test]
    fn command_words_complete_with_aliases() {
        let helper = helper();
        assert_eq!(helper.candidates("qu"), vec!["quit", "quote"]);
        assert!(helper.candidates("").contains(&"back"));
    }

    #[test]
    fn first_argument_completes_from_keywords() {
        let helper = helper();
        assert_eq!(helper.candidates("choose gl"), vec!["glazing"]);
        assert_eq!(helper.candidates("CLIENT "), vec!["name", "email", "phone", "notes"]);
        assert!(helper.candidates("choose glazing Dou").is_empty());
        assert!(helper.candidates("dims ").is_empty());
    }
}
