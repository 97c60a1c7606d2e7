use std::borrow::Cow;
use std::fmt;
use std::io::{self, BufRead};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent};
use shell_words::split;
use tracing::debug;

use crate::utils::paths::PathResolver;

use super::context::{CliMode, LoopControl, ShellContext};
use super::errors::{CliError, CommandError};
use super::output;

/// Environment variable switching the shell to line-by-line stdin input.
pub const SCRIPT_ENV: &str = "DEMONSTRATIVO_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::ctrl(' '), Cmd::Complete);

    let history = PathResolver::history_file_in(&PathResolver::base_dir());
    if editor.load_history(&history).is_err() {
        debug!(path = %history.display(), "No shell history yet");
    }

    output::info("Type `help` for commands, `show` to print the statement.");
    context.show_statement();

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        debug!(error = %err, "Could not save shell history");
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err);
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// First-argument keywords offered after a command word.
const ARGUMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("period", &["safra", "ano", "mes"]),
    ("group", &["safra", "mes"]),
    ("ir", &["on", "off"]),
    ("cc", &["list", "all", "none", "select", "deselect"]),
    ("expand", &["all"]),
    ("collapse", &["all"]),
    ("config", &["show", "set"]),
];

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates<'a>(&'a self, line: &str) -> (usize, Vec<&'a str>) {
        let start = line.rfind(|ch: char| ch.is_ascii_whitespace()).map_or(0, |idx| idx + 1);
        let needle = line[start..].to_ascii_lowercase();
        let words: Vec<&str> = line[..start].split_whitespace().collect();

        let pool: Vec<&str> = match words.as_slice() {
            [] => self.commands.iter().map(String::as_str).collect(),
            [command] => ARGUMENT_KEYWORDS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, keywords)| keywords.to_vec())
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(&needle))
            .collect();
        (start, matches)
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    /// Completes the command word and the keyword right after it.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
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

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = parse_command_line(r#"cc select "CC – Cria""#).unwrap();
        assert_eq!(tokens, ["cc", "select", "CC – Cria"]);
    }

    #[test]
    fn completion_offers_commands_then_keywords() {
        let helper = CommandHelper::new(vec!["period", "show", "options"]);
        assert_eq!(helper.candidates("pe"), (0, vec!["period"]));
        assert_eq!(helper.candidates("period a"), (7, vec!["ano"]));
        assert_eq!(helper.candidates("show x"), (5, Vec::<&str>::new()));
        assert_eq!(helper.candidates("period ano 20").1, Vec::<&str>::new());
    }

    #[test]
    fn unbalanced_quotes_are_parse_errors() {
        assert!(parse_command_line(r#"load "demo.json"#).is_err());
    }
}
