use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::warn;

use crate::config::{Config, ConfigManager};
use crate::statement::StatementController;
use crate::storage::{JsonFileSource, RecordSource, StaticSource};

use super::commands;
use super::errors::{CliError, CommandError};
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;
use super::ui::statement_view::{render_view, TerminalRenderer, ViewFormat};

const PROMPT: &str = "demonstrativo> ";
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub controller: StatementController<TerminalRenderer>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    /// Description of the source behind the current statement.
    pub source: Option<String>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let renderer = TerminalRenderer::new(ViewFormat::from_config(&config), false);
        let controller = StatementController::new(renderer).with_markers(config.markers());

        let mut context = Self {
            mode,
            registry,
            controller,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            source: None,
            last_command: None,
            running: true,
        };
        context.apply_config();
        context.load_initial_data();
        context.controller.renderer_mut().enabled = context.config.render_on_change;
        Ok(context)
    }

    /// Pushes config values into output preferences, the renderer and the
    /// controller.
    pub fn apply_config(&mut self) {
        output::set_preferences(OutputPreferences {
            plain_mode: self.config.plain_output,
            color_enabled: self.mode == CliMode::Interactive,
        });
        self.controller.renderer_mut().format = ViewFormat::from_config(&self.config);
        self.controller.set_markers(self.config.markers());
    }

    fn load_initial_data(&mut self) {
        if let Some(path) = self.config.data_file.clone() {
            let source = JsonFileSource::new(path);
            match self.controller.load(&source) {
                Ok(()) => self.source = Some(source.describe()),
                Err(err) => {
                    warn!(error = %err, "Configured data file could not be loaded");
                    output::warning(format!("{err}"));
                }
            }
        } else if self.mode == CliMode::Interactive {
            let source = StaticSource::sample();
            if self.controller.load(&source).is_ok() {
                self.source = Some(source.describe());
            }
        }
    }

    pub fn prompt(&self) -> String {
        PROMPT.to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Prints the current statement regardless of `render_on_change`.
    pub fn show_statement(&self) {
        let format = &self.controller.renderer().format;
        println!("{}", render_view(self.controller.view(), format));
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

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(name) = self.registry.closest(input, SUGGESTION_DISTANCE) {
            output::hint(format!("Did you mean `{name}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    pub fn print_warning(&self, message: impl fmt::Display) {
        output::warning(message);
    }
}
