//! Shell state, dispatch, and the CLI error types.

use std::{io, path::Path};

use strsim::levenshtein;
use tracing::info;
use wizard_config::{Config, ConfigError, ConfigManager};
use wizard_core::{CoreError, SystemClock, ValidationPolicy, WizardHost, WizardSession};
use wizard_domain::FormDocument;
use wizard_storage_json::JsonFileStore;

use crate::cli::commands::{all_definitions, CommandDefinition, CommandRegistry};
use crate::cli::host::TerminalHost;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::errors::WizardError;
use crate::generator::{build_rendered_form, load_form};
use crate::utils;

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

pub type CommandResult = Result<(), CommandError>;

pub type TerminalSession = WizardSession<JsonFileStore, TerminalHost, SystemClock>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub document: FormDocument,
    pub session: TerminalSession,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    /// Loads configuration and the form description, then starts (or
    /// resumes) the study session.
    pub fn open(form_path: &Path, mode: CliMode) -> Result<Self, CliError> {
        let home = utils::resolve_home();
        let config = ConfigManager::with_base_dir(home.clone())?.load()?;
        output::set_preferences(OutputPreferences {
            color: config.ui_color_enabled,
        });

        let document = load_form(form_path)?;
        let policy = policy_from(&config);
        let form = build_rendered_form(&document, &policy);
        let store = JsonFileStore::new(config.resolve_data_dir(&home))?;
        let host = TerminalHost::new(mode, config.resolve_export_dir());
        let session = WizardSession::start(
            form,
            policy,
            store,
            host,
            SystemClock,
            config.autosave_interval(),
        )?;
        info!(form = %form_path.display(), "shell opened");

        Ok(Self {
            mode,
            registry: CommandRegistry::new(all_definitions()),
            document,
            session,
            config,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        format!(
            "study [{}/{}]> ",
            self.session.current_page(),
            self.session.total_pages()
        )
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        self.session.tick();
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
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
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&mut self) -> bool {
        if self.mode == CliMode::Script {
            return true;
        }
        self.session.host_mut().confirm("Exit the study shell?")
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other.to_string()),
        }
    }
}

pub fn policy_from(config: &Config) -> ValidationPolicy {
    let settings = &config.validation;
    ValidationPolicy::new(
        settings.consent_field.clone(),
        settings.evaluation_pages.iter().copied(),
        settings.selection_suffixes.iter().cloned(),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("{0}")]
    Command(String),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Wizard(WizardError::Io(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Wizard(WizardError::Core(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Wizard(WizardError::Config(err))
    }
}
