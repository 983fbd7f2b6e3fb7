use std::{
    borrow::Cow,
    collections::BTreeMap,
    io::{self, BufRead},
    path::Path,
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use wizard_core::{RenderedForm, SaveTrigger};
use wizard_domain::WidgetKind;

use crate::cli::commands::navigation::show_current_page;
use crate::cli::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

/// Setting this variable switches the shell to script mode: commands are
/// read line by line from stdin and dialogs answer no.
pub const SCRIPT_ENV: &str = "STUDY_WIZARD_CLI_SCRIPT";

pub fn run_shell(form_path: &Path) -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::open(form_path, mode)?;
    show_current_page(&context);

    let result = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    context.session.save(SaveTrigger::BeforeUnload);
    result
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context);
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    loop {
        if !context.running {
            break;
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                context.session.save(SaveTrigger::VisibilityChange);
                if context.confirm_exit() {
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
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = parse_command_line(line)?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, then the element keys each answer command
/// accepts, and hints the usage of a typed command.
struct CommandHelper {
    commands: Vec<String>,
    usages: BTreeMap<&'static str, &'static str>,
    targets: BTreeMap<&'static str, Vec<String>>,
}

impl CommandHelper {
    fn new(context: &ShellContext) -> Self {
        let mut commands: Vec<String> = context
            .command_names()
            .into_iter()
            .map(str::to_ascii_lowercase)
            .collect();
        commands.sort();
        commands.dedup();

        let usages = context
            .registry
            .iter()
            .map(|entry| (entry.name, entry.usage))
            .collect();

        Self {
            commands,
            usages,
            targets: answer_targets(context.session.form()),
        }
    }

    fn candidates(&self, command: Option<&str>, needle: &str) -> Vec<Pair> {
        let pool: &[String] = match command {
            None => &self.commands,
            Some(command) => match self.targets.get(command) {
                Some(keys) => keys,
                None => return Vec::new(),
            },
        };
        pool.iter()
            .filter(|name| name.starts_with(needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

/// Element keys grouped by the answer command that edits them.
fn answer_targets(form: &RenderedForm) -> BTreeMap<&'static str, Vec<String>> {
    let mut targets: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for widget in form.widgets() {
        let Some(key) = widget.key() else {
            continue;
        };
        let commands: &[&'static str] = match widget.kind {
            WidgetKind::Text => &["set"],
            WidgetKind::Checkbox => &["check", "uncheck"],
            WidgetKind::Radio if widget.is_other_option() => &["choose", "other"],
            WidgetKind::Radio => &["choose"],
        };
        for command in commands.iter().copied() {
            targets.entry(command).or_default().push(key.to_string());
        }
    }
    for keys in targets.values_mut() {
        keys.sort();
        keys.dedup();
    }
    targets
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
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();

        let candidates = match words.as_slice() {
            [] => self.candidates(None, &needle),
            [command] => self.candidates(Some(&command.to_ascii_lowercase()), &needle),
            _ => Vec::new(),
        };
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let command = line.strip_suffix(' ')?.trim().to_ascii_lowercase();
        let usage = self.usages.get(command.as_str())?;
        let arguments = usage.strip_prefix(command.as_str())?.trim_start();
        (!arguments.is_empty()).then(|| arguments.to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CommandError> {
    split(input)
        .map_err(|err| CommandError::InvalidArguments(format!("Cannot parse `{input}`: {err}")))
}
