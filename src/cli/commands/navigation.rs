use wizard_core::{NavOutcome, ResumeOutcome, SaveTrigger, SubmitOutcome};

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::render::{blocked_reason, page_lines};

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("show", "Show the current page", "show", cmd_show),
        CommandDefinition::new("next", "Go to the next page", "next", cmd_next),
        CommandDefinition::new("back", "Go to the previous page", "back", cmd_back),
        CommandDefinition::new(
            "submit",
            "Export all answers from the last page",
            "submit",
            cmd_submit,
        ),
        CommandDefinition::new(
            "reset",
            "Clear saved progress and every answer",
            "reset",
            cmd_reset,
        ),
        CommandDefinition::new("save", "Save progress now", "save", cmd_save),
        CommandDefinition::new("status", "Show session details", "status", cmd_status),
    ]
}

pub(crate) fn show_current_page(context: &ShellContext) {
    let session = &context.session;
    let number = session.current_page();
    let progress = session.progress();
    let Some(page) = context.document.page(number) else {
        io::print_warning(format!("Page {} is not part of this form.", number));
        return;
    };

    if page.title.trim().is_empty() {
        output::section(&progress.label);
    } else {
        output::section(format!("{} | {}", progress.label, page.title.trim()));
    }
    let last = session.navigator().is_last();
    for line in page_lines(page, session.form(), last) {
        output::line(line);
    }
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    show_current_page(context);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.next() {
        NavOutcome::Moved(_) => show_current_page(context),
        NavOutcome::Blocked => {
            let page = context.session.current_page();
            io::print_warning(blocked_reason(context.session.policy(), page));
        }
        NavOutcome::AtBoundary => {
            io::print_info("This is the last page. Use `submit` to finish the study.")
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.back() {
        NavOutcome::Moved(_) => show_current_page(context),
        NavOutcome::Blocked | NavOutcome::AtBoundary => {
            io::print_info("Already on the first page.")
        }
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.session.submit()? {
        SubmitOutcome::Blocked => {
            let session = &context.session;
            if session.navigator().is_last() {
                io::print_warning(blocked_reason(session.policy(), session.current_page()));
            } else {
                io::print_warning("Submission is only available on the last page.");
            }
        }
        SubmitOutcome::Submitted { document, reset } => {
            io::print_success(format!(
                "Submitted session {} with {} responses.",
                document.session_id,
                document.responses.len()
            ));
            if reset {
                show_current_page(context);
            } else {
                io::print_hint("Use `reset` to prepare the study for the next participant.");
            }
        }
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.reset()?;
    show_current_page(context);
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.save(SaveTrigger::Manual);
    io::print_success("Progress saved.");
    Ok(())
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: status".into()));
    }
    let session = &context.session;
    let progress = session.progress();
    let store = session.store().backend();

    output::section("Session");
    io::print_info(format!("  Form         : {}", context.document.title));
    io::print_info(format!(
        "  Progress     : {} ({:.0}%)",
        progress.label, progress.percent
    ));
    io::print_info(format!(
        "  Next control : {}",
        if session.can_advance() { "enabled" } else { "disabled" }
    ));
    io::print_info(format!("  Progress dir : {}", store.root().display()));
    io::print_info(format!(
        "  Export dir   : {}",
        session.host().export_dir().display()
    ));
    if let Some(saved) = store.modified_at(wizard_core::PROGRESS_KEY) {
        io::print_info(format!(
            "  Last save    : {}",
            saved
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if let Some(path) = session.host().last_export() {
        io::print_info(format!("  Last export  : {}", path.display()));
    }
    io::print_info(format!(
        "  Started as   : {}",
        describe_resume(session.resume_outcome())
    ));
    io::print_info(format!(
        "  Autosave     : every {}s",
        context.config.autosave_interval().as_secs()
    ));
    Ok(())
}

fn describe_resume(outcome: &ResumeOutcome) -> String {
    match outcome {
        ResumeOutcome::Fresh => "new session".to_string(),
        ResumeOutcome::CompletedReset => "new session (previous study was completed)".to_string(),
        ResumeOutcome::Discarded => "new session (saved progress was unreadable)".to_string(),
        ResumeOutcome::Restored {
            page, responses, ..
        } => format!("restored on page {} with {} saved answers", page, responses),
    }
}
