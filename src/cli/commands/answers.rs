use wizard_core::WidgetEdit;
use wizard_domain::OTHER_VALUE;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::io;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "set",
            "Type into a text field",
            "set <id> <text>",
            cmd_set,
        ),
        CommandDefinition::new("check", "Tick a checkbox", "check <id>", cmd_check),
        CommandDefinition::new("uncheck", "Untick a checkbox", "uncheck <id>", cmd_uncheck),
        CommandDefinition::new(
            "choose",
            "Select an option of a radio or scale question",
            "choose <name> <value>",
            cmd_choose,
        ),
        CommandDefinition::new(
            "other",
            "Select `other` and fill in its text",
            "other <name> <text>",
            cmd_other,
        ),
    ]
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, text) = split_key_and_text(args, "usage: set <id> <text>")?;
    let applied = context.session.edit(WidgetEdit::Text {
        id: id.to_string(),
        value: text,
    });
    report(applied, format!("No text field `{}` in this form.", id))
}

fn cmd_check(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    toggle(context, args, true, "usage: check <id>")
}

fn cmd_uncheck(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    toggle(context, args, false, "usage: uncheck <id>")
}

fn toggle(context: &mut ShellContext, args: &[&str], checked: bool, usage: &str) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments(usage.to_string()));
    };
    let applied = context.session.edit(WidgetEdit::Check {
        id: id.to_string(),
        checked,
    });
    report(applied, format!("No checkbox `{}` in this form.", id))
}

fn cmd_choose(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, value) = split_key_and_text(args, "usage: choose <name> <value>")?;
    let applied = context.session.edit(WidgetEdit::Select {
        name: name.to_string(),
        value: value.clone(),
    });
    report(applied, format!("Question `{}` has no option `{}`.", name, value))
}

fn cmd_other(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, text) = split_key_and_text(args, "usage: other <name> <text>")?;
    let selected = context.session.edit(WidgetEdit::Select {
        name: name.to_string(),
        value: OTHER_VALUE.to_string(),
    });
    if !selected {
        return report(false, format!("Question `{}` has no `other` option.", name));
    }
    context.session.edit(WidgetEdit::OtherText {
        name: name.to_string(),
        text,
    });
    report(true, String::new())
}

/// First argument is the element key; the rest is joined back into text.
fn split_key_and_text<'a>(
    args: &[&'a str],
    usage: &str,
) -> Result<(&'a str, String), CommandError> {
    match args {
        [key, rest @ ..] if !rest.is_empty() => Ok((*key, rest.join(" "))),
        _ => Err(CommandError::InvalidArguments(usage.to_string())),
    }
}

fn report(applied: bool, miss: String) -> CommandResult {
    if applied {
        io::print_success("Saved.");
        Ok(())
    } else {
        Err(CommandError::Message(miss))
    }
}
