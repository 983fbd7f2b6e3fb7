//! Plain-text rendering of the visible page for the shell.

use wizard_core::{PageRule, RenderedForm, ValidationPolicy};
use wizard_domain::{AnswerWidget, Page, Question, QuestionType, WidgetKind};

use crate::generator::layout::question_widgets;

/// Lines describing `page` and the current state of its widgets.
pub fn page_lines(page: &Page, form: &RenderedForm, last_page: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(description) = &page.description {
        lines.extend(
            description
                .split("\n\n")
                .map(str::trim)
                .filter(|paragraph| !paragraph.is_empty())
                .map(str::to_string),
        );
    }

    for question in &page.questions {
        question_lines(&mut lines, question, page.page_number, form);
    }

    let control = if last_page { "Submit" } else { "Next" };
    let state = if form.next_enabled(page.page_number) {
        "enabled"
    } else {
        "disabled"
    };
    lines.push(format!("[{control}: {state}]"));
    lines
}

fn question_lines(lines: &mut Vec<String>, question: &Question, page: u32, form: &RenderedForm) {
    let marker = if question.required { " *" } else { "" };
    let expected = question_widgets(question, page);

    match &question.kind {
        QuestionType::Text => {
            let value = expected
                .first()
                .and_then(|widget| current(form, widget))
                .map(|widget| widget.value.as_str())
                .filter(|value| !value.is_empty())
                .unwrap_or("(empty)");
            let key = expected.first().and_then(AnswerWidget::key).unwrap_or_default();
            lines.push(format!("{}{marker} [{key}]: {value}", question.title.trim()));
        }
        QuestionType::Checkbox => {
            lines.push(format!("{}{marker}", question.title.trim()));
            for widget in &expected {
                let checked = current(form, widget).map(|w| w.checked).unwrap_or(false);
                lines.push(format!(
                    "  [{}] {}  {}",
                    if checked { "x" } else { " " },
                    widget.key().unwrap_or_default(),
                    widget.value
                ));
            }
        }
        QuestionType::Radio | QuestionType::Scale => {
            let name = expected.first().and_then(AnswerWidget::key).unwrap_or_default();
            lines.push(format!("{}{marker} (choose {name})", question.title.trim()));
            if let Some(scale) = &question.scale {
                if let (Some(lower), Some(upper)) = (&scale.lower_label, &scale.upper_label) {
                    lines.push(format!(
                        "  {} = {lower}, {} = {upper}",
                        scale.lower_bound, scale.upper_bound
                    ));
                }
            }
            for widget in &expected {
                let state = current(form, widget);
                let checked = state.map(|w| w.checked).unwrap_or(false);
                let mark = if checked { "(*)" } else { "( )" };
                if widget.is_other_option() {
                    let text = state
                        .and_then(|w| w.other_text.as_deref())
                        .unwrap_or_default();
                    lines.push(format!("  {mark} other: {text}"));
                } else {
                    lines.push(format!("  {mark} {}", widget.value));
                }
            }
        }
        QuestionType::SectionHeader => {
            lines.push(format!("## {}", question.title.trim()));
            if let Some(description) = &question.description {
                lines.push(description.trim().to_string());
            }
        }
        QuestionType::Image => lines.push(format!("[image: {}]", question.title.trim())),
        QuestionType::Unsupported(kind) => {
            lines.push(format!("[{} not supported: {}]", kind, question.title.trim()))
        }
    }
}

/// Live state of the rendered widget matching `expected`.
fn current<'a>(form: &'a RenderedForm, expected: &AnswerWidget) -> Option<&'a AnswerWidget> {
    match expected.kind {
        WidgetKind::Text | WidgetKind::Checkbox => expected
            .id
            .as_deref()
            .and_then(|id| form.find_by_id(id)),
        WidgetKind::Radio => form.widgets().iter().find(|widget| {
            widget.kind == WidgetKind::Radio
                && widget.name == expected.name
                && widget.value == expected.value
        }),
    }
}

/// Why the current page cannot be left yet.
pub fn blocked_reason(policy: &ValidationPolicy, page: u32) -> String {
    match policy.rule_for(page) {
        PageRule::Consent => format!(
            "Please accept the privacy policy (`check {}`) to continue.",
            policy.consent_field()
        ),
        PageRule::Selection => "Please select a system on this page to continue.".to_string(),
        PageRule::Optional => "This page cannot be left yet.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::build_rendered_form;
    use insta::assert_snapshot;
    use wizard_core::WidgetEdit;
    use wizard_domain::{FormDocument, ScaleSpec};

    #[test]
    fn page_lines_show_widget_state() {
        let document = FormDocument::new("Study").with_page(
            Page::new(1, "Welcome")
                .with_description("Thanks for joining.\n\nIt takes ten minutes.")
                .with_question(
                    Question::new("2138434720", "Privacy policy", QuestionType::Checkbox)
                        .with_options(["I agree"])
                        .required(),
                )
                .with_question(Question::new("4", "Name", QuestionType::Text))
                .with_question(
                    Question::new("5", "Role", QuestionType::Radio)
                        .with_options(["Student"])
                        .with_other(),
                )
                .with_question(
                    Question::new("6", "Ease", QuestionType::Scale)
                        .with_scale(ScaleSpec::new(1, 3).with_labels("Hard", "Easy")),
                ),
        );
        let mut form = build_rendered_form(&document, &ValidationPolicy::default());
        form.apply_edit(&WidgetEdit::Select {
            name: "q_5".into(),
            value: "other".into(),
        });
        form.apply_edit(&WidgetEdit::OtherText {
            name: "q_5".into(),
            text: "Designer".into(),
        });

        let lines = page_lines(&document.pages[0], &form, false);

        assert_snapshot!(lines.join("\n"), @r###"
        Thanks for joining.
        It takes ten minutes.
        Privacy policy *
          [ ] q_2138434720  I agree
        Name [q_4]: (empty)
        Role (choose q_5)
          ( ) Student
          (*) other: Designer
        Ease (choose q_6)
          1 = Hard, 3 = Easy
          ( ) 1
          ( ) 2
          ( ) 3
        [Next: disabled]
        "###);
    }
}
