//! Builds the rendered structure the runtime drives from a form description.
//!
//! Widgets follow the same naming contract as the markup so saved progress
//! and exports line up across both hosts.

use tracing::warn;
use wizard_core::{PageFrame, RenderedForm, ValidationPolicy};
use wizard_domain::{
    option_key, question_key, AnswerWidget, ChoiceOption, FormDocument, Question, QuestionType,
    OTHER_VALUE,
};

pub fn build_rendered_form(document: &FormDocument, policy: &ValidationPolicy) -> RenderedForm {
    let mut pages = Vec::with_capacity(document.pages.len());
    let mut widgets = Vec::new();

    for page in &document.pages {
        let mut frame = PageFrame::new(page.page_number, page.title.clone());
        frame.next_enabled = !policy.needs_validation(page.page_number);
        pages.push(frame);

        for question in &page.questions {
            widgets.extend(question_widgets(question, page.page_number));
        }
    }

    RenderedForm::new(pages, widgets)
}

/// Answer widgets for one question; empty for display-only and unsupported
/// kinds.
pub fn question_widgets(question: &Question, page: u32) -> Vec<AnswerWidget> {
    let key = question_key(&question.id);
    let label = question.title.trim();

    match &question.kind {
        QuestionType::Text => vec![AnswerWidget::text(key, page).with_label(label)],
        QuestionType::Checkbox => {
            let options = regular_options(question);
            let single = options.len() == 1;
            options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let id = if single {
                        key.clone()
                    } else {
                        option_key(&question.id, index)
                    };
                    AnswerWidget::checkbox(id, key.clone(), option.value.clone(), page)
                        .with_label(label)
                })
                .collect()
        }
        QuestionType::Radio => {
            let mut widgets: Vec<AnswerWidget> = regular_options(question)
                .iter()
                .map(|option| {
                    AnswerWidget::radio(key.clone(), option.value.clone(), page).with_label(label)
                })
                .collect();
            if offers_other(question) {
                widgets.push(AnswerWidget::radio(key.clone(), OTHER_VALUE, page).with_label(label));
            }
            widgets
        }
        QuestionType::Scale => match &question.scale {
            Some(scale) => scale
                .values()
                .into_iter()
                .map(|value| {
                    AnswerWidget::radio(key.clone(), value.to_string(), page).with_label(label)
                })
                .collect(),
            None => {
                warn!(question = %question.id, "scale question without bounds skipped");
                Vec::new()
            }
        },
        QuestionType::SectionHeader | QuestionType::Image => Vec::new(),
        QuestionType::Unsupported(kind) => {
            warn!(question = %question.id, kind = %kind, "unsupported question type skipped");
            Vec::new()
        }
    }
}

/// Options rendered as ordinary choices. Options flagged `isOther` are folded
/// into the single free-text `other` choice.
pub(crate) fn regular_options(question: &Question) -> Vec<&ChoiceOption> {
    question
        .options
        .iter()
        .filter(|option| !option.is_other)
        .collect()
}

pub(crate) fn offers_other(question: &Question) -> bool {
    question.kind == QuestionType::Radio
        && (question.has_other || question.options.iter().any(|option| option.is_other))
}
