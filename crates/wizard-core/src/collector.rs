//! Response collection for export and for in-progress snapshots.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;
use wizard_domain::{
    other_snapshot_key, AnswerValue, AnswerWidget, ResponseMap, SubmissionDocument, WidgetKind,
    OTHER_EXPORT_SUFFIX, OTHER_VALUE,
};

use crate::TitleIndex;

const SESSION_SUFFIX_LEN: usize = 9;

/// Gathers every answer widget on every page, keyed by `"<key>_<label>"`.
pub fn collect_responses(widgets: &[AnswerWidget], titles: &TitleIndex) -> ResponseMap {
    let mut responses = ResponseMap::new();

    for widget in widgets {
        match widget.kind {
            WidgetKind::Text if widget.id_is_question_key() => {
                if let Some(id) = widget.id.as_deref() {
                    responses.insert(titles.export_key(id), AnswerValue::text(&widget.value));
                }
            }
            WidgetKind::Checkbox if widget.id_is_question_key() => {
                if let Some(id) = widget.id.as_deref() {
                    responses.insert(titles.export_key(id), AnswerValue::Flag(widget.checked));
                }
            }
            WidgetKind::Radio if widget.checked && widget.name_is_question_key() => {
                let Some(name) = widget.name.as_deref() else {
                    continue;
                };
                let key = titles.export_key(name);
                if widget.value == OTHER_VALUE {
                    let free_text = widget.other_text.clone().unwrap_or_default();
                    let base = if free_text.is_empty() {
                        OTHER_VALUE.to_string()
                    } else {
                        free_text.clone()
                    };
                    responses.insert(format!("{key}{OTHER_EXPORT_SUFFIX}"), AnswerValue::Text(free_text));
                    responses.insert(key, AnswerValue::Text(base));
                } else {
                    responses.insert(key, AnswerValue::text(&widget.value));
                }
            }
            _ => {}
        }
    }

    responses
}

/// Current widget values keyed by element key, as written to the progress
/// snapshot. Empty text fields are omitted.
pub fn snapshot_responses(widgets: &[AnswerWidget]) -> ResponseMap {
    let mut responses = ResponseMap::new();

    for widget in widgets {
        match widget.kind {
            WidgetKind::Text if widget.id_is_question_key() && !widget.value.is_empty() => {
                if let Some(id) = widget.id.clone() {
                    responses.insert(id, AnswerValue::text(&widget.value));
                }
            }
            WidgetKind::Checkbox if widget.id_is_question_key() => {
                if let Some(id) = widget.id.clone() {
                    responses.insert(id, AnswerValue::Flag(widget.checked));
                }
            }
            WidgetKind::Radio if widget.checked && widget.name_is_question_key() => {
                let Some(name) = widget.name.as_deref() else {
                    continue;
                };
                responses.insert(name.to_string(), AnswerValue::text(&widget.value));
                if let Some(text) = widget.other_text.as_deref().filter(|text| !text.is_empty()) {
                    responses.insert(other_snapshot_key(name), AnswerValue::text(text));
                }
            }
            _ => {}
        }
    }

    responses
}

/// Opaque per-session identifier: epoch milliseconds plus a short random
/// suffix. Collisions are unlikely but not excluded.
pub fn generate_session_id(now: DateTime<Utc>) -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(SESSION_SUFFIX_LEN);
    format!("study_{}_{}", now.timestamp_millis(), suffix)
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_submission_time(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn build_submission(
    widgets: &[AnswerWidget],
    titles: &TitleIndex,
    now: DateTime<Utc>,
) -> SubmissionDocument {
    SubmissionDocument {
        submission_time: format_submission_time(now),
        session_id: generate_session_id(now),
        responses: collect_responses(widgets, titles),
    }
}
