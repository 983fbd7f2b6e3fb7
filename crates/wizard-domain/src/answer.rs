//! Answer values and the records exchanged with storage and export.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Responses keyed by element key (snapshots) or composite key (exports).
pub type ResponseMap = BTreeMap<String, AnswerValue>;

/// Value captured from a single answer widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Text(String),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    /// Checkbox interpretation of the value.
    pub fn is_truthy(&self) -> bool {
        match self {
            AnswerValue::Flag(flag) => *flag,
            AnswerValue::Text(text) => !text.is_empty(),
        }
    }

    /// Text-field interpretation of the value.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            AnswerValue::Flag(flag) => Cow::Owned(flag.to_string()),
            AnswerValue::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Flag(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// In-progress state written on every save and read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    /// Kept signed so a hand-edited or stale record still parses and is
    /// clamped by the resume logic instead of being discarded.
    #[serde(default)]
    pub current_page: i64,
    pub responses: ResponseMap,
    pub timestamp: DateTime<Utc>,
}

impl PersistedSnapshot {
    pub fn new(current_page: u32, responses: ResponseMap, timestamp: DateTime<Utc>) -> Self {
        Self {
            current_page: i64::from(current_page),
            responses,
            timestamp,
        }
    }
}

/// Marker written on submission; its presence suppresses resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completion_time: Option<DateTime<Utc>>,
}

impl CompletionRecord {
    pub fn completed_at(time: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completion_time: Some(time),
        }
    }
}

/// Exported submission offered for download at the end of the study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDocument {
    pub submission_time: String,
    pub session_id: String,
    pub responses: ResponseMap,
}

impl SubmissionDocument {
    pub fn file_name(&self) -> String {
        format!("user_study_{}.json", self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn answer_values_are_untagged_in_json() {
        let mut responses = ResponseMap::new();
        responses.insert("q_1".into(), AnswerValue::Flag(true));
        responses.insert("q_2".into(), AnswerValue::text("hello"));

        let json = serde_json::to_string(&responses).expect("serialize");
        assert_eq!(json, r#"{"q_1":true,"q_2":"hello"}"#);

        let parsed: ResponseMap = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, responses);
    }

    #[test]
    fn truthiness_and_text_views() {
        assert!(AnswerValue::Flag(true).is_truthy());
        assert!(!AnswerValue::text("").is_truthy());
        assert_eq!(AnswerValue::Flag(false).as_text(), "false");
        assert_eq!(AnswerValue::text("3").to_string(), "3");
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let snapshot = PersistedSnapshot::new(3, ResponseMap::new(), at);
        let value = serde_json::to_value(&snapshot).expect("serialize");

        assert_eq!(value["currentPage"], 3);
        assert!(value["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
    }

    #[test]
    fn completion_record_tolerates_missing_fields() {
        let record: CompletionRecord = serde_json::from_str("{}").expect("parse");
        assert!(!record.completed);

        let record: CompletionRecord =
            serde_json::from_str(r#"{"completed":true,"completionTime":"2024-05-01T12:00:00.000Z"}"#)
                .expect("parse");
        assert!(record.completed);
        assert!(record.completion_time.is_some());
    }

    #[test]
    fn submission_file_name_embeds_session_id() {
        let doc = SubmissionDocument {
            submission_time: "2024-05-01T12:00:00.000Z".into(),
            session_id: "study_1_abc".into(),
            responses: ResponseMap::new(),
        };
        assert_eq!(doc.file_name(), "user_study_study_1_abc.json");
    }
}
