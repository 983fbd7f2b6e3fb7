//! Element naming contract shared by the generator and the runtime.

/// Prefix carried by every answer-bearing element key.
pub const QUESTION_PREFIX: &str = "q_";

/// Radio value that marks the free-text "other" option.
pub const OTHER_VALUE: &str = "other";

/// Snapshot key suffix holding the free text of an `other` radio option.
pub const OTHER_SNAPSHOT_SUFFIX: &str = "_other";

/// Export key suffix holding the free text of an `other` radio option.
pub const OTHER_EXPORT_SUFFIX: &str = " (Other)";

/// Element key for a text input, a single-option checkbox, or a radio group.
pub fn question_key(question_id: &str) -> String {
    format!("{QUESTION_PREFIX}{question_id}")
}

/// Element key for one option of a multi-option checkbox question.
pub fn option_key(question_id: &str, index: usize) -> String {
    format!("{QUESTION_PREFIX}{question_id}_{index}")
}

pub fn is_question_key(key: &str) -> bool {
    key.starts_with(QUESTION_PREFIX)
}

/// Composite, human-readable key used in exported submissions.
pub fn export_key(element_key: &str, label: &str) -> String {
    format!("{element_key}_{label}")
}

/// Snapshot key under which the `other` free text of a radio group is saved.
pub fn other_snapshot_key(group_name: &str) -> String {
    format!("{group_name}{OTHER_SNAPSHOT_SUFFIX}")
}
