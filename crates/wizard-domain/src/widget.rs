//! Rendered answer widgets: the answer-bearing elements of the generated form.

use serde::{Deserialize, Serialize};

use crate::naming::{is_question_key, OTHER_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Text,
    Checkbox,
    Radio,
}

/// A single answer-bearing element and its current state.
///
/// Text inputs and checkboxes are addressed by `id`; radio options share a
/// group `name` and differ by `value`. An `other` radio option owns the free
/// text typed next to it in `other_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerWidget {
    pub kind: WidgetKind,
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: String,
    pub checked: bool,
    pub page: u32,
    pub group_label: Option<String>,
    pub other_text: Option<String>,
}

impl AnswerWidget {
    pub fn text(id: impl Into<String>, page: u32) -> Self {
        Self {
            kind: WidgetKind::Text,
            id: Some(id.into()),
            name: None,
            value: String::new(),
            checked: false,
            page,
            group_label: None,
            other_text: None,
        }
    }

    pub fn checkbox(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        page: u32,
    ) -> Self {
        Self {
            kind: WidgetKind::Checkbox,
            id: Some(id.into()),
            name: Some(name.into()),
            value: value.into(),
            checked: false,
            page,
            group_label: None,
            other_text: None,
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>, page: u32) -> Self {
        let value = value.into();
        let other_text = (value == OTHER_VALUE).then(String::new);
        Self {
            kind: WidgetKind::Radio,
            id: None,
            name: Some(name.into()),
            value,
            checked: false,
            page,
            group_label: None,
            other_text,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.group_label = Some(label.into());
        self
    }

    /// Lookup key: the id when present, otherwise the group name.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.name.as_deref())
    }

    pub fn id_is_question_key(&self) -> bool {
        self.id.as_deref().map(is_question_key).unwrap_or(false)
    }

    pub fn name_is_question_key(&self) -> bool {
        self.name.as_deref().map(is_question_key).unwrap_or(false)
    }

    pub fn is_other_option(&self) -> bool {
        self.kind == WidgetKind::Radio && self.value == OTHER_VALUE
    }

    /// Returns the widget to its pristine state.
    pub fn clear(&mut self) {
        match self.kind {
            WidgetKind::Text => self.value.clear(),
            WidgetKind::Checkbox | WidgetKind::Radio => self.checked = false,
        }
        if let Some(text) = self.other_text.as_mut() {
            text.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_other_option_owns_a_free_text_field() {
        let other = AnswerWidget::radio("q_5", "other", 2);
        let plain = AnswerWidget::radio("q_5", "Yes", 2);

        assert!(other.is_other_option());
        assert_eq!(other.other_text.as_deref(), Some(""));
        assert!(plain.other_text.is_none());
        assert_eq!(plain.key(), Some("q_5"));
    }

    #[test]
    fn clear_resets_value_checked_state_and_other_text() {
        let mut text = AnswerWidget::text("q_1", 1);
        text.value = "hello".into();
        text.clear();
        assert!(text.value.is_empty());

        let mut radio = AnswerWidget::radio("q_2", "other", 1);
        radio.checked = true;
        radio.other_text = Some("custom".into());
        radio.clear();
        assert!(!radio.checked);
        assert_eq!(radio.other_text.as_deref(), Some(""));
        assert_eq!(radio.value, "other");
    }
}
