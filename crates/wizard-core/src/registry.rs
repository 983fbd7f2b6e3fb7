use std::collections::HashMap;

use wizard_domain::{export_key, is_question_key, AnswerWidget};

/// Element key → question label, built once from the rendered widgets and
/// only used to produce readable export keys.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    titles: HashMap<String, String>,
}

impl TitleIndex {
    pub fn build(widgets: &[AnswerWidget]) -> Self {
        let mut titles = HashMap::new();
        for widget in widgets {
            let Some(key) = widget.key().filter(|key| is_question_key(key)) else {
                continue;
            };
            let label = widget
                .group_label
                .as_deref()
                .map(str::trim)
                .filter(|label| !label.is_empty());
            if let Some(label) = label {
                titles.insert(key.to_string(), label.to_string());
            }
        }
        Self { titles }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.titles.get(key).map(String::as_str)
    }

    /// Label for `key`, falling back to the key itself.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    pub fn export_key(&self, key: &str) -> String {
        export_key(key, self.label_for(key))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
