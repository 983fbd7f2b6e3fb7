//! Form description document consumed by the generator.

use std::collections::HashSet;
use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};

/// Top-level description of a multi-page study form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl FormDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            pages: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|page| page.page_number == number)
    }

    pub fn question_count(&self) -> usize {
        self.pages.iter().map(|page| page.questions.len()).sum()
    }

    /// Detects structural anomalies that the generator tolerates but a form
    /// author would want to know about.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.pages.is_empty() {
            warnings.push("form has no pages".to_string());
        }

        let mut seen_pages = HashSet::new();
        let mut seen_questions = HashSet::new();
        for (index, page) in self.pages.iter().enumerate() {
            let expected = index as u32 + 1;
            if page.page_number != expected {
                warnings.push(format!(
                    "page at position {} is numbered {} (expected {})",
                    expected, page.page_number, expected
                ));
            }
            if !seen_pages.insert(page.page_number) {
                warnings.push(format!("page number {} is used twice", page.page_number));
            }
            for question in &page.questions {
                if !seen_questions.insert(question.id.as_str()) {
                    warnings.push(format!(
                        "question {} on page {} reuses an existing id",
                        question.id, page.page_number
                    ));
                }
                if let QuestionType::Unsupported(kind) = &question.kind {
                    warnings.push(format!(
                        "question {} on page {} has unsupported type `{}`",
                        question.id, page.page_number, kind
                    ));
                }
                if question.kind == QuestionType::Scale && question.scale.is_none() {
                    warnings.push(format!(
                        "scale question {} on page {} has no bounds",
                        question.id, page.page_number
                    ));
                }
            }
        }
        warnings
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Page {
    pub fn new(page_number: u32, title: impl Into<String>) -> Self {
        Self {
            page_number,
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }
}

/// A single prompt with a type-specific answer widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(deserialize_with = "deserialize_question_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub has_other: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSpec>,
}

impl Question {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            required: false,
            kind,
            options: Vec::new(),
            has_other: false,
            scale: None,
            image: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = values.into_iter().map(ChoiceOption::new).collect();
        self
    }

    pub fn with_other(mut self) -> Self {
        self.has_other = true;
        self
    }

    pub fn with_scale(mut self, scale: ScaleSpec) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Whether the question renders at least one answer-bearing element.
    pub fn is_answerable(&self) -> bool {
        matches!(
            self.kind,
            QuestionType::Text | QuestionType::Checkbox | QuestionType::Radio | QuestionType::Scale
        )
    }
}

/// Question kinds understood by the generator. Anything else is carried
/// through verbatim and skipped at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
    Text,
    Checkbox,
    Radio,
    Scale,
    SectionHeader,
    Image,
    Unsupported(String),
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Radio => "radio",
            QuestionType::Scale => "scale",
            QuestionType::SectionHeader => "section_header",
            QuestionType::Image => "image",
            QuestionType::Unsupported(kind) => kind,
        }
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => QuestionType::Text,
            "checkbox" => QuestionType::Checkbox,
            "radio" => QuestionType::Radio,
            "scale" => QuestionType::Scale,
            "section_header" => QuestionType::SectionHeader,
            "image" => QuestionType::Image,
            _ => QuestionType::Unsupported(value),
        }
    }
}

impl From<QuestionType> for String {
    fn from(value: QuestionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default)]
    pub is_other: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to_page: Option<String>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_other: false,
            go_to_page: None,
        }
    }
}

/// Bounds and end labels of a linear scale question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSpec {
    pub lower_bound: i32,
    pub upper_bound: i32,
    #[serde(default)]
    pub lower_label: Option<String>,
    #[serde(default)]
    pub upper_label: Option<String>,
}

impl ScaleSpec {
    pub fn new(lower_bound: i32, upper_bound: i32) -> Self {
        Self {
            lower_bound,
            upper_bound,
            lower_label: None,
            upper_label: None,
        }
    }

    pub fn with_labels(mut self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.lower_label = Some(lower.into());
        self.upper_label = Some(upper.into());
        self
    }

    /// Inclusive list of selectable values; empty when the bounds are inverted.
    pub fn values(&self) -> Vec<i32> {
        (self.lower_bound..=self.upper_bound).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSpec {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Hosted form exports carry numeric item ids; hand-written documents tend to
/// use strings. Both end up as the textual id used in element keys.
fn deserialize_question_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Integer(value) => value.to_string(),
        RawId::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exported_document_with_numeric_ids() {
        let json = r#"{
            "title": "Study",
            "description": "Intro",
            "pages": [{
                "pageNumber": 1,
                "title": "Page 1",
                "description": "",
                "questions": [
                    {"id": 2138434720, "title": "I agree", "description": null,
                     "required": true, "type": "checkbox",
                     "options": [{"value": "Yes", "isOther": false}]},
                    {"id": "77", "title": "Rating", "required": false, "type": "scale",
                     "options": [],
                     "scale": {"lowerBound": 1, "upperBound": 5,
                               "lowerLabel": "Bad", "upperLabel": "Good"}},
                    {"id": 5, "title": "When", "type": "date"}
                ]
            }]
        }"#;

        let doc: FormDocument = serde_json::from_str(json).expect("parse form");
        let questions = &doc.pages[0].questions;

        assert_eq!(questions[0].id, "2138434720");
        assert_eq!(questions[0].kind, QuestionType::Checkbox);
        assert_eq!(questions[1].scale.as_ref().map(ScaleSpec::values), Some(vec![1, 2, 3, 4, 5]));
        assert_eq!(questions[2].kind, QuestionType::Unsupported("date".into()));
        assert!(!questions[2].is_answerable());
    }

    #[test]
    fn question_type_serializes_back_to_its_tag() {
        let question = Question::new("9", "Header", QuestionType::SectionHeader);
        let value = serde_json::to_value(&question).expect("serialize");
        assert_eq!(value["type"], "section_header");
        assert_eq!(value["hasOther"], false);
    }

    #[test]
    fn warnings_flag_gaps_duplicates_and_unknown_types() {
        let doc = FormDocument::new("Broken")
            .with_page(Page::new(1, "One").with_question(Question::new(
                "1",
                "A",
                QuestionType::Text,
            )))
            .with_page(
                Page::new(3, "Three")
                    .with_question(Question::new("1", "Again", QuestionType::Text))
                    .with_question(Question::new("2", "Rate", QuestionType::Scale))
                    .with_question(Question::new(
                        "3",
                        "Pick",
                        QuestionType::Unsupported("dropdown".into()),
                    )),
            );

        let warnings = doc.warnings();

        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert!(warnings[0].contains("numbered 3"));
        assert!(warnings[1].contains("reuses"));
        assert!(warnings[2].contains("no bounds"));
        assert!(warnings[3].contains("`dropdown`"));
    }

    #[test]
    fn well_formed_document_has_no_warnings() {
        let doc = FormDocument::new("Fine")
            .with_page(Page::new(1, "One"))
            .with_page(Page::new(2, "Two"));
        assert!(doc.warnings().is_empty());
        assert_eq!(doc.total_pages(), 2);
        assert_eq!(doc.page(2).map(|page| page.title.as_str()), Some("Two"));
    }
}
