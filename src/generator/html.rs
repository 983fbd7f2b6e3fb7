//! Static markup for the browser wizard.

use std::fmt::Write as _;

use tracing::warn;
use wizard_core::ValidationPolicy;
use wizard_domain::{
    option_key, question_key, FormDocument, Page, Question, QuestionType, OTHER_VALUE,
};

use super::layout::{offers_other, regular_options};

pub const STYLESHEET: &str = "forms_styles.css";
pub const SCRIPT: &str = "forms_script.js";
pub const IMAGE_SOURCE: &str = "park.jpg";

/// Output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMarkup {
    pub html: String,
    pub pages: usize,
    pub questions: usize,
    /// Ids of questions whose type has no markup.
    pub skipped: Vec<String>,
}

pub fn render_document(document: &FormDocument, policy: &ValidationPolicy) -> GeneratedMarkup {
    let title = escape(&document.title);
    let mut html = String::new();
    let mut skipped = Vec::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
    <div class="container">
        <header>
            <h1>{title}</h1>
        </header>

        <div class="progress-bar">
            <div class="progress" id="progress"></div>
        </div>
"#
    );

    let last = document.pages.len().saturating_sub(1);
    for (index, page) in document.pages.iter().enumerate() {
        render_page(
            &mut html,
            document,
            page,
            index == 0,
            index == last,
            policy,
            &mut skipped,
        );
    }

    let _ = write!(
        html,
        r#"
    </div>
    <script src="{SCRIPT}"></script>
</body>
</html>
"#
    );

    GeneratedMarkup {
        html,
        pages: document.pages.len(),
        questions: document.question_count(),
        skipped,
    }
}

fn render_page(
    html: &mut String,
    document: &FormDocument,
    page: &Page,
    first: bool,
    last: bool,
    policy: &ValidationPolicy,
    skipped: &mut Vec<String>,
) {
    let number = page.page_number;
    let _ = write!(
        html,
        r#"
        <!-- Page {number}: {comment} -->
        <div class="page{hidden}" id="page{number}">
            <div class="content">"#,
        comment = escape(&page.title.replace("--", "- -")),
        hidden = if first { "" } else { " hidden" },
    );

    if !first && !page.title.is_empty() && page.title != format!("Page {number}") {
        let _ = write!(html, "<h2>{}</h2>", escape(&page.title));
    }
    if let Some(description) = &page.description {
        push_paragraphs(html, description);
    }
    if first {
        if let Some(description) = &document.description {
            push_paragraphs(html, description);
        }
    }

    for question in &page.questions {
        if !render_question(html, question) {
            warn!(
                question = %question.id,
                kind = %question.kind,
                "question has no markup; skipped"
            );
            skipped.push(question.id.clone());
        }
    }

    let _ = write!(
        html,
        r#"
            </div>
            <div class="button-container{single}">"#,
        single = if first { " single-button" } else { "" },
    );
    if !first {
        html.push_str(r#"<button class="back-btn" onclick="prevPage()">Back</button>"#);
    }

    let disabled = if policy.needs_validation(number) {
        "disabled"
    } else {
        ""
    };
    if last {
        let _ = write!(
            html,
            r#"
                <div>
                    <button class="next-btn" id="nextBtn{number}" {disabled} onclick="submitForm()">Submit Study</button>
                    <button class="reset-btn" onclick="resetStudy()">Reset Study</button>
                </div>"#
        );
    } else {
        let _ = write!(
            html,
            r#"<button class="next-btn" id="nextBtn{number}" {disabled} onclick="nextPage()">Next</button>"#
        );
    }

    html.push_str(
        r#"
            </div>
        </div>"#,
    );
}

/// Appends the question's markup. Returns `false` when the type has none.
fn render_question(html: &mut String, question: &Question) -> bool {
    let key = question_key(&question.id);
    let title = escape(&question.title);
    let description = question
        .description
        .as_deref()
        .map(|text| format!(r#"<p class="question-description">{}</p>"#, escape(text)))
        .unwrap_or_default();
    let required = if question.required { "required" } else { "" };

    match &question.kind {
        QuestionType::Checkbox => {
            let _ = write!(
                html,
                r#"
                <div class="form-group">
                    <label>{title}</label>
                    {description}
                    <div class="checkbox-group">"#
            );
            let options = regular_options(question);
            let single = options.len() == 1;
            for (index, option) in options.iter().enumerate() {
                let id = if single {
                    key.clone()
                } else {
                    option_key(&question.id, index)
                };
                let value = escape(&option.value);
                let _ = write!(
                    html,
                    r#"
                        <label class="checkbox-container">
                            <input type="checkbox" id="{id}" name="{key}" value="{value}">
                            <span class="checkmark"></span>
                            {value}
                        </label>"#
                );
            }
            close_group(html);
        }
        QuestionType::Radio => {
            let _ = write!(
                html,
                r#"
                <div class="form-group">
                    <label>{title}</label>
                    {description}
                    <div class="radio-group">"#
            );
            for option in regular_options(question) {
                let value = escape(&option.value);
                let _ = write!(
                    html,
                    r#"
                        <label class="radio-container">
                            <input type="radio" name="{key}" value="{value}" {required}>
                            <span class="radio-checkmark"></span>
                            {value}
                        </label>"#
                );
            }
            if offers_other(question) {
                let _ = write!(
                    html,
                    r#"
                        <label class="radio-container">
                            <input type="radio" name="{key}" value="{OTHER_VALUE}">
                            <span class="radio-checkmark"></span>
                            Other: <input type="text" class="other-input" placeholder="Please specify">
                        </label>"#
                );
            }
            close_group(html);
        }
        QuestionType::Text => {
            let _ = write!(
                html,
                r#"
                <div class="form-group">
                    <label for="{key}">{title}</label>
                    {description}
                    <input type="text" id="{key}" {required} placeholder="{title}">
                </div>"#
            );
        }
        QuestionType::Scale => {
            let Some(scale) = &question.scale else {
                return false;
            };
            let lower = escape(scale.lower_label.as_deref().unwrap_or_default());
            let upper = escape(scale.upper_label.as_deref().unwrap_or_default());
            let _ = write!(
                html,
                r#"
                <div class="form-group">
                    <label>{title}</label>
                    {description}
                    <div class="likert-scale">
                        <div class="scale-labels">
                            <span>{lower}</span>
                            <span>{upper}</span>
                        </div>
                        <div class="scale-options">"#
            );
            for value in scale.values() {
                let _ = write!(
                    html,
                    r#"
                            <label class="scale-option">
                                <input type="radio" name="{key}" value="{value}" {required}>
                                <span class="scale-number">{value}</span>
                            </label>"#
                );
            }
            html.push_str(
                r#"
                        </div>
                    </div>
                </div>"#,
            );
        }
        QuestionType::SectionHeader => {
            let body = question
                .description
                .as_deref()
                .map(|text| format!("<p>{}</p>", escape(text)))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"
                <div class="section-header">
                    <h3>{title}</h3>
                    {body}
                </div>"#
            );
        }
        QuestionType::Image => {
            let width = question
                .image
                .as_ref()
                .and_then(|image| image.width)
                .map(|width| format!("{width}px"))
                .unwrap_or_else(|| "auto".into());
            let _ = write!(
                html,
                r#"
                <div class="form-group">
                    <div class="image-placeholder">
                        <p><strong>{title}</strong></p>
                        <div class="image-container">
                            <img src="{IMAGE_SOURCE}" alt="{title}" style="width: {width}; max-width: 100%; height: auto;">
                        </div>
                    </div>
                </div>"#
            );
        }
        QuestionType::Unsupported(_) => return false,
    }
    true
}

fn close_group(html: &mut String) {
    html.push_str(
        r#"
                    </div>
                </div>"#,
    );
}

/// Blank-line separated paragraphs; empty ones are dropped.
fn push_paragraphs(html: &mut String, text: &str) {
    html.push_str(r#"<div class="description">"#);
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let _ = write!(html, "<p>{}</p>", escape(paragraph));
    }
    html.push_str("</div>");
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let mut html = String::new();
        push_paragraphs(&mut html, "First\n\n  \n\nSecond");
        assert_eq!(html, r#"<div class="description"><p>First</p><p>Second</p></div>"#);
    }
}
