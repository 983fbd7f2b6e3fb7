//! Per-page gating rules for forward navigation.
//!
//! Only two rules ever block: the consent checkbox on page 1 and the system
//! selection on evaluation pages. Every other page is optional, whatever the
//! `required` flags of its questions say.

use std::collections::BTreeSet;

use wizard_domain::{is_question_key, AnswerWidget};

pub const DEFAULT_CONSENT_FIELD: &str = "q_2138434720";
pub const DEFAULT_EVALUATION_PAGES: [u32; 3] = [5, 7, 9];
pub const DEFAULT_SELECTION_SUFFIXES: [&str; 3] = ["635", "265", "845"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRule {
    Consent,
    Selection,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    consent_field: String,
    evaluation_pages: BTreeSet<u32>,
    selection_suffixes: Vec<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONSENT_FIELD,
            DEFAULT_EVALUATION_PAGES,
            DEFAULT_SELECTION_SUFFIXES,
        )
    }
}

impl ValidationPolicy {
    pub fn new<P, S, T>(consent_field: impl Into<String>, evaluation_pages: P, suffixes: S) -> Self
    where
        P: IntoIterator<Item = u32>,
        S: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            consent_field: consent_field.into(),
            evaluation_pages: evaluation_pages.into_iter().collect(),
            selection_suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn consent_field(&self) -> &str {
        &self.consent_field
    }

    pub fn evaluation_pages(&self) -> &BTreeSet<u32> {
        &self.evaluation_pages
    }

    pub fn rule_for(&self, page: u32) -> PageRule {
        if page == 1 {
            PageRule::Consent
        } else if self.evaluation_pages.contains(&page) {
            PageRule::Selection
        } else {
            PageRule::Optional
        }
    }

    /// Pages whose next control starts out disabled in fresh markup.
    pub fn needs_validation(&self, page: u32) -> bool {
        self.rule_for(page) != PageRule::Optional
    }

    pub fn is_page_valid(&self, page: u32, widgets: &[AnswerWidget]) -> bool {
        match self.rule_for(page) {
            PageRule::Consent => widgets.iter().any(|widget| {
                widget.checked && widget.id.as_deref() == Some(self.consent_field.as_str())
            }),
            PageRule::Selection => widgets
                .iter()
                .filter(|widget| widget.page == page && widget.checked)
                .any(|widget| self.is_selection_input(widget)),
            PageRule::Optional => true,
        }
    }

    fn is_selection_input(&self, widget: &AnswerWidget) -> bool {
        let Some(name) = widget.name.as_deref() else {
            return false;
        };
        is_question_key(name)
            && self
                .selection_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }
}
