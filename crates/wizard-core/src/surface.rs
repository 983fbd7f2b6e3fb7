//! Rendering adapter: the rendered structure the runtime inspects and
//! mutates, and the host seam for side effects outside of it.

use wizard_domain::{AnswerWidget, WidgetKind};

use crate::{CoreError, ProgressIndicator};

/// Visibility and control state of one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFrame {
    pub number: u32,
    pub title: String,
    pub visible: bool,
    pub has_next_control: bool,
    pub next_enabled: bool,
}

impl PageFrame {
    pub fn new(number: u32, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            visible: number == 1,
            has_next_control: true,
            next_enabled: true,
        }
    }

    pub fn without_next_control(mut self) -> Self {
        self.has_next_control = false;
        self
    }
}

/// A user edit to one answer widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEdit {
    Text { id: String, value: String },
    Check { id: String, checked: bool },
    Select { name: String, value: String },
    OtherText { name: String, text: String },
}

/// Page frames, answer widgets, and the progress indicator of a generated
/// form. Lookups that miss are silent no-ops.
#[derive(Debug, Clone, Default)]
pub struct RenderedForm {
    pages: Vec<PageFrame>,
    widgets: Vec<AnswerWidget>,
    progress: Option<ProgressIndicator>,
}

impl RenderedForm {
    pub fn new(pages: Vec<PageFrame>, widgets: Vec<AnswerWidget>) -> Self {
        Self {
            pages,
            widgets,
            progress: None,
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Frames must be numbered `1..=N` in order; the navigator addresses
    /// them by position.
    pub fn check_page_numbers(&self) -> Result<(), CoreError> {
        for (index, frame) in self.pages.iter().enumerate() {
            let expected = index as u32 + 1;
            if frame.number != expected {
                return Err(CoreError::InvalidOperation(format!(
                    "page at position {} is numbered {} (expected {})",
                    expected, frame.number, expected
                )));
            }
        }
        Ok(())
    }

    pub fn pages(&self) -> &[PageFrame] {
        &self.pages
    }

    pub fn page(&self, number: u32) -> Option<&PageFrame> {
        self.pages.iter().find(|page| page.number == number)
    }

    pub fn widgets(&self) -> &[AnswerWidget] {
        &self.widgets
    }

    pub fn widgets_on_page(&self, number: u32) -> impl Iterator<Item = &AnswerWidget> {
        self.widgets
            .iter()
            .filter(move |widget| widget.page == number)
    }

    pub fn visible_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|page| page.visible)
            .map(|page| page.number)
            .collect()
    }

    /// Hides every page except `number`.
    pub fn show_only(&mut self, number: u32) {
        for page in &mut self.pages {
            page.visible = page.number == number;
        }
    }

    pub fn set_next_enabled(&mut self, number: u32, enabled: bool) {
        if let Some(page) = self
            .pages
            .iter_mut()
            .find(|page| page.number == number && page.has_next_control)
        {
            page.next_enabled = enabled;
        }
    }

    /// Whether the page's next (or submit) control can be activated.
    pub fn next_enabled(&self, number: u32) -> bool {
        self.page(number)
            .map(|page| page.has_next_control && page.next_enabled)
            .unwrap_or(false)
    }

    pub fn progress(&self) -> Option<&ProgressIndicator> {
        self.progress.as_ref()
    }

    pub fn set_progress(&mut self, progress: ProgressIndicator) {
        self.progress = Some(progress);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&AnswerWidget> {
        self.widgets
            .iter()
            .find(|widget| widget.id.as_deref() == Some(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&AnswerWidget> {
        self.widgets
            .iter()
            .find(|widget| widget.name.as_deref() == Some(name))
    }

    /// The checked option of a radio group, if any.
    pub fn selected_option(&self, name: &str) -> Option<&AnswerWidget> {
        self.widgets.iter().find(|widget| {
            widget.kind == WidgetKind::Radio && widget.checked && widget.name.as_deref() == Some(name)
        })
    }

    /// Applies an edit and returns the page it landed on, or `None` when no
    /// matching widget exists.
    pub fn apply_edit(&mut self, edit: &WidgetEdit) -> Option<u32> {
        match edit {
            WidgetEdit::Text { id, value } => {
                let widget = self.widget_by_id_mut(id, WidgetKind::Text)?;
                widget.value = value.clone();
                Some(widget.page)
            }
            WidgetEdit::Check { id, checked } => {
                let widget = self.widget_by_id_mut(id, WidgetKind::Checkbox)?;
                widget.checked = *checked;
                Some(widget.page)
            }
            WidgetEdit::Select { name, value } => self.select_option(name, value),
            WidgetEdit::OtherText { name, text } => {
                let widget = self
                    .widgets
                    .iter_mut()
                    .find(|widget| {
                        widget.is_other_option() && widget.name.as_deref() == Some(name.as_str())
                    })?;
                widget.other_text = Some(text.clone());
                Some(widget.page)
            }
        }
    }

    /// Checks the option `value` of radio group `name`, unchecking its
    /// siblings.
    pub fn select_option(&mut self, name: &str, value: &str) -> Option<u32> {
        let exists = self.widgets.iter().any(|widget| {
            widget.kind == WidgetKind::Radio
                && widget.name.as_deref() == Some(name)
                && widget.value == value
        });
        if !exists {
            return None;
        }
        let mut page = None;
        for widget in &mut self.widgets {
            if widget.kind == WidgetKind::Radio && widget.name.as_deref() == Some(name) {
                widget.checked = widget.value == value;
                if widget.checked {
                    page = Some(widget.page);
                }
            }
        }
        page
    }

    pub(crate) fn widgets_mut(&mut self) -> &mut [AnswerWidget] {
        &mut self.widgets
    }

    pub fn clear_widgets(&mut self) {
        for widget in &mut self.widgets {
            widget.clear();
        }
    }

    fn widget_by_id_mut(&mut self, id: &str, kind: WidgetKind) -> Option<&mut AnswerWidget> {
        self.widgets
            .iter_mut()
            .find(|widget| widget.kind == kind && widget.id.as_deref() == Some(id))
    }
}

/// Side effects the runtime asks of its host environment.
pub trait WizardHost {
    /// Called after every page transition.
    fn scroll_to_top(&mut self);

    /// One-shot informational message (resume notice, reset notice).
    fn notify(&mut self, message: &str);

    /// Blocking yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Hands a finished export to the user as a local file.
    fn offer_download(&mut self, file_name: &str, contents: &str) -> Result<(), CoreError>;
}
