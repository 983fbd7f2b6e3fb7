//! Form description loading and the two outputs built from it: browser
//! markup and the in-process rendered structure.

pub mod html;
pub mod layout;

use std::{fs, path::Path};

use tracing::info;
use wizard_domain::FormDocument;

use crate::errors::WizardError;

pub use html::{render_document, GeneratedMarkup};
pub use layout::build_rendered_form;

pub const DEFAULT_OUTPUT_FILE: &str = "user_study_complete.html";

/// Reads a form description. Unknown fields are ignored.
pub fn load_form(path: &Path) -> Result<FormDocument, WizardError> {
    let raw = fs::read_to_string(path).map_err(|err| WizardError::FormDocument {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let document: FormDocument =
        serde_json::from_str(&raw).map_err(|err| WizardError::FormDocument {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    info!(
        path = %path.display(),
        pages = document.pages.len(),
        questions = document.question_count(),
        "form description loaded"
    );
    Ok(document)
}

/// Writes generated markup, replacing any previous file.
pub fn write_markup(markup: &GeneratedMarkup, output: &Path) -> Result<(), WizardError> {
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &markup.html)?;
    Ok(())
}
