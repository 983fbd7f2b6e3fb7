use std::{
    io::{stdout, Write},
    path::{Path, PathBuf},
};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use dialoguer::theme::ColorfulTheme;
use tracing::warn;
use wizard_core::{CoreError, WizardHost};
use wizard_storage_json::write_export;

use crate::cli::context::CliMode;
use crate::cli::io;

/// Terminal side of the wizard: messages on stdout, dialogs through
/// dialoguer, downloads written into the export directory.
pub struct TerminalHost {
    mode: CliMode,
    export_dir: PathBuf,
    theme: ColorfulTheme,
    last_export: Option<PathBuf>,
}

impl TerminalHost {
    pub fn new(mode: CliMode, export_dir: PathBuf) -> Self {
        Self {
            mode,
            export_dir,
            theme: ColorfulTheme::default(),
            last_export: None,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }
}

impl WizardHost for TerminalHost {
    fn scroll_to_top(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let mut out = stdout();
        if let Err(err) = execute!(out, Clear(ClearType::All), MoveTo(0, 0)) {
            warn!(error = %err, "failed to clear the terminal");
        }
        let _ = out.flush();
    }

    fn notify(&mut self, message: &str) {
        for line in message.lines().filter(|line| !line.trim().is_empty()) {
            io::print_info(line);
        }
    }

    /// Script mode never blocks on a dialog and answers no.
    fn confirm(&mut self, message: &str) -> bool {
        if self.mode == CliMode::Script {
            self.notify(message);
            io::print_info("Answering no (script mode).");
            return false;
        }
        match io::confirm_action(&self.theme, message, false) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "confirmation dialog failed");
                false
            }
        }
    }

    fn offer_download(&mut self, file_name: &str, contents: &str) -> Result<(), CoreError> {
        let path = write_export(&self.export_dir, file_name, contents)?;
        io::print_success(format!("Responses saved to {}", path.display()));
        self.last_export = Some(path);
        Ok(())
    }
}
