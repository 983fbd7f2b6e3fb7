//! Page state machine.
//!
//! The navigator only tracks which page is current. Forward moves are
//! unconditional here; gating on validation happens where the next control
//! is enabled or disabled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_page: u32,
}

impl Default for WizardState {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

/// A completed move between two pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: u32,
    pub to: u32,
}

/// Progress bar width and textual page indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressIndicator {
    pub percent: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    state: WizardState,
    total_pages: u32,
}

impl Navigator {
    pub fn new(total_pages: u32) -> Self {
        Self {
            state: WizardState::default(),
            total_pages: total_pages.max(1),
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.state.current_page == 1
    }

    pub fn is_last(&self) -> bool {
        self.state.current_page == self.total_pages
    }

    pub fn advance(&mut self) -> Option<Transition> {
        if self.is_last() {
            return None;
        }
        Some(self.move_to(self.state.current_page + 1))
    }

    pub fn retreat(&mut self) -> Option<Transition> {
        if self.is_first() {
            return None;
        }
        Some(self.move_to(self.state.current_page - 1))
    }

    /// Restores a saved page. Only `1 < page <= total` moves; anything else
    /// leaves the state untouched.
    pub fn jump_to(&mut self, page: i64) -> Option<Transition> {
        if page <= 1 || page > i64::from(self.total_pages) {
            return None;
        }
        Some(self.move_to(page as u32))
    }

    pub fn reset(&mut self) -> Transition {
        self.move_to(1)
    }

    pub fn progress(&self) -> ProgressIndicator {
        let current = self.state.current_page;
        ProgressIndicator {
            percent: f64::from(current) / f64::from(self.total_pages) * 100.0,
            label: format!("Page {} of {}", current, self.total_pages),
        }
    }

    fn move_to(&mut self, page: u32) -> Transition {
        let from = self.state.current_page;
        self.state.current_page = page;
        Transition { from, to: page }
    }
}
