use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

/// What caused a snapshot save. Every trigger runs the same save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Interval,
    VisibilityChange,
    BeforeUnload,
    InputChange,
    Navigation,
    Manual,
}

impl fmt::Display for SaveTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SaveTrigger::Interval => "interval",
            SaveTrigger::VisibilityChange => "visibility-change",
            SaveTrigger::BeforeUnload => "before-unload",
            SaveTrigger::InputChange => "input-change",
            SaveTrigger::Navigation => "navigation",
            SaveTrigger::Manual => "manual",
        };
        f.write_str(label)
    }
}

/// Fixed-interval timer polled cooperatively by the host's event loop.
///
/// Event-driven saves do not move the interval; it keeps its own cadence
/// from the moment it was armed.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    interval: chrono::Duration,
    next_due: Option<DateTime<Utc>>,
}

impl AutosaveScheduler {
    pub fn new(interval: Duration) -> Self {
        let interval = chrono::Duration::from_std(interval)
            .unwrap_or_else(|_| chrono::Duration::seconds(5))
            .max(chrono::Duration::milliseconds(1));
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    /// Returns `true` when an interval save is due and schedules the next one.
    /// Missed intervals collapse into a single save.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL)
    }
}
