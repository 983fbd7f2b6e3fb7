//! Startup restoration of saved progress.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use wizard_domain::{AnswerValue, ResponseMap, WidgetKind, OTHER_SNAPSHOT_SUFFIX};

use crate::{CoreError, Navigator, PersistenceStore, ProgressStore, RenderedForm, SnapshotLoad};

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// Nothing was stored.
    Fresh,
    /// A completion record was present; both records were cleared.
    CompletedReset,
    /// The stored snapshot was unreadable and has been deleted.
    Discarded,
    Restored {
        page: u32,
        responses: usize,
        saved_at: DateTime<Utc>,
    },
}

impl ResumeOutcome {
    /// Whether the user should be told their answers came back.
    pub fn restored_answers(&self) -> Option<DateTime<Utc>> {
        match self {
            ResumeOutcome::Restored {
                responses,
                saved_at,
                ..
            } if *responses > 0 => Some(*saved_at),
            _ => None,
        }
    }
}

/// Loads saved state into a freshly rendered form. Runs once, before
/// autosave is armed.
pub fn resume<S: ProgressStore>(
    store: &PersistenceStore<S>,
    navigator: &mut Navigator,
    form: &mut RenderedForm,
) -> Result<ResumeOutcome, CoreError> {
    if store.is_completed()? {
        info!("previous session was completed; starting fresh");
        store.clear_all()?;
        return Ok(ResumeOutcome::CompletedReset);
    }

    let snapshot = match store.load_snapshot()? {
        SnapshotLoad::Missing => return Ok(ResumeOutcome::Fresh),
        SnapshotLoad::Discarded => return Ok(ResumeOutcome::Discarded),
        SnapshotLoad::Loaded(snapshot) => snapshot,
    };

    if let Some(transition) = navigator.jump_to(snapshot.current_page) {
        form.show_only(transition.to);
    }
    let applied = replay_responses(form, &snapshot.responses);
    info!(
        page = navigator.current_page(),
        saved = snapshot.responses.len(),
        applied,
        "restored saved progress"
    );

    Ok(ResumeOutcome::Restored {
        page: navigator.current_page(),
        responses: snapshot.responses.len(),
        saved_at: snapshot.timestamp,
    })
}

/// Writes saved values back onto matching widgets and returns how many
/// found a target.
pub fn replay_responses(form: &mut RenderedForm, responses: &ResponseMap) -> usize {
    let mut applied = 0;
    for (key, value) in responses {
        let hit = match key.strip_suffix(OTHER_SNAPSHOT_SUFFIX) {
            Some(group) => restore_other_text(form, group, value),
            None => restore_value(form, key, value),
        };
        if hit {
            applied += 1;
        } else {
            debug!(key = %key, "no element for saved response");
        }
    }
    applied
}

fn restore_other_text(form: &mut RenderedForm, group: &str, value: &AnswerValue) -> bool {
    let Some(widget) = form
        .widgets_mut()
        .iter_mut()
        .find(|widget| widget.is_other_option() && widget.name.as_deref() == Some(group))
    else {
        return false;
    };
    widget.other_text = Some(value.as_text().into_owned());
    true
}

fn restore_value(form: &mut RenderedForm, key: &str, value: &AnswerValue) -> bool {
    let widgets = form.widgets();
    let Some(index) = widgets
        .iter()
        .position(|widget| widget.id.as_deref() == Some(key))
        .or_else(|| {
            widgets
                .iter()
                .position(|widget| widget.name.as_deref() == Some(key))
        })
    else {
        return false;
    };

    if widgets[index].kind == WidgetKind::Radio {
        return form.select_option(key, &value.as_text()).is_some();
    }

    let widget = &mut form.widgets_mut()[index];
    match widget.kind {
        WidgetKind::Checkbox => widget.checked = value.is_truthy(),
        _ => widget.value = value.as_text().into_owned(),
    }
    true
}
