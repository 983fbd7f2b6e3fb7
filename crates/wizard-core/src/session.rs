//! Wires the navigator, validator, persistence, and export into one
//! single-threaded session driven by host events.

use std::time::Duration;

use chrono::Local;
use tracing::{debug, info, warn};
use wizard_domain::{PersistedSnapshot, SubmissionDocument};

use crate::{
    build_submission, resume, snapshot_responses, AutosaveScheduler, Clock, CoreError, Navigator,
    PersistenceStore, ProgressIndicator, ProgressStore, RenderedForm, ResumeOutcome, SaveTrigger,
    TitleIndex, Transition, ValidationPolicy, WidgetEdit, WizardHost,
};

pub const COMPLETION_PROMPT: &str = "Thank you for participating! Your responses have been submitted and downloaded.\n\nWould you like to reset the form for a new participant?";
pub const RESET_NOTICE: &str = "Study has been reset. Ready for a new participant!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(Transition),
    /// The current page's next control is disabled.
    Blocked,
    /// Already on the first or last page.
    AtBoundary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Not on the last page, or its submit control is disabled.
    Blocked,
    Submitted {
        document: SubmissionDocument,
        reset: bool,
    },
}

pub struct WizardSession<S, H, C> {
    navigator: Navigator,
    form: RenderedForm,
    titles: TitleIndex,
    policy: ValidationPolicy,
    store: PersistenceStore<S>,
    autosave: AutosaveScheduler,
    host: H,
    clock: C,
    resume: ResumeOutcome,
}

impl<S, H, C> WizardSession<S, H, C>
where
    S: ProgressStore,
    H: WizardHost,
    C: Clock,
{
    /// Startup: index labels, restore saved progress, validate every page,
    /// then arm autosave.
    pub fn start(
        mut form: RenderedForm,
        policy: ValidationPolicy,
        store: S,
        host: H,
        clock: C,
        autosave_interval: Duration,
    ) -> Result<Self, CoreError> {
        if form.total_pages() == 0 {
            return Err(CoreError::InvalidOperation("form has no pages".into()));
        }
        form.check_page_numbers()?;

        let titles = TitleIndex::build(form.widgets());
        let store = PersistenceStore::new(store);
        let mut navigator = Navigator::new(form.total_pages());
        form.show_only(navigator.current_page());
        let resume = resume(&store, &mut navigator, &mut form)?;

        let mut session = Self {
            navigator,
            form,
            titles,
            policy,
            store,
            autosave: AutosaveScheduler::new(autosave_interval),
            host,
            clock,
            resume,
        };
        session.refresh_progress();
        session.validate_all();

        if let Some(saved_at) = session.resume.restored_answers() {
            let local = saved_at.with_timezone(&Local);
            session.host.notify(&format!(
                "Welcome back! Your progress has been restored from {}.",
                local.format("%Y-%m-%d %H:%M:%S")
            ));
        }

        let now = session.clock.now();
        session.autosave.arm(now);
        info!(
            pages = session.navigator.total_pages(),
            current = session.navigator.current_page(),
            "study session started"
        );
        Ok(session)
    }

    pub fn current_page(&self) -> u32 {
        self.navigator.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.navigator.total_pages()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn form(&self) -> &RenderedForm {
        &self.form
    }

    pub fn titles(&self) -> &TitleIndex {
        &self.titles
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn store(&self) -> &PersistenceStore<S> {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn resume_outcome(&self) -> &ResumeOutcome {
        &self.resume
    }

    pub fn progress(&self) -> ProgressIndicator {
        self.navigator.progress()
    }

    pub fn can_advance(&self) -> bool {
        self.form.next_enabled(self.navigator.current_page())
    }

    /// Applies a user edit, re-validates its page, and saves. Returns `false`
    /// when no widget matched.
    pub fn edit(&mut self, edit: WidgetEdit) -> bool {
        let Some(page) = self.form.apply_edit(&edit) else {
            debug!(?edit, "edit did not match any element");
            return false;
        };
        self.validate_page(page);
        self.save(SaveTrigger::InputChange);
        true
    }

    pub fn next(&mut self) -> NavOutcome {
        if !self.can_advance() {
            return NavOutcome::Blocked;
        }
        match self.navigator.advance() {
            Some(transition) => {
                self.apply_transition(transition);
                NavOutcome::Moved(transition)
            }
            None => NavOutcome::AtBoundary,
        }
    }

    pub fn back(&mut self) -> NavOutcome {
        match self.navigator.retreat() {
            Some(transition) => {
                self.apply_transition(transition);
                NavOutcome::Moved(transition)
            }
            None => NavOutcome::AtBoundary,
        }
    }

    /// Collects every answer, hands the export to the host, marks the study
    /// completed, clears saved progress, and offers a reset.
    pub fn submit(&mut self) -> Result<SubmitOutcome, CoreError> {
        if !self.navigator.is_last() || !self.can_advance() {
            return Ok(SubmitOutcome::Blocked);
        }

        let now = self.clock.now();
        let document = build_submission(self.form.widgets(), &self.titles, now);
        let json = serde_json::to_string_pretty(&document)?;
        self.host.offer_download(&document.file_name(), &json)?;

        self.store.mark_completed(now)?;
        self.store.clear_snapshot()?;
        info!(
            session = %document.session_id,
            responses = document.responses.len(),
            "study submitted"
        );

        let reset = self.host.confirm(COMPLETION_PROMPT);
        if reset {
            self.reset()?;
        }
        Ok(SubmitOutcome::Submitted { document, reset })
    }

    /// Clears stored records and every answer and returns to page 1.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.store.clear_all()?;
        self.form.clear_widgets();
        let transition = self.navigator.reset();
        self.form.show_only(transition.to);
        self.validate_all();
        self.refresh_progress();
        self.host.notify(RESET_NOTICE);
        info!("study reset");
        Ok(())
    }

    /// Writes the current snapshot. Failures are logged and swallowed.
    pub fn save(&mut self, trigger: SaveTrigger) {
        let snapshot = PersistedSnapshot::new(
            self.navigator.current_page(),
            snapshot_responses(self.form.widgets()),
            self.clock.now(),
        );
        match self.store.save_snapshot(&snapshot) {
            Ok(()) => debug!(%trigger, page = snapshot.current_page, "progress saved"),
            Err(err) => warn!(%trigger, error = %err, "failed to save progress"),
        }
    }

    /// Runs an interval save when one is due. Returns whether it ran.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        if self.autosave.poll(now) {
            self.save(SaveTrigger::Interval);
            true
        } else {
            false
        }
    }

    pub fn validate_page(&mut self, page: u32) {
        let valid = self.policy.is_page_valid(page, self.form.widgets());
        self.form.set_next_enabled(page, valid);
    }

    pub fn validate_all(&mut self) {
        let pages: Vec<u32> = self.form.pages().iter().map(|page| page.number).collect();
        for page in pages {
            self.validate_page(page);
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        self.form.show_only(transition.to);
        self.refresh_progress();
        self.save(SaveTrigger::Navigation);
        self.host.scroll_to_top();
        debug!(from = transition.from, to = transition.to, "page changed");
    }

    fn refresh_progress(&mut self) {
        self.form.set_progress(self.navigator.progress());
    }
}
