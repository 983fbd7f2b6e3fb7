use std::fs;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::tempdir;
use wizard_core::{
    CoreError, PageFrame, PersistenceStore, ProgressStore, RenderedForm, ResumeOutcome,
    SnapshotLoad, ValidationPolicy, WidgetEdit, WizardHost, WizardSession, COMPLETION_KEY,
    PROGRESS_KEY,
};
use wizard_domain::{AnswerValue, AnswerWidget, PersistedSnapshot, ResponseMap};
use wizard_storage_json::{load_submission, write_export, JsonFileStore};

struct QuietHost;

impl WizardHost for QuietHost {
    fn scroll_to_top(&mut self) {}

    fn notify(&mut self, _message: &str) {}

    fn confirm(&mut self, _message: &str) -> bool {
        false
    }

    fn offer_download(&mut self, _file_name: &str, _contents: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

fn two_page_form() -> RenderedForm {
    RenderedForm::new(
        vec![PageFrame::new(1, "Consent"), PageFrame::new(2, "About you")],
        vec![
            AnswerWidget::checkbox("q_1", "q_1", "I agree", 1).with_label("Consent"),
            AnswerWidget::text("q_2", 2).with_label("Name"),
        ],
    )
}

#[test]
fn json_store_reads_back_what_it_wrote() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("data")).expect("create store");

    assert_eq!(store.read(PROGRESS_KEY).expect("read"), None);
    store.write(PROGRESS_KEY, "{\"a\":1}").expect("write");

    assert_eq!(
        store.read(PROGRESS_KEY).expect("read").as_deref(),
        Some("{\"a\":1}")
    );
    let path = store.record_path(PROGRESS_KEY);
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("study_progress.json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    assert!(store.modified_at(PROGRESS_KEY).is_some());
}

#[test]
fn json_store_remove_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.write(COMPLETION_KEY, "{}").expect("write");

    store.remove(COMPLETION_KEY).expect("remove");
    store.remove(COMPLETION_KEY).expect("remove again");

    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn json_store_lists_only_record_files() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("create store");
    store.write(PROGRESS_KEY, "{}").expect("write");
    store.write(COMPLETION_KEY, "{}").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write stray file");

    let keys = store.keys().expect("keys");

    assert_eq!(keys, vec!["study_completed", "study_progress"]);
}

#[test]
fn persistence_store_round_trips_snapshots_on_disk() {
    let dir = tempdir().expect("tempdir");
    let store = PersistenceStore::new(JsonFileStore::new(dir.path().to_path_buf()).expect("store"));
    let mut responses = ResponseMap::new();
    responses.insert("q_1".into(), AnswerValue::Flag(true));
    responses.insert("q_2".into(), AnswerValue::text("Ada"));
    let snapshot = PersistedSnapshot::new(
        2,
        responses,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
    );

    store.save_snapshot(&snapshot).expect("save");

    assert_eq!(store.load_snapshot().expect("load"), SnapshotLoad::Loaded(snapshot));
}

#[test]
fn corrupt_progress_file_is_removed_on_load() {
    let dir = tempdir().expect("tempdir");
    let backend = JsonFileStore::new(dir.path().to_path_buf()).expect("store");
    let path = backend.record_path(PROGRESS_KEY);
    fs::write(&path, "{\"currentPage\":").expect("write corrupt file");
    let store = PersistenceStore::new(backend);

    assert_eq!(store.load_snapshot().expect("load"), SnapshotLoad::Discarded);
    assert!(!path.exists());
}

#[test]
fn progress_file_with_invalid_utf8_is_removed_on_load() {
    let dir = tempdir().expect("tempdir");
    let backend = JsonFileStore::new(dir.path().to_path_buf()).expect("store");
    let path = backend.record_path(PROGRESS_KEY);
    fs::write(&path, [0xff, 0xfe, 0x7b]).expect("write undecodable file");
    let store = PersistenceStore::new(backend);

    assert_eq!(store.load_snapshot().expect("load"), SnapshotLoad::Discarded);
    assert!(!path.exists());
}

#[test]
fn session_starts_fresh_over_an_undecodable_progress_file() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("store");
    let progress = store.record_path(PROGRESS_KEY);
    let completion = store.record_path(COMPLETION_KEY);
    fs::write(&progress, [0xff, 0xfe, 0x7b]).expect("write undecodable progress");
    fs::write(&completion, [0xc3, 0x28]).expect("write undecodable completion");

    let session = WizardSession::start(
        two_page_form(),
        ValidationPolicy::new("q_1", [], ["635"]),
        store,
        QuietHost,
        wizard_core::SystemClock,
        Duration::from_secs(5),
    )
    .expect("start");

    assert_eq!(session.current_page(), 1);
    assert_eq!(session.resume_outcome(), &ResumeOutcome::Discarded);
    assert!(!progress.exists());
}

#[test]
fn session_resumes_from_files_written_by_a_previous_run() {
    let dir = tempdir().expect("tempdir");
    {
        let store = JsonFileStore::new(dir.path().to_path_buf()).expect("store");
        let mut session = WizardSession::start(
            two_page_form(),
            ValidationPolicy::new("q_1", [], ["635"]),
            store,
            QuietHost,
            wizard_core::SystemClock,
            Duration::from_secs(5),
        )
        .expect("start");
        session.edit(WidgetEdit::Check {
            id: "q_1".into(),
            checked: true,
        });
        session.next();
        session.edit(WidgetEdit::Text {
            id: "q_2".into(),
            value: "Ada".into(),
        });
    }

    let store = JsonFileStore::new(dir.path().to_path_buf()).expect("store");
    let session = WizardSession::start(
        two_page_form(),
        ValidationPolicy::new("q_1", [], ["635"]),
        store,
        QuietHost,
        wizard_core::SystemClock,
        Duration::from_secs(5),
    )
    .expect("restart");

    assert_eq!(session.current_page(), 2);
    assert!(matches!(
        session.resume_outcome(),
        ResumeOutcome::Restored { page: 2, responses: 2, .. }
    ));
    assert_eq!(
        session.form().find_by_id("q_2").map(|w| w.value.as_str()),
        Some("Ada")
    );
}

#[test]
fn exports_are_written_under_their_file_name_only() {
    let dir = tempdir().expect("tempdir");
    let contents = r#"{
  "submissionTime": "2024-05-01T09:30:00.000Z",
  "sessionId": "study_1714555800000_abc123def",
  "responses": { "q_1_Consent": true }
}"#;

    let path = write_export(dir.path(), "../user_study_x.json", contents).expect("export");

    assert_eq!(path, dir.path().join("user_study_x.json"));
    let document = load_submission(&path).expect("load submission");
    assert_eq!(document.session_id, "study_1714555800000_abc123def");
    assert_eq!(document.responses["q_1_Consent"], AnswerValue::Flag(true));
}
