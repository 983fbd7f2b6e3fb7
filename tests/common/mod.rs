#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use once_cell::sync::Lazy;
use serde_json::json;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Paths of an isolated study deployment.
pub struct TestEnv {
    pub home: PathBuf,
    pub form: PathBuf,
    pub exports: PathBuf,
}

impl TestEnv {
    pub fn progress_file(&self) -> PathBuf {
        self.home.join("progress").join("study_progress.json")
    }

    pub fn completion_file(&self) -> PathBuf {
        self.home.join("progress").join("study_completed.json")
    }

    pub fn exported_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.exports)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }
}

/// Creates a fresh home directory with a three-page form and a config that
/// gates page 3 on a selection and exports into the home directory.
pub fn setup_test_env() -> TestEnv {
    let temp = TempDir::new().expect("create temp dir");
    let home = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let exports = home.join("exports");
    let config_dir = home.join("config");
    fs::create_dir_all(&config_dir).expect("create config dir");
    let config = json!({
        "validation": {
            "consent_field": "q_2138434720",
            "evaluation_pages": [3],
            "selection_suffixes": ["635"]
        },
        "autosave_interval_secs": 5,
        "ui_color_enabled": false,
        "export_dir": exports,
    });
    fs::write(
        config_dir.join("config.json"),
        serde_json::to_string_pretty(&config).expect("serialize config"),
    )
    .expect("write config");

    let form = home.join("form.json");
    write_form(&form, &sample_form());

    TestEnv {
        home,
        form,
        exports,
    }
}

pub fn write_form(path: &Path, form: &serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(form).expect("serialize form"))
        .expect("write form");
}

pub fn sample_form() -> serde_json::Value {
    json!({
        "title": "Park Navigation Study",
        "pages": [
            {
                "pageNumber": 1,
                "title": "Welcome",
                "description": "Thank you for taking part.",
                "questions": [
                    {
                        "id": 2138434720,
                        "title": "Privacy policy",
                        "type": "checkbox",
                        "required": true,
                        "options": [{ "value": "I agree" }]
                    },
                    { "id": "100", "title": " Participant name ", "type": "text" }
                ]
            },
            {
                "pageNumber": 2,
                "title": "About you",
                "questions": [
                    {
                        "id": "300",
                        "title": "Role",
                        "type": "radio",
                        "options": [{ "value": "Student" }, { "value": "Engineer" }],
                        "hasOther": true
                    },
                    { "id": "301", "title": "Banner", "type": "section_header" }
                ]
            },
            {
                "pageNumber": 3,
                "title": "Evaluation",
                "questions": [
                    {
                        "id": "501635",
                        "title": "Preferred system",
                        "type": "radio",
                        "options": [{ "value": "System A" }, { "value": "System B" }]
                    },
                    {
                        "id": "502",
                        "title": "Ease of use",
                        "type": "scale",
                        "scale": { "lowerBound": 1, "upperBound": 5 }
                    },
                    { "id": "503", "title": "Map preview", "type": "video" }
                ]
            }
        ]
    })
}
