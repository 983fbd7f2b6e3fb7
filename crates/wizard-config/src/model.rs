use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const PROGRESS_DIR: &str = "progress";

/// Stores the study deployment settings read at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default = "Config::default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_output_file")]
    pub default_output_file: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional root for saved progress. Defaults to `<home>/progress`.
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional target for exported submissions. Defaults to `~/Downloads`.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation: ValidationSettings::default(),
            autosave_interval_secs: Self::default_autosave_interval_secs(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_output_file: Self::default_output_file(),
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn default_autosave_interval_secs() -> u64 {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_output_file() -> String {
        "user_study_complete.html".into()
    }

    /// Zero is treated as one second; the scheduler never spins.
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    /// Saved progress lives under `home` unless a data dir is configured.
    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => home.join(PROGRESS_DIR),
        }
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        if let Some(path) = &self.export_dir {
            return path.clone();
        }

        dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Inputs of the per-page gating rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "ValidationSettings::default_consent_field")]
    pub consent_field: String,
    #[serde(default = "ValidationSettings::default_evaluation_pages")]
    pub evaluation_pages: Vec<u32>,
    #[serde(default = "ValidationSettings::default_selection_suffixes")]
    pub selection_suffixes: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            consent_field: Self::default_consent_field(),
            evaluation_pages: Self::default_evaluation_pages(),
            selection_suffixes: Self::default_selection_suffixes(),
        }
    }
}

impl ValidationSettings {
    pub fn default_consent_field() -> String {
        "q_2138434720".into()
    }

    pub fn default_evaluation_pages() -> Vec<u32> {
        vec![5, 7, 9]
    }

    pub fn default_selection_suffixes() -> Vec<String> {
        ["635", "265", "845"].into_iter().map(String::from).collect()
    }
}
