use std::{fs, path::PathBuf, time::Duration};

use tempfile::tempdir;
use wizard_config::{Config, ConfigError, ConfigManager};

#[test]
fn default_config_matches_the_reference_study() {
    let cfg = Config::default();

    assert_eq!(cfg.validation.consent_field, "q_2138434720");
    assert_eq!(cfg.validation.evaluation_pages, vec![5, 7, 9]);
    assert_eq!(cfg.validation.selection_suffixes, vec!["635", "265", "845"]);
    assert_eq!(cfg.autosave_interval(), Duration::from_secs(5));
    assert_eq!(cfg.default_output_file, "user_study_complete.html");
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.validation.evaluation_pages = vec![3];
    cfg.autosave_interval_secs = 30;
    cfg.export_dir = Some(PathBuf::from("/tmp/exports"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(manager.config_path(), dir.path().join("config").join("config.json"));
    assert_eq!(loaded.resolve_export_dir(), PathBuf::from("/tmp/exports"));
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "validation": { "evaluation_pages": [2, 4] } }"#).expect("write");

    let cfg = ConfigManager::new(path).load().expect("load");

    assert_eq!(cfg.validation.evaluation_pages, vec![2, 4]);
    assert_eq!(cfg.validation.consent_field, "q_2138434720");
    assert_eq!(cfg.autosave_interval_secs, 5);
}

#[test]
fn zero_interval_is_clamped() {
    let cfg = Config {
        autosave_interval_secs: 0,
        ..Config::default()
    };
    assert_eq!(cfg.autosave_interval(), Duration::from_secs(1));
}

#[test]
fn invalid_settings_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let mut cfg = Config::default();
    cfg.validation.evaluation_pages.push(1);

    let err = manager.save(&cfg).expect_err("page 1 cannot be an evaluation page");
    assert!(matches!(err, ConfigError::Invalid(_)));

    fs::write(manager.config_path(), "{ not json").expect("write");
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn data_dir_defaults_under_home() {
    let home = PathBuf::from("/srv/study");
    let mut cfg = Config::default();

    assert_eq!(cfg.resolve_data_dir(&home), home.join("progress"));
    cfg.data_dir = Some(PathBuf::from("/var/lib/study"));
    assert_eq!(cfg.resolve_data_dir(&home), PathBuf::from("/var/lib/study"));
}
