use std::{env, path::PathBuf, sync::Once};

use tracing::level_filters::LevelFilter;

/// Overrides the directory holding saved progress and configuration.
pub const HOME_ENV: &str = "STUDY_WIZARD_HOME";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Logs go to stderr so script-mode stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
            .add_directive(default_directive());

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

fn default_directive() -> tracing_subscriber::filter::Directive {
    match "study_wizard=info".parse() {
        Ok(directive) => directive,
        Err(_) => LevelFilter::INFO.into(),
    }
}

/// Base directory for the config file and saved progress: `STUDY_WIZARD_HOME`
/// when set, otherwise `study_wizard` under the platform data directory.
pub fn resolve_home() -> PathBuf {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(home);
    }

    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("study_wizard")
}
