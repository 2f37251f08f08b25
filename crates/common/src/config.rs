use std::path::PathBuf;

/// Settings file read when `SETTINGS_PATH` is not set.
pub const DEFAULT_SETTINGS_PATH: &str = "./setting.json";

/// Process-level configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the exposure and saver-mode settings.
    pub settings_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment, reading `.env` if present.
    /// Nothing here is required; missing variables fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            settings_path: optional_env("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
