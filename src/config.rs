//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Onboarding content version shipped with this build.
pub const CURRENT_ONBOARDING_VERSION: u32 = 1;

/// App version recorded on fresh onboarding records.
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

/// Settings that shape the persisted onboarding records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Version compared against `onboardingVersion` to force re-onboarding.
    pub current_version: u32,
    /// Informational app version stamped on new records.
    pub app_version: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            current_version: CURRENT_ONBOARDING_VERSION,
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

/// Process configuration for the `launch-state` server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the libSQL database file.
    pub db_path: PathBuf,
    /// HTTP listen port.
    pub port: u16,
    /// User id the settings rows are scoped to.
    pub user_id: String,
    pub onboarding: OnboardingConfig,
    /// Directory for daily rolling log files. Stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/launch-state.db"),
            port: 8080,
            user_id: "default".to_string(),
            onboarding: OnboardingConfig::default(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from `LAUNCH_STATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("LAUNCH_STATE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let port = parse_var(&lookup, "LAUNCH_STATE_PORT")?.unwrap_or(defaults.port);

        let user_id = lookup("LAUNCH_STATE_USER_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.user_id);

        let app_version = lookup("LAUNCH_STATE_APP_VERSION")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.onboarding.app_version);

        let current_version = parse_var(&lookup, "LAUNCH_STATE_ONBOARDING_VERSION")?
            .unwrap_or(defaults.onboarding.current_version);

        let log_dir = lookup("LAUNCH_STATE_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            db_path,
            port,
            user_id,
            onboarding: OnboardingConfig {
                current_version,
                app_version,
            },
            log_dir,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
