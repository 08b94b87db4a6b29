//! Error types for the launch-state core.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Key-value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the onboarding and journey records.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed record under key {key}: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize record for key {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the navigation persistence record.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed navigation state: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to serialize navigation state: {0}")]
    Serialize(#[source] serde_json::Error),
}
