//! Persisted onboarding record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::OnboardingConfig;

/// Whether the user has been through the first-run flow, and how it ended.
///
/// Stored as camelCase JSON under [`keys::ONBOARDING_STATE`](super::keys::ONBOARDING_STATE).
/// Stored records are read through [`OnboardingState::from_stored`], which
/// fills fields missing from records written by older builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingState {
    pub has_seen_onboarding: bool,
    pub completed_onboarding: bool,
    pub skipped_onboarding: bool,
    pub onboarding_version: u32,
    /// Set once, never overwritten.
    pub first_launch_date: DateTime<Utc>,
    /// Refreshed on every read.
    pub last_launch_date: DateTime<Utc>,
    pub app_version: String,
}

/// Stored form with every field optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOnboardingState {
    #[serde(default)]
    has_seen_onboarding: bool,
    #[serde(default)]
    completed_onboarding: bool,
    #[serde(default)]
    skipped_onboarding: bool,
    onboarding_version: Option<u32>,
    first_launch_date: Option<DateTime<Utc>>,
    last_launch_date: Option<DateTime<Utc>>,
    app_version: Option<String>,
}

impl OnboardingState {
    /// Parse a stored record. Missing versions come from `config`, missing
    /// timestamps from `now`.
    pub fn from_stored(
        raw: &str,
        config: &OnboardingConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let stored: StoredOnboardingState = serde_json::from_str(raw)?;
        Ok(Self {
            has_seen_onboarding: stored.has_seen_onboarding,
            completed_onboarding: stored.completed_onboarding,
            skipped_onboarding: stored.skipped_onboarding,
            onboarding_version: stored.onboarding_version.unwrap_or(config.current_version),
            first_launch_date: stored.first_launch_date.unwrap_or(now),
            last_launch_date: stored.last_launch_date.unwrap_or(now),
            app_version: stored
                .app_version
                .unwrap_or_else(|| config.app_version.clone()),
        })
    }

    /// A first-launch record: nothing seen, both timestamps at `now`.
    pub fn fresh(config: &OnboardingConfig, now: DateTime<Utc>) -> Self {
        Self {
            has_seen_onboarding: false,
            completed_onboarding: false,
            skipped_onboarding: false,
            onboarding_version: config.current_version,
            first_launch_date: now,
            last_launch_date: now,
            app_version: config.app_version.clone(),
        }
    }

    /// Record a launch. `last_launch_date` never moves backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_launch_date {
            self.last_launch_date = now;
        }
    }

    pub fn mark_started(&mut self) {
        self.has_seen_onboarding = true;
    }

    pub fn mark_completed(&mut self) {
        self.has_seen_onboarding = true;
        self.completed_onboarding = true;
    }

    pub fn mark_skipped(&mut self) {
        self.has_seen_onboarding = true;
        self.skipped_onboarding = true;
    }

    /// Completed or skipped without having seen onboarding. Only reachable
    /// through a hand-edited or corrupted record.
    pub fn is_inconsistent(&self) -> bool {
        !self.has_seen_onboarding && (self.completed_onboarding || self.skipped_onboarding)
    }

    /// Whether this record predates the onboarding content `current_version`.
    pub fn is_outdated(&self, current_version: u32) -> bool {
        self.onboarding_version < current_version
    }
}
