//! Read-only onboarding summary derived from both records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::journey::JourneyState;
use super::state::OnboardingState;

/// Journey step reported when no journey has been saved.
pub const UNKNOWN_STEP: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnalytics {
    pub is_first_time_user: bool,
    pub has_completed_onboarding: bool,
    pub has_skipped_onboarding: bool,
    /// Whole days, rounded down.
    pub days_since_first_launch: i64,
    pub onboarding_version: u32,
    pub current_journey_step: String,
    /// Number of styles picked in the style quiz.
    pub selected_styles: usize,
    pub has_selected_plan: bool,
}

impl OnboardingAnalytics {
    pub fn derive(
        state: &OnboardingState,
        journey: Option<&JourneyState>,
        now: DateTime<Utc>,
    ) -> Self {
        let days_since_first_launch = (now - state.first_launch_date).num_days().max(0);

        Self {
            is_first_time_user: !state.has_seen_onboarding,
            has_completed_onboarding: state.completed_onboarding,
            has_skipped_onboarding: state.skipped_onboarding,
            days_since_first_launch,
            onboarding_version: state.onboarding_version,
            current_journey_step: journey
                .and_then(JourneyState::resume_screen)
                .unwrap_or(UNKNOWN_STEP)
                .to_string(),
            selected_styles: journey.map_or(0, |j| j.selected_styles.len()),
            has_selected_plan: journey.and_then(JourneyState::plan).is_some(),
        }
    }
}
