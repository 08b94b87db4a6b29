//! Persisted journey record: where a user left a multi-step flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mid-flow progress. Saved wholesale: the last write wins, nothing merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyState {
    #[serde(default)]
    pub current_screen: String,
    /// Insertion order is progress order.
    #[serde(default)]
    pub completed_steps: Vec<String>,
    #[serde(default)]
    pub selected_styles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl JourneyState {
    pub fn new(current_screen: impl Into<String>) -> Self {
        Self {
            current_screen: current_screen.into(),
            ..Default::default()
        }
    }

    /// The screen to resume at, if one was recorded.
    pub fn resume_screen(&self) -> Option<&str> {
        if self.current_screen.is_empty() {
            None
        } else {
            Some(&self.current_screen)
        }
    }

    /// The chosen plan, ignoring blank values.
    pub fn plan(&self) -> Option<&str> {
        self.selected_plan.as_deref().filter(|p| !p.is_empty())
    }
}
