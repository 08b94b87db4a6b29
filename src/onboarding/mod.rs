//! Onboarding system: first-launch detection and journey resumption.
//!
//! Two persisted records live here: the `OnboardingState` (has the user seen,
//! completed or skipped onboarding) and the `JourneyState` (where a user left
//! a multi-step flow). `OnboardingService` owns both and reports every
//! failure; `LaunchResolver` turns them into the one screen the app should
//! open on, collapsing failures into fail-safe defaults.

pub mod analytics;
pub mod journey;
pub mod resolver;
pub mod routes;
pub mod service;
pub mod state;

pub use analytics::OnboardingAnalytics;
pub use journey::JourneyState;
pub use resolver::{LaunchDecision, LaunchPlan, LaunchResolver, resolve_initial_screen};
pub use routes::{LaunchRouteState, launch_routes};
pub use service::{LegacyMigration, OnboardingService};
pub use state::OnboardingState;

/// Storage keys owned by the onboarding system.
pub mod keys {
    pub const ONBOARDING_STATE: &str = "onboarding_state";
    pub const USER_JOURNEY: &str = "user_journey";
    /// Reserved; never written here but cleared on reset.
    pub const USER_PREFERENCES: &str = "user_preferences";
    /// Boolean flag written by the previous schema.
    pub const LEGACY_HAS_SEEN_ONBOARDING: &str = "hasSeenOnboarding";
    /// Journey blob written by the previous schema.
    pub const LEGACY_USER_JOURNEY: &str = "userJourneyData";

    /// Everything removed by a data reset.
    pub const ALL: &[&str] = &[
        ONBOARDING_STATE,
        USER_JOURNEY,
        USER_PREFERENCES,
        LEGACY_HAS_SEEN_ONBOARDING,
        LEGACY_USER_JOURNEY,
    ];
}
