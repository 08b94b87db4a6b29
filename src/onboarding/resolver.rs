//! Launch screen resolution.
//!
//! `resolve_initial_screen` is the pure decision table. `LaunchResolver` wraps
//! the services with the fail-safe defaults the host relies on: it never
//! returns an error, and any failure routes the user to onboarding.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::OnboardingError;
use crate::navigation::{NavigationPlan, NavigationService, Screen};

use super::analytics::OnboardingAnalytics;
use super::journey::JourneyState;
use super::service::OnboardingService;
use super::state::OnboardingState;

/// The screen every failure path lands on.
pub const FALLBACK_SCREEN: Screen = Screen::Onboarding1;

/// Which branch of the launch decision matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchDecision {
    /// Onboarding has never been seen.
    Onboarding,
    /// Signed in with a saved journey: reopen it verbatim.
    Resume(String),
    /// Signed in without a saved journey.
    MyProjects,
    /// Signed out after finishing onboarding.
    Auth,
    /// Signed out after only seeing or skipping onboarding.
    Paywall,
}

impl LaunchDecision {
    pub fn screen(&self) -> &str {
        match self {
            Self::Onboarding => FALLBACK_SCREEN.as_str(),
            Self::Resume(screen) => screen,
            Self::MyProjects => Screen::MyProjects.as_str(),
            Self::Auth => Screen::Auth.as_str(),
            Self::Paywall => Screen::Paywall.as_str(),
        }
    }

    pub fn into_screen(self) -> String {
        match self {
            Self::Resume(screen) => screen,
            other => other.screen().to_string(),
        }
    }
}

/// Decide the launch screen. First match wins:
///
/// 1. onboarding not seen → `onboarding1`
/// 2. signed in with a journey screen → that screen
/// 3. signed in → `myProjects`
/// 4. signed out, onboarding completed → `auth`
/// 5. signed out → `paywall`
pub fn resolve_initial_screen(
    state: &OnboardingState,
    journey: Option<&JourneyState>,
    is_authenticated: bool,
) -> LaunchDecision {
    if !state.has_seen_onboarding {
        return LaunchDecision::Onboarding;
    }

    if is_authenticated {
        return match journey.and_then(JourneyState::resume_screen) {
            Some(screen) => LaunchDecision::Resume(screen.to_string()),
            None => LaunchDecision::MyProjects,
        };
    }

    if state.completed_onboarding {
        LaunchDecision::Auth
    } else {
        LaunchDecision::Paywall
    }
}

/// Launch screen plus the back-stack to seed the navigator with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub screen: String,
    pub history: Vec<String>,
}

impl LaunchPlan {
    fn single(screen: String) -> Self {
        Self {
            history: vec![screen.clone()],
            screen,
        }
    }

    pub fn fallback() -> Self {
        Self::single(FALLBACK_SCREEN.to_string())
    }
}

impl From<NavigationPlan> for LaunchPlan {
    fn from(plan: NavigationPlan) -> Self {
        Self {
            screen: plan.screen.to_string(),
            history: plan.history.iter().map(Screen::to_string).collect(),
        }
    }
}

pub struct LaunchResolver {
    onboarding: Arc<OnboardingService>,
    navigation: Arc<NavigationService>,
}

impl LaunchResolver {
    pub fn new(onboarding: Arc<OnboardingService>, navigation: Arc<NavigationService>) -> Self {
        Self {
            onboarding,
            navigation,
        }
    }

    /// Strict form of [`initial_screen`](Self::initial_screen).
    ///
    /// Only onboarding record failures are errors. An unreadable journey
    /// counts as no journey.
    pub async fn decide(&self, is_authenticated: bool) -> Result<LaunchDecision, OnboardingError> {
        let state = self.onboarding.onboarding_state().await?;
        let journey = self.user_journey().await;

        if state.is_inconsistent() {
            warn!(
                completed = state.completed_onboarding,
                skipped = state.skipped_onboarding,
                "Onboarding record finished without being seen"
            );
        }

        let decision = resolve_initial_screen(&state, journey.as_ref(), is_authenticated);
        debug!(?decision, is_authenticated, "Launch decision");
        Ok(decision)
    }

    /// The screen to open at launch. Any failure yields `onboarding1`.
    pub async fn initial_screen(&self, is_authenticated: bool) -> String {
        match self.decide(is_authenticated).await {
            Ok(decision) => decision.into_screen(),
            Err(e) => {
                warn!(error = %e, "Failed to determine initial screen, showing onboarding");
                FALLBACK_SCREEN.to_string()
            }
        }
    }

    /// `true` on failure, so a broken store re-shows onboarding.
    pub async fn is_first_time_user(&self) -> bool {
        self.onboarding.is_first_time_user().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to check first-time user, assuming first launch");
            true
        })
    }

    /// The onboarding record, or an unpersisted fresh one on failure.
    pub async fn onboarding_state(&self) -> OnboardingState {
        self.onboarding.onboarding_state().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load onboarding state, using fresh record");
            OnboardingState::fresh(self.onboarding.config(), Utc::now())
        })
    }

    /// The journey record; `None` when absent or unreadable.
    pub async fn user_journey(&self) -> Option<JourneyState> {
        self.onboarding.user_journey().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load user journey");
            None
        })
    }

    /// `false` on failure, so a broken store never re-interrupts the user.
    pub async fn needs_onboarding_update(&self) -> bool {
        self.onboarding
            .needs_onboarding_update()
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to check onboarding version");
                false
            })
    }

    /// `None` when the onboarding record is unreadable. An unreadable
    /// journey is reported as no journey.
    pub async fn onboarding_analytics(&self) -> Option<OnboardingAnalytics> {
        let state = self
            .onboarding
            .onboarding_state()
            .await
            .map_err(|e| warn!(error = %e, "Failed to derive onboarding analytics"))
            .ok()?;
        let journey = self.user_journey().await;
        Some(OnboardingAnalytics::derive(
            &state,
            journey.as_ref(),
            Utc::now(),
        ))
    }

    /// Full launch flow: migrate legacy keys, decide the onboarding screen,
    /// then let saved navigation refine it.
    ///
    /// A resumed journey screen outside the known set is opened as-is.
    pub async fn launch(&self, is_authenticated: bool) -> LaunchPlan {
        if let Err(e) = self.onboarding.migrate_legacy_keys().await {
            warn!(error = %e, "Legacy onboarding migration failed");
        }
        if let Err(e) = self.navigation.migrate_legacy_navigation_keys().await {
            warn!(error = %e, "Legacy navigation migration failed");
        }

        let screen = self.initial_screen(is_authenticated).await;
        let plan = match screen.parse::<Screen>() {
            Ok(fallback) => self
                .navigation
                .initial_screen_with_navigation(is_authenticated, fallback)
                .await
                .into(),
            Err(_) => LaunchPlan::single(screen),
        };

        info!(
            screen = %plan.screen,
            history_len = plan.history.len(),
            is_authenticated,
            "Launch screen resolved"
        );
        plan
    }
}
