//! Launchable screens and their resume policies.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Every screen the app can be launched into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Onboarding1,
    Onboarding2,
    Onboarding3,
    Paywall,
    PhotoCapture,
    Descriptions,
    Furniture,
    Budget,
    Auth,
    Checkout,
    Processing,
    Results,
    MyProjects,
    Profile,
    Demo,
    Welcome,
}

impl Screen {
    pub const ALL: [Screen; 16] = [
        Screen::Onboarding1,
        Screen::Onboarding2,
        Screen::Onboarding3,
        Screen::Paywall,
        Screen::PhotoCapture,
        Screen::Descriptions,
        Screen::Furniture,
        Screen::Budget,
        Screen::Auth,
        Screen::Checkout,
        Screen::Processing,
        Screen::Results,
        Screen::MyProjects,
        Screen::Profile,
        Screen::Demo,
        Screen::Welcome,
    ];

    /// Identifier used in persisted records and by the navigation host.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding1 => "onboarding1",
            Self::Onboarding2 => "onboarding2",
            Self::Onboarding3 => "onboarding3",
            Self::Paywall => "paywall",
            Self::PhotoCapture => "photoCapture",
            Self::Descriptions => "descriptions",
            Self::Furniture => "furniture",
            Self::Budget => "budget",
            Self::Auth => "auth",
            Self::Checkout => "checkout",
            Self::Processing => "processing",
            Self::Results => "results",
            Self::MyProjects => "myProjects",
            Self::Profile => "profile",
            Self::Demo => "demo",
            Self::Welcome => "welcome",
        }
    }

    pub const fn policy(&self) -> ScreenPolicy {
        use Screen::*;
        match self {
            Onboarding1 | Onboarding2 | Onboarding3 | Welcome => ScreenPolicy::resumable(1440),
            Paywall => ScreenPolicy::resumable(720),
            PhotoCapture | Descriptions | Furniture | Budget => ScreenPolicy::resumable(360),
            Auth => ScreenPolicy::resumable(60),
            Checkout => ScreenPolicy::resumable(30).with_auth(),
            Results => ScreenPolicy::resumable(1440).with_auth(),
            MyProjects | Profile => ScreenPolicy::resumable(10080).with_auth(),
            Processing => ScreenPolicy::transient(5).with_auth(),
            Demo => ScreenPolicy::transient(0),
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown screen: {0}")]
pub struct UnknownScreen(pub String);

impl std::str::FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

/// When a saved screen may be reopened on the next launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPolicy {
    pub can_resume: bool,
    pub requires_auth: bool,
    /// Mid-operation screens that must not be reopened.
    pub is_transient: bool,
    pub max_resume_age_minutes: i64,
}

impl ScreenPolicy {
    const fn resumable(max_resume_age_minutes: i64) -> Self {
        Self {
            can_resume: true,
            requires_auth: false,
            is_transient: false,
            max_resume_age_minutes,
        }
    }

    const fn transient(max_resume_age_minutes: i64) -> Self {
        Self {
            can_resume: false,
            requires_auth: false,
            is_transient: true,
            max_resume_age_minutes,
        }
    }

    const fn with_auth(self) -> Self {
        Self {
            requires_auth: true,
            ..self
        }
    }

    pub fn max_resume_age(&self) -> Duration {
        Duration::minutes(self.max_resume_age_minutes)
    }
}

/// Why a saved screen was not reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeBlock {
    NotResumable,
    RequiresAuth,
    TooOld,
    Transient,
}

/// Check `screen` against its policy, given when it was last shown.
pub fn check_resume(
    screen: Screen,
    is_authenticated: bool,
    last_navigation_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ResumeBlock> {
    let policy = screen.policy();
    if !policy.can_resume {
        return Err(ResumeBlock::NotResumable);
    }
    if policy.requires_auth && !is_authenticated {
        return Err(ResumeBlock::RequiresAuth);
    }
    if now - last_navigation_time > policy.max_resume_age() {
        return Err(ResumeBlock::TooOld);
    }
    if policy.is_transient {
        return Err(ResumeBlock::Transient);
    }
    Ok(())
}

/// Whether `screen` may be reopened now.
pub fn can_resume_screen(
    screen: Screen,
    is_authenticated: bool,
    last_navigation_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match check_resume(screen, is_authenticated, last_navigation_time, now) {
        Ok(()) => true,
        Err(reason) => {
            tracing::debug!(%screen, ?reason, "Screen not resumable");
            false
        }
    }
}
