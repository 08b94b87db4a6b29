//! Navigation persistence: remembers the last screen and back-stack so a
//! relaunch can reopen where the user left off, subject to per-screen
//! resume policies.

pub mod routes;
pub mod screen;
pub mod service;

pub use routes::{NavigationRouteState, navigation_routes};
pub use screen::{ResumeBlock, Screen, ScreenPolicy, UnknownScreen, can_resume_screen, check_resume};
pub use service::{
    MAX_HISTORY, NavigationAnalytics, NavigationPlan, NavigationService, NavigationState, keys,
    update_navigation_history,
};
