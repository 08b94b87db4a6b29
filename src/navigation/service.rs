//! NavigationService: persists the last screen and history across launches.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::NavigationError;
use crate::store::KeyValueStore;

use super::screen::{Screen, can_resume_screen};

/// Storage keys owned by navigation persistence.
pub mod keys {
    pub const NAVIGATION_STATE: &str = "navigation_state";
    pub const SESSION_ID: &str = "session_id";
    /// Keys written by the previous navigation schema.
    pub const LEGACY: &[&str] = &["currentScreen", "navigationHistory", "lastScreen"];
}

/// Most recent screens kept in the history.
pub const MAX_HISTORY: usize = 20;

/// Navigation state older than this is stale.
pub const STALE_AFTER_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current_screen: Screen,
    #[serde(default)]
    pub navigation_history: Vec<Screen>,
    pub last_navigation_time: DateTime<Utc>,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub app_version: String,
}

/// Screen to open plus the back-stack to seed the navigator with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPlan {
    pub screen: Screen,
    pub history: Vec<Screen>,
}

impl NavigationPlan {
    fn single(screen: Screen) -> Self {
        Self {
            screen,
            history: vec![screen],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationAnalytics {
    pub current_screen: Screen,
    pub history_length: usize,
    pub session_id: String,
    pub session_duration_minutes: i64,
    pub app_version: String,
    /// Evaluated as if the user were signed in.
    pub can_resume_current_screen: bool,
}

/// Push `screen` onto `history`, or swap it in for the last entry when
/// `replace` is set. Appending keeps at most [`MAX_HISTORY`] entries.
pub fn update_navigation_history(history: &[Screen], screen: Screen, replace: bool) -> Vec<Screen> {
    if replace {
        let mut next = history.to_vec();
        match next.last_mut() {
            Some(last) => *last = screen,
            None => next.push(screen),
        }
        return next;
    }

    let start = (history.len() + 1).saturating_sub(MAX_HISTORY);
    let mut next = history[start..].to_vec();
    next.push(screen);
    next
}

pub struct NavigationService {
    store: Arc<dyn KeyValueStore>,
    app_version: String,
    session_lock: Mutex<()>,
}

impl NavigationService {
    pub fn new(store: Arc<dyn KeyValueStore>, app_version: impl Into<String>) -> Self {
        Self {
            store,
            app_version: app_version.into(),
            session_lock: Mutex::new(()),
        }
    }

    /// Record the current screen and history, stamped with the session id.
    pub async fn save_navigation_state(
        &self,
        current_screen: Screen,
        navigation_history: Vec<Screen>,
    ) -> Result<NavigationState, NavigationError> {
        let state = NavigationState {
            current_screen,
            navigation_history,
            last_navigation_time: Utc::now(),
            session_id: self.session_id().await,
            app_version: self.app_version.clone(),
        };
        let raw = serde_json::to_string(&state).map_err(NavigationError::Serialize)?;
        self.store.set(keys::NAVIGATION_STATE, &raw).await?;
        debug!(screen = %current_screen, "Navigation state saved");
        Ok(state)
    }

    pub async fn navigation_state(&self) -> Result<Option<NavigationState>, NavigationError> {
        let Some(raw) = self.store.get(keys::NAVIGATION_STATE).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(NavigationError::Corrupt)
    }

    /// Pick the launch screen from the saved navigation state.
    ///
    /// Resumes the saved screen when its policy allows, otherwise the most
    /// recent allowed screen in the history, otherwise `fallback`. Any
    /// storage failure also lands on `fallback`.
    pub async fn initial_screen_with_navigation(
        &self,
        is_authenticated: bool,
        fallback: Screen,
    ) -> NavigationPlan {
        let saved = match self.navigation_state().await {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                debug!("No saved navigation state, using fallback");
                return NavigationPlan::single(fallback);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load navigation state, using fallback");
                return NavigationPlan::single(fallback);
            }
        };

        let now = Utc::now();
        let resumable =
            |screen: Screen| can_resume_screen(screen, is_authenticated, saved.last_navigation_time, now);

        if resumable(saved.current_screen) {
            info!(screen = %saved.current_screen, "Resuming saved navigation");
            let history = if saved.navigation_history.is_empty() {
                vec![saved.current_screen]
            } else {
                saved.navigation_history
            };
            return NavigationPlan {
                screen: saved.current_screen,
                history,
            };
        }

        if let Some(screen) = saved
            .navigation_history
            .iter()
            .rev()
            .copied()
            .find(|s| resumable(*s))
        {
            info!(%screen, "Resuming navigation from history");
            return NavigationPlan::single(screen);
        }

        debug!("No resumable screens found, using fallback");
        NavigationPlan::single(fallback)
    }

    pub async fn clear_navigation_state(&self) -> Result<(), NavigationError> {
        self.store.remove(keys::NAVIGATION_STATE).await?;
        info!("Navigation state cleared");
        Ok(())
    }

    /// Whether the saved state is older than a day. `false` when nothing is saved.
    pub async fn is_navigation_state_stale(&self) -> Result<bool, NavigationError> {
        let max_age = Duration::hours(STALE_AFTER_HOURS);
        Ok(self
            .navigation_state()
            .await?
            .is_some_and(|state| Utc::now() - state.last_navigation_time > max_age))
    }

    pub async fn navigation_analytics(
        &self,
    ) -> Result<Option<NavigationAnalytics>, NavigationError> {
        let Some(state) = self.navigation_state().await? else {
            return Ok(None);
        };
        let now = Utc::now();
        Ok(Some(NavigationAnalytics {
            current_screen: state.current_screen,
            history_length: state.navigation_history.len(),
            session_duration_minutes: round_minutes(now - state.last_navigation_time),
            can_resume_current_screen: can_resume_screen(
                state.current_screen,
                true,
                state.last_navigation_time,
                now,
            ),
            session_id: state.session_id,
            app_version: state.app_version,
        }))
    }

    /// Delete keys left by the previous navigation schema. Returns how many
    /// were present.
    pub async fn migrate_legacy_navigation_keys(&self) -> Result<usize, NavigationError> {
        let mut present = Vec::new();
        for key in keys::LEGACY {
            if self.store.get(key).await?.is_some() {
                present.push(*key);
            }
        }
        if !present.is_empty() {
            self.store.remove_many(&present).await?;
            info!(keys = ?present, "Legacy navigation keys removed");
        }
        Ok(present.len())
    }

    /// Existing session id, or a new one persisted for later saves.
    ///
    /// Never fails: storage errors yield an unpersisted fallback id.
    async fn session_id(&self) -> String {
        let _guard = self.session_lock.lock().await;
        match self.store.get(keys::SESSION_ID).await {
            Ok(Some(id)) => return id,
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read session id");
                return format!("fallback_{}", Utc::now().timestamp_millis());
            }
        }

        let id = new_session_id(Utc::now());
        if let Err(e) = self.store.set(keys::SESSION_ID, &id).await {
            warn!(error = %e, "Failed to persist session id");
        }
        id
    }
}

/// Whole minutes, halves rounded up.
fn round_minutes(elapsed: Duration) -> i64 {
    (elapsed.num_milliseconds() + 30_000).div_euclid(60_000)
}

fn new_session_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", now.timestamp_millis(), &suffix[..9])
}
