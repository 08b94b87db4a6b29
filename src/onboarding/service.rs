//! OnboardingService: owns the onboarding and journey records.
//!
//! Every operation reports failures as `OnboardingError`. Read-modify-write
//! sequences on the onboarding record run under one async mutex, so
//! concurrent mutators cannot drop each other's flag changes.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::OnboardingConfig;
use crate::error::OnboardingError;
use crate::store::KeyValueStore;

use super::analytics::OnboardingAnalytics;
use super::journey::JourneyState;
use super::keys;
use super::state::OnboardingState;

/// What `migrate_legacy_keys` carried over from the previous schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMigration {
    pub onboarding_state: bool,
    pub journey: bool,
}

impl LegacyMigration {
    pub fn migrated_anything(&self) -> bool {
        self.onboarding_state || self.journey
    }
}

pub struct OnboardingService {
    store: Arc<dyn KeyValueStore>,
    config: OnboardingConfig,
    /// Serializes read-modify-write on the onboarding record.
    state_lock: Mutex<()>,
}

impl OnboardingService {
    pub fn new(store: Arc<dyn KeyValueStore>, config: OnboardingConfig) -> Self {
        Self {
            store,
            config,
            state_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    // ── Onboarding record ───────────────────────────────────────────

    /// Whether the user has never entered onboarding.
    pub async fn is_first_time_user(&self) -> Result<bool, OnboardingError> {
        Ok(!self.onboarding_state().await?.has_seen_onboarding)
    }

    /// Load the onboarding record, creating it on first launch.
    ///
    /// Every read refreshes `lastLaunchDate`. Persisting that refresh is
    /// best-effort: a failed write is logged and the loaded record is still
    /// returned. Read and parse failures are errors.
    pub async fn onboarding_state(&self) -> Result<OnboardingState, OnboardingError> {
        let _guard = self.state_lock.lock().await;
        let (state, existed) = self.load_touched().await?;
        if let Err(e) = self.write_record(keys::ONBOARDING_STATE, &state).await {
            warn!(error = %e, "Failed to persist onboarding launch refresh");
        } else if !existed {
            info!("Created onboarding state for first launch");
        }
        Ok(state)
    }

    /// Replace the onboarding record.
    pub async fn save_onboarding_state(
        &self,
        state: &OnboardingState,
    ) -> Result<(), OnboardingError> {
        let _guard = self.state_lock.lock().await;
        self.write_record(keys::ONBOARDING_STATE, state).await?;
        debug!("Onboarding state saved");
        Ok(())
    }

    /// Mark onboarding as entered.
    pub async fn start_onboarding(&self) -> Result<OnboardingState, OnboardingError> {
        let state = self.update_state(OnboardingState::mark_started).await?;
        info!("Onboarding started");
        Ok(state)
    }

    /// Mark onboarding as finished normally.
    pub async fn complete_onboarding(&self) -> Result<OnboardingState, OnboardingError> {
        let state = self.update_state(OnboardingState::mark_completed).await?;
        info!("Onboarding completed");
        Ok(state)
    }

    /// Mark onboarding as explicitly skipped.
    pub async fn skip_onboarding(&self) -> Result<OnboardingState, OnboardingError> {
        let state = self.update_state(OnboardingState::mark_skipped).await?;
        info!("Onboarding skipped");
        Ok(state)
    }

    /// Whether the stored record predates this build's onboarding content.
    ///
    /// Not consulted by the launch decision; hosts call it when they want
    /// version-triggered re-onboarding.
    pub async fn needs_onboarding_update(&self) -> Result<bool, OnboardingError> {
        let state = self.onboarding_state().await?;
        Ok(state.is_outdated(self.config.current_version))
    }

    // ── Journey record ──────────────────────────────────────────────

    /// Load the journey record. `None` means no journey was ever saved.
    pub async fn user_journey(&self) -> Result<Option<JourneyState>, OnboardingError> {
        self.read_record(keys::USER_JOURNEY).await
    }

    /// Stamp `lastSavedAt` and overwrite the journey record.
    pub async fn save_user_journey(
        &self,
        mut journey: JourneyState,
    ) -> Result<JourneyState, OnboardingError> {
        journey.last_saved_at = Some(Utc::now());
        self.write_record(keys::USER_JOURNEY, &journey).await?;
        debug!(screen = %journey.current_screen, "User journey saved");
        Ok(journey)
    }

    // ── Derived / maintenance ───────────────────────────────────────

    /// Summary over both records.
    pub async fn analytics(&self) -> Result<OnboardingAnalytics, OnboardingError> {
        let state = self.onboarding_state().await?;
        let journey = self.user_journey().await?;
        Ok(OnboardingAnalytics::derive(
            &state,
            journey.as_ref(),
            Utc::now(),
        ))
    }

    /// Remove both records, the reserved preferences key and the legacy keys.
    pub async fn clear_onboarding_data(&self) -> Result<(), OnboardingError> {
        let _guard = self.state_lock.lock().await;
        self.store.remove_many(keys::ALL).await?;
        info!("Onboarding data cleared");
        Ok(())
    }

    /// Carry records written by the previous schema into the current keys,
    /// then delete the legacy keys.
    ///
    /// Current records always win over legacy ones. Unparseable legacy
    /// values are dropped.
    pub async fn migrate_legacy_keys(&self) -> Result<LegacyMigration, OnboardingError> {
        let _guard = self.state_lock.lock().await;
        let mut report = LegacyMigration::default();

        let legacy_seen = self.store.get(keys::LEGACY_HAS_SEEN_ONBOARDING).await?;
        let legacy_journey = self.store.get(keys::LEGACY_USER_JOURNEY).await?;
        if legacy_seen.is_none() && legacy_journey.is_none() {
            return Ok(report);
        }

        if let Some(raw) = legacy_seen {
            if is_truthy(&raw) && self.store.get(keys::ONBOARDING_STATE).await?.is_none() {
                let mut state = OnboardingState::fresh(&self.config, Utc::now());
                state.mark_started();
                self.write_record(keys::ONBOARDING_STATE, &state).await?;
                report.onboarding_state = true;
            }
        }

        if let Some(raw) = legacy_journey {
            if self.store.get(keys::USER_JOURNEY).await?.is_none() {
                match serde_json::from_str::<JourneyState>(&raw) {
                    Ok(journey) => {
                        self.write_record(keys::USER_JOURNEY, &journey).await?;
                        report.journey = true;
                    }
                    Err(e) => warn!(error = %e, "Dropping unparseable legacy journey"),
                }
            }
        }

        self.store
            .remove_many(&[keys::LEGACY_HAS_SEEN_ONBOARDING, keys::LEGACY_USER_JOURNEY])
            .await?;
        info!(
            onboarding_state = report.onboarding_state,
            journey = report.journey,
            "Legacy onboarding keys migrated"
        );
        Ok(report)
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Read the record (or a fresh one) with the launch date refreshed.
    /// Caller must hold `state_lock`.
    async fn load_touched(&self) -> Result<(OnboardingState, bool), OnboardingError> {
        let now = Utc::now();
        let Some(raw) = self.store.get(keys::ONBOARDING_STATE).await? else {
            return Ok((OnboardingState::fresh(&self.config, now), false));
        };
        let mut state = OnboardingState::from_stored(&raw, &self.config, now).map_err(|source| {
            OnboardingError::Corrupt {
                key: keys::ONBOARDING_STATE,
                source,
            }
        })?;
        state.touch(now);
        Ok((state, true))
    }

    async fn update_state(
        &self,
        apply: impl FnOnce(&mut OnboardingState),
    ) -> Result<OnboardingState, OnboardingError> {
        let _guard = self.state_lock.lock().await;
        let mut state = match self.load_touched().await {
            Ok((state, _)) => state,
            Err(OnboardingError::Corrupt { key, source }) => {
                warn!(key, error = %source, "Replacing malformed onboarding record");
                OnboardingState::fresh(&self.config, Utc::now())
            }
            Err(e) => return Err(e),
        };
        apply(&mut state);
        self.write_record(keys::ONBOARDING_STATE, &state).await?;
        Ok(state)
    }

    async fn read_record<T: DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Option<T>, OnboardingError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| OnboardingError::Corrupt { key, source })
    }

    async fn write_record<T: Serialize>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), OnboardingError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| OnboardingError::Serialize { key, source })?;
        self.store.set(key, &raw).await?;
        Ok(())
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "1" | "\"true\"")
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    /// Store whose reads and/or writes fail on demand.
    #[derive(Default)]
    pub(crate) struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_reads: AtomicBool,
        pub fail_writes: AtomicBool,
        pub writes: AtomicUsize,
    }

    impl FlakyStore {
        pub fn failing() -> Self {
            let store = Self::default();
            store.fail_reads.store(true, Ordering::SeqCst);
            store.fail_writes.store(true, Ordering::SeqCst);
            store
        }
    }

    #[async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("read refused".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("write refused".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }

        async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("write refused".into()));
            }
            self.inner.remove_many(keys).await
        }
    }

    /// Store that yields between every operation, widening race windows.
    #[derive(Default)]
    struct SlowStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for SlowStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let value = self.inner.get(key).await;
            tokio::time::sleep(Duration::from_millis(5)).await;
            value
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.inner.set(key, value).await
        }

        async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
            self.inner.remove_many(keys).await
        }
    }

    fn service_over(store: Arc<dyn KeyValueStore>) -> OnboardingService {
        OnboardingService::new(store, OnboardingConfig::default())
    }

    async fn stored_state(store: &MemoryStore) -> Option<OnboardingState> {
        store
            .get(keys::ONBOARDING_STATE)
            .await
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    // ── First launch ────────────────────────────────────────────────

    #[tokio::test]
    async fn fresh_install_is_first_time_and_persists_record() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        assert!(svc.is_first_time_user().await.unwrap());

        let persisted = stored_state(&store).await.expect("record persisted");
        assert!(!persisted.has_seen_onboarding);
        assert_eq!(persisted.onboarding_version, 1);
        assert_eq!(persisted.app_version, "1.0.0");
    }

    #[tokio::test]
    async fn returning_user_is_not_first_time() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::ONBOARDING_STATE,
                r#"{"hasSeenOnboarding":true,"completedOnboarding":true,"skippedOnboarding":false,
                    "onboardingVersion":1,"firstLaunchDate":"2024-01-01T00:00:00.000Z",
                    "lastLaunchDate":"2024-01-02T00:00:00.000Z","appVersion":"1.0.0"}"#,
            )
            .await
            .unwrap();
        let svc = service_over(store);
        assert!(!svc.is_first_time_user().await.unwrap());
    }

    #[tokio::test]
    async fn read_refreshes_last_launch_but_keeps_first_launch() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::ONBOARDING_STATE,
                r#"{"hasSeenOnboarding":true,"firstLaunchDate":"2024-01-01T00:00:00Z",
                    "lastLaunchDate":"2024-01-01T00:00:00Z"}"#,
            )
            .await
            .unwrap();
        let svc = service_over(store.clone());

        let state = svc.onboarding_state().await.unwrap();
        let original: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        assert!(state.last_launch_date > original);
        assert_eq!(state.first_launch_date, original);

        let persisted = stored_state(&store).await.unwrap();
        assert_eq!(persisted.last_launch_date, state.last_launch_date);
    }

    #[tokio::test]
    async fn consecutive_reads_differ_only_in_last_launch() {
        let svc = service_over(Arc::new(MemoryStore::new()));
        let first = svc.onboarding_state().await.unwrap();
        let second = svc.onboarding_state().await.unwrap();

        assert!(second.last_launch_date >= first.last_launch_date);
        assert_eq!(
            OnboardingState {
                last_launch_date: first.last_launch_date,
                ..second
            },
            first
        );
    }

    #[tokio::test]
    async fn malformed_record_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ONBOARDING_STATE, "{not json").await.unwrap();
        let svc = service_over(store.clone());

        let err = svc.onboarding_state().await.unwrap_err();
        assert!(matches!(
            err,
            OnboardingError::Corrupt {
                key: keys::ONBOARDING_STATE,
                ..
            }
        ));
        // Left untouched for inspection.
        assert_eq!(
            store.get(keys::ONBOARDING_STATE).await.unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn save_replaces_record() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        let mut state = svc.onboarding_state().await.unwrap();
        state.mark_skipped();
        svc.save_onboarding_state(&state).await.unwrap();

        assert_eq!(stored_state(&store).await.unwrap(), state);
        assert!(svc.onboarding_state().await.unwrap().skipped_onboarding);
    }

    #[tokio::test]
    async fn mutator_replaces_malformed_record() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::ONBOARDING_STATE, "{not json").await.unwrap();
        let svc = service_over(store.clone());

        let state = svc.complete_onboarding().await.unwrap();
        assert!(state.has_seen_onboarding && state.completed_onboarding);

        let persisted = stored_state(&store).await.unwrap();
        assert_eq!(persisted, state);
        assert!(!svc.is_first_time_user().await.unwrap());
    }

    #[tokio::test]
    async fn mutator_read_error_propagates() {
        let store = Arc::new(FlakyStore::default());
        store.fail_reads.store(true, Ordering::SeqCst);
        let svc = service_over(store.clone());

        assert!(matches!(
            svc.start_onboarding().await,
            Err(OnboardingError::Store(_))
        ));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn read_error_propagates() {
        let svc = service_over(Arc::new(FlakyStore::failing()));
        assert!(matches!(
            svc.is_first_time_user().await,
            Err(OnboardingError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn failed_launch_refresh_still_returns_state() {
        let store = Arc::new(FlakyStore::default());
        store
            .inner
            .set(keys::ONBOARDING_STATE, r#"{"hasSeenOnboarding":true}"#)
            .await
            .unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);
        let svc = service_over(store);

        let state = svc.onboarding_state().await.unwrap();
        assert!(state.has_seen_onboarding);
    }

    // ── Mutators ────────────────────────────────────────────────────

    #[tokio::test]
    async fn start_sets_seen() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        let state = svc.start_onboarding().await.unwrap();
        assert!(state.has_seen_onboarding);
        assert!(!state.completed_onboarding);

        let raw = store.get(keys::ONBOARDING_STATE).await.unwrap().unwrap();
        assert!(raw.contains(r#""hasSeenOnboarding":true"#));
    }

    #[tokio::test]
    async fn complete_sets_seen_and_completed() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        svc.complete_onboarding().await.unwrap();
        let persisted = stored_state(&store).await.unwrap();
        assert!(persisted.has_seen_onboarding);
        assert!(persisted.completed_onboarding);
        assert!(!persisted.skipped_onboarding);
    }

    #[tokio::test]
    async fn skip_sets_seen_and_skipped() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        svc.skip_onboarding().await.unwrap();
        let persisted = stored_state(&store).await.unwrap();
        assert!(persisted.has_seen_onboarding);
        assert!(persisted.skipped_onboarding);
        assert!(!persisted.completed_onboarding);
    }

    #[tokio::test]
    async fn mutator_write_failure_is_reported() {
        let store = Arc::new(FlakyStore::default());
        store.fail_writes.store(true, Ordering::SeqCst);
        let svc = service_over(store);
        assert!(svc.complete_onboarding().await.is_err());
    }

    #[tokio::test]
    async fn each_mutator_writes_once() {
        let store = Arc::new(FlakyStore::default());
        let svc = service_over(store.clone());

        svc.start_onboarding().await.unwrap();
        svc.complete_onboarding().await.unwrap();
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_mutators_keep_every_flag() {
        let svc = Arc::new(service_over(Arc::new(SlowStore::default())));

        let (a, b, c) = tokio::join!(
            svc.complete_onboarding(),
            svc.skip_onboarding(),
            svc.onboarding_state(),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let state = svc.onboarding_state().await.unwrap();
        assert!(state.has_seen_onboarding);
        assert!(state.completed_onboarding);
        assert!(state.skipped_onboarding);
    }

    // ── Journey ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn journey_absent_is_none() {
        let svc = service_over(Arc::new(MemoryStore::new()));
        assert_eq!(svc.user_journey().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_journey_stamps_and_overwrites() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());

        let mut first = JourneyState::new("photoCapture");
        first.completed_steps = vec!["onboarding1".into(), "onboarding2".into()];
        first.selected_styles = vec!["modern".into(), "scandinavian".into()];
        first.selected_plan = Some("pro".into());
        let stale: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        first.last_saved_at = Some(stale);

        let saved = svc.save_user_journey(first).await.unwrap();
        assert!(saved.last_saved_at.unwrap() > stale);
        let raw = store.get(keys::USER_JOURNEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""currentScreen":"photoCapture""#));

        // Second save replaces the whole record; nothing carries over.
        svc.save_user_journey(JourneyState::new("budget"))
            .await
            .unwrap();
        let loaded = svc.user_journey().await.unwrap().unwrap();
        assert_eq!(loaded.current_screen, "budget");
        assert!(loaded.completed_steps.is_empty());
        assert!(loaded.selected_plan.is_none());
    }

    #[tokio::test]
    async fn journey_round_trips_fields() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::USER_JOURNEY,
                r#"{"currentScreen":"budget","completedSteps":["onboarding1","onboarding2","onboarding3"],
                    "selectedStyles":["luxury"],"selectedPlan":"business",
                    "lastSavedAt":"2024-01-01T00:00:00.000Z"}"#,
            )
            .await
            .unwrap();
        let svc = service_over(store);

        let journey = svc.user_journey().await.unwrap().unwrap();
        assert_eq!(journey.current_screen, "budget");
        assert_eq!(journey.completed_steps.len(), 3);
        assert_eq!(journey.selected_styles, vec!["luxury"]);
        assert_eq!(journey.selected_plan.as_deref(), Some("business"));
    }

    // ── Version / analytics / reset ─────────────────────────────────

    #[tokio::test]
    async fn needs_update_when_version_is_behind() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                keys::ONBOARDING_STATE,
                r#"{"hasSeenOnboarding":true,"onboardingVersion":1}"#,
            )
            .await
            .unwrap();

        let current = service_over(store.clone());
        assert!(!current.needs_onboarding_update().await.unwrap());

        let newer = OnboardingService::new(
            store,
            OnboardingConfig {
                current_version: 2,
                ..OnboardingConfig::default()
            },
        );
        assert!(newer.needs_onboarding_update().await.unwrap());
    }

    #[tokio::test]
    async fn analytics_composes_both_records() {
        let store = Arc::new(MemoryStore::new());
        let week_ago = (Utc::now() - chrono::Duration::days(7)).to_rfc3339();
        store
            .set(
                keys::ONBOARDING_STATE,
                &format!(
                    r#"{{"hasSeenOnboarding":true,"completedOnboarding":true,"firstLaunchDate":"{week_ago}"}}"#
                ),
            )
            .await
            .unwrap();
        store
            .set(
                keys::USER_JOURNEY,
                r#"{"currentScreen":"results","selectedStyles":["modern","industrial"],"selectedPlan":"pro"}"#,
            )
            .await
            .unwrap();
        let svc = service_over(store);

        let analytics = svc.analytics().await.unwrap();
        assert!(!analytics.is_first_time_user);
        assert!(analytics.has_completed_onboarding);
        assert_eq!(analytics.days_since_first_launch, 7);
        assert_eq!(analytics.current_journey_step, "results");
        assert_eq!(analytics.selected_styles, 2);
        assert!(analytics.has_selected_plan);
    }

    #[tokio::test]
    async fn clear_removes_all_keys_and_resets_first_time() {
        let store = Arc::new(MemoryStore::new());
        for key in keys::ALL {
            store.set(key, "true").await.unwrap();
        }
        let svc = service_over(store.clone());

        svc.clear_onboarding_data().await.unwrap();
        for key in keys::ALL {
            assert!(!store.contains(key).await, "{key} should be removed");
        }
        assert!(svc.is_first_time_user().await.unwrap());
    }

    // ── Legacy migration ────────────────────────────────────────────

    #[tokio::test]
    async fn migrates_legacy_keys() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::LEGACY_HAS_SEEN_ONBOARDING, "true")
            .await
            .unwrap();
        store
            .set(
                keys::LEGACY_USER_JOURNEY,
                r#"{"currentScreen":"furniture","completedSteps":["onboarding1"]}"#,
            )
            .await
            .unwrap();
        let svc = service_over(store.clone());

        let report = svc.migrate_legacy_keys().await.unwrap();
        assert_eq!(
            report,
            LegacyMigration {
                onboarding_state: true,
                journey: true
            }
        );
        assert!(!store.contains(keys::LEGACY_HAS_SEEN_ONBOARDING).await);
        assert!(!store.contains(keys::LEGACY_USER_JOURNEY).await);

        assert!(!svc.is_first_time_user().await.unwrap());
        let journey = svc.user_journey().await.unwrap().unwrap();
        assert_eq!(journey.current_screen, "furniture");
    }

    #[tokio::test]
    async fn current_records_win_over_legacy() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_over(store.clone());
        svc.save_user_journey(JourneyState::new("budget"))
            .await
            .unwrap();
        store
            .set(keys::LEGACY_USER_JOURNEY, r#"{"currentScreen":"auth"}"#)
            .await
            .unwrap();
        store
            .set(keys::LEGACY_HAS_SEEN_ONBOARDING, "false")
            .await
            .unwrap();

        let report = svc.migrate_legacy_keys().await.unwrap();
        assert!(!report.migrated_anything());
        assert_eq!(
            svc.user_journey().await.unwrap().unwrap().current_screen,
            "budget"
        );
        assert!(!store.contains(keys::LEGACY_USER_JOURNEY).await);
    }

    #[tokio::test]
    async fn migration_without_legacy_keys_is_a_no_op() {
        let store = Arc::new(FlakyStore::default());
        let svc = service_over(store.clone());
        let report = svc.migrate_legacy_keys().await.unwrap();
        assert!(!report.migrated_anything());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }
}
