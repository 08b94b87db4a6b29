//! Service wiring and the combined HTTP router.

use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::OnboardingConfig;
use crate::navigation::{NavigationRouteState, NavigationService, navigation_routes};
use crate::onboarding::{LaunchResolver, LaunchRouteState, OnboardingService, launch_routes};
use crate::store::KeyValueStore;

/// Every service built over one store.
#[derive(Clone)]
pub struct AppServices {
    pub onboarding: Arc<OnboardingService>,
    pub navigation: Arc<NavigationService>,
    pub resolver: Arc<LaunchResolver>,
}

impl AppServices {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &OnboardingConfig) -> Self {
        let onboarding = Arc::new(OnboardingService::new(
            Arc::clone(&store),
            config.clone(),
        ));
        let navigation = Arc::new(NavigationService::new(store, config.app_version.clone()));
        let resolver = Arc::new(LaunchResolver::new(
            Arc::clone(&onboarding),
            Arc::clone(&navigation),
        ));
        Self {
            onboarding,
            navigation,
            resolver,
        }
    }

    /// Build the full router: health plus every REST route.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .merge(launch_routes(LaunchRouteState {
                onboarding: Arc::clone(&self.onboarding),
                resolver: Arc::clone(&self.resolver),
            }))
            .merge(navigation_routes(NavigationRouteState {
                navigation: Arc::clone(&self.navigation),
            }))
            .layer(CorsLayer::permissive())
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "launch-state",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 500 with `{"error": ...}`, logged at error level.
pub(crate) fn error_response(e: impl Display) -> impl IntoResponse {
    tracing::error!(error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
}
