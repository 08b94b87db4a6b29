//! REST endpoints for launch resolution, onboarding status and the journey.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::error_response;

use super::journey::JourneyState;
use super::resolver::LaunchResolver;
use super::service::OnboardingService;

/// Shared state for launch and onboarding routes.
#[derive(Clone)]
pub struct LaunchRouteState {
    pub onboarding: Arc<OnboardingService>,
    pub resolver: Arc<LaunchResolver>,
}

#[derive(Debug, Default, Deserialize)]
struct LaunchQuery {
    #[serde(default)]
    authenticated: bool,
}

/// GET /api/launch?authenticated=bool
///
/// Full launch plan. Never fails; errors resolve to onboarding.
async fn get_launch(
    State(state): State<LaunchRouteState>,
    Query(query): Query<LaunchQuery>,
) -> impl IntoResponse {
    Json(state.resolver.launch(query.authenticated).await)
}

/// GET /api/launch/screen?authenticated=bool
async fn get_launch_screen(
    State(state): State<LaunchRouteState>,
    Query(query): Query<LaunchQuery>,
) -> impl IntoResponse {
    let screen = state.resolver.initial_screen(query.authenticated).await;
    Json(serde_json::json!({ "screen": screen }))
}

/// GET /api/onboarding/state
async fn get_state(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    Json(state.resolver.onboarding_state().await)
}

/// GET /api/onboarding/first-time
async fn get_first_time(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    let first_time = state.resolver.is_first_time_user().await;
    Json(serde_json::json!({ "isFirstTimeUser": first_time }))
}

async fn start(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.onboarding.start_onboarding().await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn complete(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.onboarding.complete_onboarding().await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn skip(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.onboarding.skip_onboarding().await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /api/onboarding/needs-update
async fn get_needs_update(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    let needs_update = state.resolver.needs_onboarding_update().await;
    Json(serde_json::json!({ "needsUpdate": needs_update }))
}

/// GET /api/onboarding/analytics
///
/// 503 when the records cannot be read.
async fn get_analytics(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.resolver.onboarding_analytics().await {
        Some(analytics) => Json(analytics).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": "Onboarding analytics unavailable"})),
        )
            .into_response(),
    }
}

/// DELETE /api/onboarding
async fn clear(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.onboarding.clear_onboarding_data().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /api/journey
///
/// Returns the saved journey, or 404 if none exists.
async fn get_journey(State(state): State<LaunchRouteState>) -> impl IntoResponse {
    match state.resolver.user_journey().await {
        Some(journey) => Json(journey).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No journey saved"})),
        )
            .into_response(),
    }
}

/// PUT /api/journey
///
/// Replaces the saved journey wholesale.
async fn save_journey(
    State(state): State<LaunchRouteState>,
    Json(journey): Json<JourneyState>,
) -> impl IntoResponse {
    match state.onboarding.save_user_journey(journey).await {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// Build the launch, onboarding and journey REST routes.
pub fn launch_routes(state: LaunchRouteState) -> Router {
    Router::new()
        .route("/api/launch", get(get_launch))
        .route("/api/launch/screen", get(get_launch_screen))
        .route("/api/onboarding", delete(clear))
        .route("/api/onboarding/state", get(get_state))
        .route("/api/onboarding/first-time", get(get_first_time))
        .route("/api/onboarding/start", post(start))
        .route("/api/onboarding/complete", post(complete))
        .route("/api/onboarding/skip", post(skip))
        .route("/api/onboarding/needs-update", get(get_needs_update))
        .route("/api/onboarding/analytics", get(get_analytics))
        .route("/api/journey", get(get_journey).put(save_journey))
        .with_state(state)
}
