//! REST endpoints for navigation persistence.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::error_response;

use super::screen::Screen;
use super::service::NavigationService;

/// Shared state for navigation routes.
#[derive(Clone)]
pub struct NavigationRouteState {
    pub navigation: Arc<NavigationService>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveNavigationRequest {
    current_screen: Screen,
    #[serde(default)]
    navigation_history: Vec<Screen>,
}

/// GET /api/navigation
///
/// Returns the saved navigation state, or 404 if nothing has been saved.
async fn get_navigation(State(state): State<NavigationRouteState>) -> impl IntoResponse {
    match state.navigation.navigation_state().await {
        Ok(Some(saved)) => Json(saved).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No navigation state saved"})),
        )
            .into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// PUT /api/navigation
async fn save_navigation(
    State(state): State<NavigationRouteState>,
    Json(body): Json<SaveNavigationRequest>,
) -> impl IntoResponse {
    match state
        .navigation
        .save_navigation_state(body.current_screen, body.navigation_history)
        .await
    {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// DELETE /api/navigation
async fn clear_navigation(State(state): State<NavigationRouteState>) -> impl IntoResponse {
    match state.navigation.clear_navigation_state().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /api/navigation/analytics
///
/// Includes whether the saved state is stale. 404 if nothing has been saved.
async fn get_analytics(State(state): State<NavigationRouteState>) -> impl IntoResponse {
    let analytics = match state.navigation.navigation_analytics().await {
        Ok(Some(analytics)) => analytics,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "No navigation state saved"})),
            )
                .into_response();
        }
        Err(e) => return error_response(e).into_response(),
    };
    let stale = state
        .navigation
        .is_navigation_state_stale()
        .await
        .unwrap_or(false);

    match serde_json::to_value(&analytics) {
        Ok(mut body) => {
            body["isStale"] = serde_json::Value::Bool(stale);
            Json(body).into_response()
        }
        Err(e) => error_response(e).into_response(),
    }
}

/// Build the navigation REST routes.
pub fn navigation_routes(state: NavigationRouteState) -> Router {
    Router::new()
        .route(
            "/api/navigation",
            get(get_navigation)
                .put(save_navigation)
                .delete(clear_navigation),
        )
        .route("/api/navigation/analytics", get(get_analytics))
        .with_state(state)
}
