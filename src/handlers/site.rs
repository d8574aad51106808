// handlers/site.rs - public routes that need no session

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json, Redirect},
};
use serde_json::json;

use crate::controller::UiPaths;
use crate::model::{Resource, User};
use crate::view;

/// GET /health - liveness probe
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now(),
        }
    }))
}

/// GET /ui - land on the users index
pub async fn home(State(paths): State<UiPaths>) -> Redirect {
    Redirect::to(&paths.index(User::NAME))
}

/// GET /ui/sessions/new - where unauthenticated requests are sent
pub async fn login(State(paths): State<UiPaths>) -> Html<String> {
    Html(view::login(&paths))
}
