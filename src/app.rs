use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::controller::UiPaths;
use crate::handlers::{resource, site};
use crate::middleware::require_session;
use crate::model::{Resource, User};
use crate::session::{SessionGate, SessionResolver};

/// Shared, read-only state for the session-gated routes
pub struct AppState<R> {
    pub gate: Arc<SessionGate<R>>,
    pub paths: UiPaths,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            paths: self.paths.clone(),
        }
    }
}

impl<R: SessionResolver> AppState<R> {
    pub fn new(gate: SessionGate<R>, paths: UiPaths) -> Self {
        Self {
            gate: Arc::new(gate),
            paths,
        }
    }
}

/// The complete UI application
pub fn app<R: SessionResolver>(state: AppState<R>) -> Router {
    Router::new()
        .merge(site_routes(&state.paths))
        .merge(resource_routes::<User, R>(state))
        .layer(TraceLayer::new_for_http())
}

fn site_routes(paths: &UiPaths) -> Router {
    let home = if paths.prefix().is_empty() {
        "/".to_string()
    } else {
        paths.prefix().to_string()
    };

    Router::new()
        .route("/health", get(site::health))
        .route(&home, get(site::home))
        .route(&paths.login(), get(site::login))
        .with_state(paths.clone())
}

/// Index, new, create, show, edit and update routes for one resource, all behind the session gate
pub fn resource_routes<M: Resource, R: SessionResolver>(state: AppState<R>) -> Router {
    let paths = state.paths.clone();

    Router::new()
        .route(
            &paths.index(M::NAME),
            get(resource::index::<M>).post(resource::create::<M>),
        )
        .route(&paths.new_form(M::NAME), get(resource::new_form::<M>))
        .route(
            &paths.item_route(M::NAME),
            get(resource::show::<M>).post(resource::update::<M>),
        )
        .route(&paths.edit_route(M::NAME), get(resource::edit_form::<M>))
        .route_layer(middleware::from_fn_with_state(state, require_session::<R>))
        .with_state(paths)
}
