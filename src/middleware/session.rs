use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::controller::unauthenticated;
use crate::session::SessionResolver;

/// Session gate middleware: resolves the session cookie once and injects the
/// bound [`Client`](crate::client::Client) into the request, or redirects to the
/// login page before any body is read or backend contacted.
pub async fn require_session<R: SessionResolver>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.gate.resolve(request.headers()).await {
        Some(client) => {
            request.extensions_mut().insert(client);
            next.run(request).await
        }
        None => {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "unauthenticated request, redirecting to login"
            );
            unauthenticated(&state.paths).respond(|_| String::new())
        }
    }
}
