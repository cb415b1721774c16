//! Route definitions for the gateway.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Create the gateway router.
///
/// Everything under `/api/v1` sits behind the session gate; issuance
/// and liveness are reachable without a credential.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/user", get(handlers::user))
        .route("/api/v1/hash", get(handlers::hash_key))
        .route("/api/v1/operatives", get(handlers::operatives))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .merge(protected)
        .route("/api/auth/google", post(handlers::google_login))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
