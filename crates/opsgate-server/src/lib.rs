//! # opsgate-server
//!
//! Axum HTTP gateway: issuance endpoint, session-gated API routes, and
//! the operative roster surface.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod issuer;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use routes::create_router;
pub use state::AppState;
