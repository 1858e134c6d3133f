//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/raw/", get(handlers::raw::no_template))
        .route("/raw/{*path}", get(handlers::raw::get_raw))
        .route("/original/", get(handlers::raw::no_template))
        .route("/original/{*path}", get(handlers::original::get_original))
        .route("/templates/{*path}", get(handlers::assets::get_asset))
        .layer(
            ServiceBuilder::new()
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
