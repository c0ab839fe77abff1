pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod pages;
pub mod session;
pub mod state;
pub mod templates;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route(
            "/customers",
            get(pages::customers_list).post(pages::customers_create),
        )
        .route("/customers/{id}/edit", get(pages::customers_edit))
        .route("/customers/{id}", post(pages::customers_update))
        .route("/customers/{id}/delete", post(pages::customers_delete))
        .route(
            "/register",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/dashboard", get(auth::dashboard))
        .route("/logout", get(auth::logout))
        .route("/health", get(pages::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
