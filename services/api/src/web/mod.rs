pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::optional_auth;
pub use rest::{
    export_pdf_handler, export_text_handler, generate_notes_handler, get_notes_handler,
    history_handler, levels_handler, solution_handler,
};

use auth::{login_handler, logout_handler, signup_handler};
use state::AppState;

/// Builds the API router. Every route sees an optional `CurrentUser`.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/levels", get(levels_handler))
        .route("/notes", post(generate_notes_handler))
        .route("/notes/history", get(history_handler))
        .route("/notes/{id}", get(get_notes_handler))
        .route("/notes/{id}/export/txt", get(export_text_handler))
        .route("/notes/{id}/export/pdf", get(export_pdf_handler))
        .route(
            "/notes/{id}/chapters/{chapter}/questions/{question}/solution",
            get(solution_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            optional_auth,
        ))
        .with_state(app_state)
}
