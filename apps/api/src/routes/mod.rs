pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Templates
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        .route("/api/v1/templates/:name", get(handlers::handle_get_template))
        // Pipeline stages
        .route("/api/v1/resumes/ast", post(handlers::handle_build_ast))
        .route("/api/v1/resumes/layout", post(handlers::handle_resolve_layout))
        // Render
        .route("/api/v1/render/html", post(handlers::handle_render_html))
        .route("/api/v1/render/pdf", post(handlers::handle_render_pdf))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
