pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod guard;
pub mod pages;
pub mod render;
pub mod state;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use guard::guard_route;
pub use state::AppState;

/// Builds the portal router. Every view path goes through the route guard.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::marketing_page))
        .route("/features", get(pages::marketing_page))
        .route("/pricing", get(pages::marketing_page))
        .route("/about", get(pages::marketing_page))
        .route("/contact", get(pages::marketing_page))
        .route("/support", get(pages::marketing_page))
        .route("/use-cases", get(pages::marketing_page))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/upload", get(upload::upload_form).post(upload::upload_submit))
        .route("/upload/dismiss", post(upload::upload_dismiss))
        .route("/document/{id}", get(analysis::analysis_page))
        .route("/document/{id}/reply", post(analysis::reply_submit))
        .route("/document/{id}/reply/new", post(analysis::reply_new))
        .layer(axum_middleware::from_fn_with_state(state.clone(), guard_route))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
