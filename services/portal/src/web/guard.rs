//! services/portal/src/web/guard.rs
//!
//! Route-guard middleware. Every request for a view (or an action nested under
//! one) is checked against the current session presence before it reaches its
//! handler.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use legalai_core::routing::{self, Resolution, Route};
use std::sync::Arc;
use tracing::debug;

use crate::web::{render, state::AppState};

/// Maps a request path to the view that owns it. Actions such as
/// `/document/{id}/reply` or `/upload/dismiss` belong to the nearest enclosing view.
pub fn owning_route(path: &str) -> Option<Route> {
    Route::parse(path).or_else(|| {
        let (parent, _) = path.trim_end_matches('/').rsplit_once('/')?;
        if parent.is_empty() {
            return None;
        }
        owning_route(parent)
    })
}

/// Middleware that renders, redirects, or shows the loading page for a request.
///
/// If the view renders, the resolved `Route` is inserted into request extensions
/// for handlers to use. Paths outside the route table pass through untouched,
/// except malformed document paths, which are answered with 404.
pub async fn guard_route(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(route) = owning_route(req.uri().path()) else {
        // A document path whose id is not a single segment never reaches a handler.
        if req.uri().path().starts_with("/document/") {
            return StatusCode::NOT_FOUND.into_response();
        }
        return next.run(req).await;
    };

    let presence = state.session.presence().await;
    match routing::resolve(&route, presence) {
        Resolution::Render => {
            req.extensions_mut().insert(route);
            next.run(req).await
        }
        Resolution::Redirect(target) => {
            debug!("Redirecting {} to {}", req.uri().path(), target.path());
            Redirect::to(&target.path()).into_response()
        }
        Resolution::Loading => render::loading_page().into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_belong_to_their_view() {
        assert_eq!(
            owning_route("/document/abc/reply"),
            Some(Route::Document("abc".to_string()))
        );
        assert_eq!(
            owning_route("/document/abc/reply/new"),
            Some(Route::Document("abc".to_string()))
        );
        assert_eq!(owning_route("/upload/dismiss"), Some(Route::Upload));
        assert_eq!(owning_route("/login"), Some(Route::Login));
        assert_eq!(owning_route("/logout"), None);
        assert_eq!(owning_route("/document/%2E%2E/reply"), None);
    }
}
