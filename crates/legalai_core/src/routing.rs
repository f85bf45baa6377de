//! crates/legalai_core/src/routing.rs
//!
//! The portal's route table and the route guard that decides, per navigation,
//! whether a view renders or redirects based on session presence.

use crate::session::SessionPresence;

/// Every view the portal can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Features,
    Pricing,
    About,
    Contact,
    Support,
    UseCases,
    Login,
    Dashboard,
    Upload,
    Document(String),
}

/// Which session state a view requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Always renderable.
    Public,
    /// Only while signed out; signed-in users go to the dashboard.
    LoginOnly,
    /// Only while signed in; anonymous users go to the login form.
    Authenticated,
}

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render,
    Redirect(Route),
    /// The session has not been read yet; show a neutral loading state.
    Loading,
}

impl Route {
    /// Parses a request path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Home,
            "/features" => Route::Features,
            "/pricing" => Route::Pricing,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/support" => Route::Support,
            "/use-cases" => Route::UseCases,
            "/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/upload" => Route::Upload,
            other => {
                let raw = other.strip_prefix("/document/")?;
                if raw.contains('/') {
                    return None;
                }
                let id = urlencoding::decode(raw).ok()?;
                if !is_document_id(&id) {
                    return None;
                }
                Route::Document(id.into_owned())
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Features => "/features".to_string(),
            Route::Pricing => "/pricing".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Support => "/support".to_string(),
            Route::UseCases => "/use-cases".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Upload => "/upload".to_string(),
            Route::Document(id) => format!("/document/{}", urlencoding::encode(id)),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login => Access::LoginOnly,
            Route::Dashboard | Route::Upload | Route::Document(_) => Access::Authenticated,
            _ => Access::Public,
        }
    }
}

/// Whether `id` can stand as a single path segment. Dot segments would be
/// collapsed by URL normalization and escape the document collection.
pub fn is_document_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".."
}

/// Decides render-or-redirect for a view class given the session presence.
pub fn guard(access: Access, presence: SessionPresence) -> Resolution {
    match (access, presence) {
        (_, SessionPresence::Unknown) => Resolution::Loading,
        (Access::Public, _) => Resolution::Render,
        (Access::LoginOnly, SessionPresence::Present) => Resolution::Redirect(Route::Dashboard),
        (Access::LoginOnly, SessionPresence::Absent) => Resolution::Render,
        (Access::Authenticated, SessionPresence::Present) => Resolution::Render,
        (Access::Authenticated, SessionPresence::Absent) => Resolution::Redirect(Route::Login),
    }
}

/// Guards navigation to `route`.
pub fn resolve(route: &Route, presence: SessionPresence) -> Resolution {
    guard(route.access(), presence)
}
