//! services/portal/src/web/auth.rs
//!
//! Login, registration and logout.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use legalai_core::domain::{AuthMode, Credentials};
use legalai_core::routing::Route;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::{render, state::AppState};

const AUTH_FAILED_MESSAGE: &str = "An error occurred";

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    pub mode: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub mode: Option<String>,
    pub email: String,
    pub password: String,
}

//=========================================================================================
// Rendering
//=========================================================================================

fn login_form(mode: AuthMode, email: &str, error: Option<&str>) -> Html<String> {
    let (title, submit, switch_href, switch_text) = match mode {
        AuthMode::Login => (
            "Welcome Back",
            "Sign In",
            "/login?mode=register",
            "Don't have an account? Sign up",
        ),
        AuthMode::Register => (
            "Create Your Account",
            "Create Account",
            "/login",
            "Already have an account? Sign in",
        ),
    };
    let error = error
        .map(|message| render::error_panel(message, None))
        .unwrap_or_default();
    let body = format!(
        r#"<section class="card">
<h1>{title}</h1>
{error}
<form method="post" action="/login">
<input type="hidden" name="mode" value="{mode}">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">{submit}</button>
</form>
<p><a href="{switch_href}">{switch_text}</a></p>
</section>"#,
        mode = mode.as_str(),
        email = render::escape(email),
    );
    render::page(title, false, &body)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /login - Shows the sign-in form, or the sign-up form with `?mode=register`.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    login_form(AuthMode::parse(query.mode.as_deref()), "", None)
}

/// POST /login - Authenticates against the backend and stores the session.
///
/// A failure re-renders the form with the backend's message and keeps the email.
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let mode = AuthMode::parse(form.mode.as_deref());
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };

    match state.api.authenticate(mode, &credentials).await {
        Ok(session) => {
            info!("Signed in as user {}", session.user_id);
            state.session.login(session).await;
            Redirect::to(&Route::Dashboard.path()).into_response()
        }
        Err(e) => {
            error!("Authentication failed: {}", e);
            let message = e.user_message(AUTH_FAILED_MESSAGE);
            login_form(mode, &credentials.email, Some(&message)).into_response()
        }
    }
}

/// POST /logout - Clears the session and the user's drafts, then returns home.
pub async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    state.sign_out().await;
    info!("Signed out");
    Redirect::to(&Route::Home.path())
}
