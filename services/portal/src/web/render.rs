//! services/portal/src/web/render.rs
//!
//! HTML layout shared by every page: header navigation, footer, and the
//! neutral loading page shown before the session has been read.

use axum::response::Html;
use legalai_core::routing::Route;

/// Escapes text for inclusion in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1e293b; background: #f8fafc; }
header, footer { background: #fff; padding: 1rem 2rem; display: flex; gap: 1rem; align-items: center; }
header .brand { font-weight: 700; margin-right: auto; }
main { max-width: 64rem; margin: 2rem auto; padding: 0 1rem; }
.card { background: #fff; border-radius: .5rem; padding: 1.5rem; margin-bottom: 1rem; }
.error { background: #fef2f2; color: #b91c1c; padding: 1rem; border-radius: .5rem; }
.notice { background: #eff6ff; padding: 1rem; border-radius: .5rem; }
.positive { color: #15803d; }
.muted { color: #64748b; }
.tabs button { margin-right: 1rem; }
.tabs button.active { font-weight: 700; }
.upload-area { border: 2px dashed #94a3b8; padding: 2rem; text-align: center; }
.upload-area.dragover { border-color: #2563eb; background: #eff6ff; }
.risk-low { color: #15803d; } .risk-medium { color: #b45309; } .risk-high { color: #b91c1c; }
.status-completed { color: #15803d; } .status-failed { color: #b91c1c; }
.status-pending, .status-analyzing { color: #b45309; }
"#;

const PUBLIC_NAV: [(Route, &str); 7] = [
    (Route::Home, "Home"),
    (Route::Features, "Features"),
    (Route::UseCases, "Use Cases"),
    (Route::Pricing, "Pricing"),
    (Route::About, "About"),
    (Route::Support, "Support"),
    (Route::Contact, "Contact"),
];

fn header(signed_in: bool) -> String {
    let mut nav = String::from(r#"<header><a class="brand" href="/">LegalAI</a>"#);
    for (route, label) in PUBLIC_NAV {
        nav.push_str(&format!(r#"<a href="{}">{}</a>"#, route.path(), label));
    }
    if signed_in {
        nav.push_str(&format!(
            r#"<a href="{}">Dashboard</a><a href="{}">Upload</a><form method="post" action="/logout"><button type="submit">Logout</button></form>"#,
            Route::Dashboard.path(),
            Route::Upload.path(),
        ));
    } else {
        nav.push_str(&format!(r#"<a href="{}">Login</a>"#, Route::Login.path()));
    }
    nav.push_str("</header>");
    nav
}

fn document(title: &str, head_extra: &str, header: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | LegalAI</title>
{head_extra}<style>{STYLE}</style>
</head>
<body>
{header}
<main>
{body}
</main>
<footer><span class="muted">&copy; LegalAI. AI analysis is not legal advice.</span></footer>
</body>
</html>"#,
        title = escape(title),
    ))
}

/// Wraps `body` in the site layout.
pub fn page(title: &str, signed_in: bool, body: &str) -> Html<String> {
    document(title, "", &header(signed_in), body)
}

/// Shown while the persisted session is still being read. Reloads itself.
pub fn loading_page() -> Html<String> {
    document(
        "Loading",
        "<meta http-equiv=\"refresh\" content=\"1\">\n",
        "",
        r#"<div class="card"><p class="muted">Loading...</p></div>"#,
    )
}

/// A dismissible error panel.
pub fn error_panel(message: &str, dismiss_action: Option<&str>) -> String {
    let dismiss = dismiss_action
        .map(|action| {
            format!(
                r#"<form method="post" action="{}"><button type="submit">Dismiss</button></form>"#,
                escape(action)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div class="error" role="alert"><p>{}</p>{}</div>"#,
        escape(message),
        dismiss
    )
}
