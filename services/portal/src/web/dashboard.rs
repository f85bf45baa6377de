//! services/portal/src/web/dashboard.rs
//!
//! The document list. Each GET is one mount of the view: the list is fetched once
//! and filtered in memory by the `search` and `status` query parameters.

use axum::{
    extract::{Query, State},
    response::Html,
};
use legalai_core::documents::{open_document, DocumentList, DocumentQuery, StatusFilter};
use legalai_core::domain::{AnalysisStatus, Document};
use legalai_core::format::{format_file_size, format_timestamp};
use serde::Deserialize;
use std::sync::Arc;

use crate::web::{render, state::AppState};

#[derive(Deserialize, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    pub search: String,
    pub status: Option<String>,
}

impl DashboardQuery {
    fn to_query(&self) -> DocumentQuery {
        DocumentQuery::new(self.search.clone(), StatusFilter::parse(self.status.as_deref()))
    }
}

fn status_options(selected: StatusFilter) -> String {
    let mut options = String::new();
    let choices = std::iter::once(StatusFilter::All)
        .chain(AnalysisStatus::ALL.into_iter().map(StatusFilter::Only));
    for choice in choices {
        let label = match choice {
            StatusFilter::All => "All statuses",
            StatusFilter::Only(status) => status.as_str(),
        };
        let attr = if choice == selected { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            choice.as_str(),
            attr,
            label
        ));
    }
    options
}

fn document_row(doc: &Document) -> String {
    let name = render::escape(&doc.filename);
    // Only completed analyses link anywhere.
    let name = match open_document(doc) {
        Some(route) => format!(r#"<a href="{}">{}</a>"#, render::escape(&route.path()), name),
        None => name,
    };
    format!(
        r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="status-{status}">{status}</td></tr>"#,
        name,
        format_file_size(doc.file_size),
        format_timestamp(doc.uploaded_at.as_ref()),
        status = doc.analysis_status.as_str(),
    )
}

fn render_list(list: &DocumentList, query: &DocumentQuery) -> String {
    let mut body = format!(
        r#"<section class="card">
<h1>Your Documents</h1>
<p><a href="/upload">Upload Document</a></p>
<form method="get" action="/dashboard">
<input type="search" name="search" placeholder="Search documents..." value="{}">
<select name="status">{}</select>
<button type="submit">Filter</button>
</form>
</section>"#,
        render::escape(&query.search),
        status_options(query.status),
    );

    if let Some(message) = list.load_error() {
        body.push_str(&format!(
            r#"<div class="notice">{}</div>"#,
            render::escape(message)
        ));
    }

    if let Some((heading, hint)) = list.empty_state(query) {
        body.push_str(&format!(
            r#"<section class="card"><h2>{heading}</h2><p class="muted">{hint}</p></section>"#
        ));
        return body;
    }

    body.push_str(
        r#"<section class="card"><table><thead><tr><th>Name</th><th>Size</th><th>Uploaded</th><th>Status</th></tr></thead><tbody>"#,
    );
    for doc in list.visible(query) {
        body.push_str(&document_row(doc));
    }
    body.push_str("</tbody></table></section>");
    body
}

/// GET /dashboard - Lists the user's documents.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
) -> Html<String> {
    let list = DocumentList::load(&state.api).await;
    render::page("Dashboard", true, &render_list(&list, &params.to_query()))
}
