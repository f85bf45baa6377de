//! services/portal/src/web/analysis.rs
//!
//! The tabbed analysis view of one document and its reply-letter actions.
//!
//! A GET mounts the view: the analysis is fetched once and every tab is rendered
//! into the page, so switching tabs happens in the browser. Reply actions reuse
//! the analysis kept on the `AnalysisShelf` and answer with the same page.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Form,
};
use legalai_core::analysis::{
    answer_key, AnalysisLoad, AnalysisTab, AnalysisView, EmptyState, Listing, ReplyError,
    ReplyFlow, TabBody, Tone, MAX_REPLY_QUESTIONS, NO_ANSWERS_MESSAGE, REPLY_FAILED_MESSAGE,
};
use legalai_core::domain::{FinancialDetail, KeyTerm, RiskLevel};
use legalai_core::routing::Route;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::web::{render, state::AppState};

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, Default)]
pub struct AnalysisQuery {
    pub tab: Option<String>,
}

/// Why a reply action did not produce a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyNotice {
    NoAnswers,
    InFlight,
    Failed,
}

impl ReplyNotice {
    fn message(self) -> &'static str {
        match self {
            ReplyNotice::NoAnswers => NO_ANSWERS_MESSAGE,
            ReplyNotice::InFlight => "A reply is already being generated. Please wait.",
            ReplyNotice::Failed => REPLY_FAILED_MESSAGE,
        }
    }
}

impl From<&ReplyError> for ReplyNotice {
    fn from(err: &ReplyError) -> Self {
        match err {
            ReplyError::NoAnswers => ReplyNotice::NoAnswers,
            ReplyError::InFlight => ReplyNotice::InFlight,
            ReplyError::Failed { .. } | ReplyError::Discarded => ReplyNotice::Failed,
        }
    }
}

//=========================================================================================
// Tab Rendering
//=========================================================================================

// Shows one panel at a time and keeps `?tab=` in the address bar without a request.
const TAB_SCRIPT: &str = r#"<script>
document.querySelectorAll('.tabs button').forEach(button => button.addEventListener('click', () => {
  const tab = button.dataset.tab;
  document.querySelectorAll('.tabs button').forEach(b => b.classList.toggle('active', b === button));
  document.querySelectorAll('.tab-panel').forEach(p => { p.hidden = p.dataset.tab !== tab; });
  history.replaceState(null, '', '?tab=' + tab);
}));
</script>"#;

fn render_empty(state: &EmptyState) -> String {
    let class = match state.tone {
        Tone::Positive => "card positive",
        Tone::Neutral => "card muted",
    };
    let title = state
        .title
        .map(|t| format!("<h3>{}</h3>", render::escape(t)))
        .unwrap_or_default();
    format!(
        r#"<div class="{class}">{title}<p>{}</p></div>"#,
        render::escape(state.message)
    )
}

fn render_list(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", render::escape(item)))
        .collect();
    format!("<h3>{}</h3><ul>{}</ul>", render::escape(heading), items)
}

fn render_terms(terms: &[KeyTerm]) -> String {
    let rows: String = terms
        .iter()
        .map(|t| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                render::escape(&t.term),
                render::escape(&t.explanation)
            )
        })
        .collect();
    format!("<dl>{rows}</dl>")
}

fn render_calculations(details: &[FinancialDetail]) -> String {
    details
        .iter()
        .map(|d| {
            format!(
                r#"<div class="card"><h3>{}</h3><p><strong>{}</strong></p><p>{}</p></div>"#,
                render::escape(&d.label()),
                render::escape(d.amount.as_deref().unwrap_or("")),
                render::escape(d.explanation.as_deref().unwrap_or("")),
            )
        })
        .collect()
}

fn render_risks(label: &str, level: RiskLevel, factors: &[String], recommendations: &[String]) -> String {
    format!(
        r#"<p>Overall risk: <strong class="{}">{}</strong></p>{}{}"#,
        level.css_class(),
        render::escape(label),
        render_list("Risk Factors", factors),
        render_list("Recommendations", recommendations),
    )
}

fn render_fraud(indicators: &Listing<'_, String>, unusual_clauses: &[String]) -> String {
    let indicators = match indicators {
        Listing::Items(items) => render_list("Fraud Indicators", items),
        Listing::Empty(state) => render_empty(state),
    };
    format!("{}{}", indicators, render_list("Unusual Clauses", unusual_clauses))
}

fn render_reply(
    view_path: &str,
    questions: &[String],
    flow: &ReplyFlow,
    notice: Option<ReplyNotice>,
) -> String {
    let notice = notice
        .map(|n| render::error_panel(n.message(), None))
        .unwrap_or_default();
    let view_path = render::escape(view_path);

    if let Some(letter) = flow.letter() {
        return format!(
            r#"<h3>Your Reply Letter</h3>
<pre id="letter">{letter}</pre>
<button type="button" onclick="navigator.clipboard.writeText(document.getElementById('letter').innerText)">Copy to Clipboard</button>
<form method="post" action="{view_path}/reply/new"><button type="submit">Generate New</button></form>"#,
            letter = render::escape(letter),
        );
    }

    let fields: String = questions
        .iter()
        .take(MAX_REPLY_QUESTIONS)
        .enumerate()
        .map(|(index, question)| {
            format!(
                r#"<label>{}<textarea name="{}" rows="3">{}</textarea></label>"#,
                render::escape(question),
                answer_key(index),
                render::escape(flow.answer(index)),
            )
        })
        .collect();
    let (disabled, button) = if flow.is_pending() {
        (" disabled", "Generating...")
    } else {
        ("", "Generate Reply")
    };
    format!(
        r#"{notice}<p class="muted">Answer the questions below to draft a reply letter.</p>
<form method="post" action="{view_path}/reply">{fields}<button type="submit"{disabled}>{button}</button></form>"#
    )
}

fn render_body(
    view_path: &str,
    body: &TabBody<'_>,
    flow: &ReplyFlow,
    notice: Option<ReplyNotice>,
) -> String {
    match body {
        TabBody::Summary(text) => format!("<p>{}</p>", render::escape(text)),
        TabBody::KeyTerms(terms) => render_terms(terms),
        TabBody::Calculations(details) => render_calculations(details),
        TabBody::Risks {
            label,
            level,
            factors,
            recommendations,
        } => render_risks(label, *level, factors, recommendations),
        TabBody::Fraud {
            indicators,
            unusual_clauses,
        } => render_fraud(indicators, unusual_clauses),
        TabBody::Questions(questions) => render_list("Questions to Ask", questions),
        TabBody::Reply(questions) => render_reply(view_path, questions, flow, notice),
        TabBody::Empty(state) => render_empty(state),
    }
}

fn render_tabs(active: AnalysisTab) -> String {
    let buttons: String = AnalysisTab::ALL
        .into_iter()
        .map(|tab| {
            let class = if tab == active { r#" class="active""# } else { "" };
            format!(
                r#"<button type="button" data-tab="{}"{}>{}</button>"#,
                tab.id(),
                class,
                tab.label()
            )
        })
        .collect();
    format!(r#"<nav class="tabs">{buttons}</nav>"#)
}

fn render_view(view: &AnalysisView, flow: &ReplyFlow, notice: Option<ReplyNotice>) -> (String, String) {
    match &view.load {
        AnalysisLoad::Ready(data) => {
            let view_path = Route::Document(view.document_id.clone()).path();
            let document_type = data
                .analysis
                .document_type
                .as_deref()
                .map(|t| format!(r#"<p class="muted">{}</p>"#, render::escape(t)))
                .unwrap_or_default();
            let panels: String = view
                .panels()
                .iter()
                .map(|(tab, body)| {
                    let hidden = if *tab == view.active_tab { "" } else { " hidden" };
                    format!(
                        r#"<section class="card tab-panel" data-tab="{}"{}>{}</section>"#,
                        tab.id(),
                        hidden,
                        render_body(&view_path, body, flow, notice)
                    )
                })
                .collect();
            let html = format!(
                r#"<p><a href="/dashboard">Back to Dashboard</a></p>
<section class="card"><h1>{}</h1>{}</section>
{}
{}
{}"#,
                render::escape(&data.document.filename),
                document_type,
                render_tabs(view.active_tab),
                panels,
                TAB_SCRIPT,
            );
            (data.document.filename.clone(), html)
        }
        AnalysisLoad::Failed(message) => (
            "Analysis".to_string(),
            format!(
                r#"<section class="card"><div class="error">{}</div><p><a href="/dashboard">Back to Dashboard</a></p></section>"#,
                render::escape(message)
            ),
        ),
        AnalysisLoad::Loading => (
            "Analysis".to_string(),
            r#"<div class="card"><p class="muted">Loading analysis...</p></div>"#.to_string(),
        ),
    }
}

async fn render_page(state: &AppState, view: &AnalysisView, notice: Option<ReplyNotice>) -> Html<String> {
    let flow = state.replies.snapshot(&view.document_id).await;
    let (title, body) = render_view(view, &flow, notice);
    render::page(&title, true, &body)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /document/{id} - Mounts the analysis view; `?tab=` picks the first tab shown.
pub async fn analysis_page(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Html<String> {
    let mut view = state.analyses.mount(&state.api, &document_id).await;
    view.select_tab(AnalysisTab::parse(query.tab.as_deref()));
    render_page(&state, &view, None).await
}

/// POST /document/{id}/reply - Stores the answers and requests a reply letter.
pub async fn reply_submit(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    state
        .replies
        .update(&document_id, |flow| {
            for index in 0..MAX_REPLY_QUESTIONS {
                if let Some(text) = form.get(&answer_key(index)) {
                    flow.set_answer(index, text.clone());
                }
            }
        })
        .await;

    let notice = match state.replies.generate(&state.api, &document_id).await {
        Ok(_) => None,
        Err(e) => {
            warn!("Reply for {} not generated: {}", document_id, e);
            Some(ReplyNotice::from(&e))
        }
    };

    let mut view = state.analyses.reopen(&state.api, &document_id).await;
    view.select_tab(AnalysisTab::Reply);
    render_page(&state, &view, notice).await
}

/// POST /document/{id}/reply/new - Returns to the form, keeping the answers.
pub async fn reply_new(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Html<String> {
    state.replies.generate_new(&document_id).await;
    let mut view = state.analyses.reopen(&state.api, &document_id).await;
    view.select_tab(AnalysisTab::Reply);
    render_page(&state, &view, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use legalai_core::analysis::{NO_FRAUD, NO_KEY_TERMS};
    use legalai_core::domain::{Analysis, AnalysisStatus, Document, DocumentAnalysis};

    fn questions() -> Vec<String> {
        (0..7).map(|i| format!("Question {i}?")).collect()
    }

    fn ready_view(id: &str) -> AnalysisView {
        AnalysisView::ready(
            id,
            DocumentAnalysis {
                document: Document {
                    id: id.to_string(),
                    filename: "Lease.pdf".to_string(),
                    file_size: 10,
                    uploaded_at: None,
                    analysis_status: AnalysisStatus::Completed,
                },
                analysis: Analysis {
                    summary: Some("A lease.".to_string()),
                    suggested_questions: vec!["Can I sublet?".to_string()],
                    ..Default::default()
                },
            },
        )
    }

    #[test]
    fn reply_form_prefills_answers_and_caps_questions() {
        let mut flow = ReplyFlow::default();
        flow.set_answer(1, "I disagree");
        let html = render_reply("/document/d1", &questions(), &flow, None);
        assert!(html.contains(r#"name="question_1" rows="3">I disagree</textarea>"#));
        assert!(html.contains("question_4"));
        assert!(!html.contains("question_5"));
    }

    #[test]
    fn letter_replaces_form() {
        let mut flow = ReplyFlow::default();
        flow.set_answer(0, "yes");
        flow.begin().unwrap();
        flow.finish(Ok("Dear Sir...".to_string())).unwrap();
        let html = render_reply("/document/d1", &questions(), &flow, None);
        assert!(html.contains("Dear Sir..."));
        assert!(html.contains(r#"action="/document/d1/reply/new""#));
        assert!(!html.contains("<textarea"));
    }

    #[test]
    fn pending_request_disables_the_trigger() {
        let mut flow = ReplyFlow::default();
        flow.set_answer(0, "yes");
        flow.begin().unwrap();
        let html = render_reply("/document/d1", &questions(), &flow, None);
        assert!(html.contains("<button type=\"submit\" disabled>Generating...</button>"));
    }

    #[test]
    fn every_tab_is_rendered_and_only_the_active_one_shown() {
        let mut view = ready_view("d1");
        view.select_tab(AnalysisTab::Fraud);
        let (_, html) = render_view(&view, &ReplyFlow::default(), None);

        for tab in AnalysisTab::ALL {
            assert!(html.contains(&format!(r#"data-tab="{}""#, tab.id())));
        }
        assert!(html.contains(r#"<section class="card tab-panel" data-tab="fraud">"#));
        assert!(html.contains(r#"<section class="card tab-panel" data-tab="summary" hidden>"#));
        assert!(html.contains(r#"<button type="button" data-tab="fraud" class="active">"#));
    }

    #[test]
    fn form_actions_encode_the_document_id() {
        let view = ready_view("a/b?c");
        let (_, html) = render_view(&view, &ReplyFlow::default(), None);
        assert!(html.contains(r#"action="/document/a%2Fb%3Fc/reply""#));
    }

    #[test]
    fn discarded_reply_reads_as_failure() {
        assert_eq!(ReplyNotice::from(&ReplyError::Discarded), ReplyNotice::Failed);
        assert_eq!(ReplyNotice::from(&ReplyError::NoAnswers).message(), NO_ANSWERS_MESSAGE);
    }

    #[test]
    fn empty_states_render_with_their_tone() {
        let html = render_empty(&NO_FRAUD);
        assert!(html.contains("card positive"));
        assert!(html.contains("No Fraud Indicators Detected"));
        assert!(render_empty(&NO_KEY_TERMS).contains("No key terms identified in this document."));
    }

    #[test]
    fn risk_sections_are_omitted_when_empty() {
        let html = render_risks("High", RiskLevel::High, &[], &["Get a lawyer".to_string()]);
        assert!(html.contains(r#"class="risk-high""#));
        assert!(!html.contains("Risk Factors"));
        assert!(html.contains("Recommendations"));
    }
}
