//! crates/legalai_core/src/analysis.rs
//!
//! Document analysis view state: the fetched payload, the active tab, the
//! per-tab content model with its empty states, and the reply-letter flow.

use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::domain::{DocumentAnalysis, FinancialDetail, KeyTerm, RiskLevel};
use crate::ports::{PortError, ReplyAnswers};

//=========================================================================================
// Tabs
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisTab {
    #[default]
    Summary,
    Terms,
    Calculations,
    Risks,
    Fraud,
    Questions,
    Reply,
}

impl AnalysisTab {
    pub const ALL: [AnalysisTab; 7] = [
        AnalysisTab::Summary,
        AnalysisTab::Terms,
        AnalysisTab::Calculations,
        AnalysisTab::Risks,
        AnalysisTab::Fraud,
        AnalysisTab::Questions,
        AnalysisTab::Reply,
    ];

    /// Unknown or missing tab identifiers select the summary.
    pub fn parse(value: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|tab| Some(tab.id()) == value)
            .unwrap_or_default()
    }

    pub fn id(self) -> &'static str {
        match self {
            AnalysisTab::Summary => "summary",
            AnalysisTab::Terms => "terms",
            AnalysisTab::Calculations => "calculations",
            AnalysisTab::Risks => "risks",
            AnalysisTab::Fraud => "fraud",
            AnalysisTab::Questions => "questions",
            AnalysisTab::Reply => "reply",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisTab::Summary => "Summary",
            AnalysisTab::Terms => "Key Terms",
            AnalysisTab::Calculations => "Calculations",
            AnalysisTab::Risks => "Risk Assessment",
            AnalysisTab::Fraud => "Fraud Detection",
            AnalysisTab::Questions => "Questions",
            AnalysisTab::Reply => "Generate Reply",
        }
    }
}

//=========================================================================================
// Tab content
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    /// Absence is good news, e.g. no fraud indicators.
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub title: Option<&'static str>,
    pub message: &'static str,
    pub tone: Tone,
}

impl EmptyState {
    const fn neutral(message: &'static str) -> Self {
        Self {
            title: None,
            message,
            tone: Tone::Neutral,
        }
    }
}

pub const NO_SUMMARY: EmptyState = EmptyState::neutral("No summary available for this document.");
pub const NO_KEY_TERMS: EmptyState = EmptyState::neutral("No key terms identified in this document.");
pub const NO_CALCULATIONS: EmptyState =
    EmptyState::neutral("No financial calculations found in this document.");
pub const NO_QUESTIONS: EmptyState =
    EmptyState::neutral("No suggested questions available for this document.");
pub const NO_REPLY_QUESTIONS: EmptyState =
    EmptyState::neutral("No questions available to build a reply from.");
pub const NO_FRAUD: EmptyState = EmptyState {
    title: Some("No Fraud Indicators Detected"),
    message: "This document appears to be legitimate with no obvious red flags.",
    tone: Tone::Positive,
};

/// A list that is either populated or replaced by its empty state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Listing<'a, T> {
    Items(&'a [T]),
    Empty(EmptyState),
}

fn listing<T>(items: &[T], empty: EmptyState) -> Listing<'_, T> {
    if items.is_empty() {
        Listing::Empty(empty)
    } else {
        Listing::Items(items)
    }
}

/// The slice of an analysis shown by one tab.
#[derive(Debug, Clone, PartialEq)]
pub enum TabBody<'a> {
    Summary(&'a str),
    KeyTerms(&'a [KeyTerm]),
    Calculations(&'a [FinancialDetail]),
    Risks {
        label: &'a str,
        level: RiskLevel,
        factors: &'a [String],
        recommendations: &'a [String],
    },
    Fraud {
        indicators: Listing<'a, String>,
        unusual_clauses: &'a [String],
    },
    Questions(&'a [String]),
    /// The first questions offered as reply inputs.
    Reply(&'a [String]),
    Empty(EmptyState),
}

pub const MAX_REPLY_QUESTIONS: usize = 5;

fn or_empty<'a, T>(
    items: &'a [T],
    empty: EmptyState,
    build: fn(&'a [T]) -> TabBody<'a>,
) -> TabBody<'a> {
    match listing(items, empty) {
        Listing::Items(items) => build(items),
        Listing::Empty(empty) => TabBody::Empty(empty),
    }
}

/// Builds the content model for `tab`.
pub fn tab_body(data: &DocumentAnalysis, tab: AnalysisTab) -> TabBody<'_> {
    let analysis = &data.analysis;
    match tab {
        AnalysisTab::Summary => match analysis.summary.as_deref() {
            Some(text) if !text.trim().is_empty() => TabBody::Summary(text),
            _ => TabBody::Empty(NO_SUMMARY),
        },
        AnalysisTab::Terms => or_empty(&analysis.key_terms, NO_KEY_TERMS, TabBody::KeyTerms),
        AnalysisTab::Calculations => match &analysis.calculations {
            Some(calc) if calc.has_calculations => {
                or_empty(&calc.financial_details, NO_CALCULATIONS, TabBody::Calculations)
            }
            _ => TabBody::Empty(NO_CALCULATIONS),
        },
        AnalysisTab::Risks => {
            let (factors, recommendations) = analysis
                .risk_assessment
                .as_ref()
                .map(|r| (r.risk_factors.as_slice(), r.recommendations.as_slice()))
                .unwrap_or_default();
            TabBody::Risks {
                label: analysis.overall_risk_label(),
                level: analysis.risk_level(),
                factors,
                recommendations,
            }
        }
        AnalysisTab::Fraud => TabBody::Fraud {
            indicators: listing(&analysis.fraud_indicators, NO_FRAUD),
            unusual_clauses: &analysis.unusual_clauses,
        },
        AnalysisTab::Questions => {
            or_empty(&analysis.suggested_questions, NO_QUESTIONS, TabBody::Questions)
        }
        AnalysisTab::Reply => {
            let questions = &analysis.suggested_questions;
            let shown = &questions[..questions.len().min(MAX_REPLY_QUESTIONS)];
            or_empty(shown, NO_REPLY_QUESTIONS, TabBody::Reply)
        }
    }
}

//=========================================================================================
// Analysis view
//=========================================================================================

pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to load document analysis";

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisLoad {
    Loading,
    Ready(DocumentAnalysis),
    /// Terminal; the view only offers a way back to the dashboard.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub document_id: String,
    pub load: AnalysisLoad,
    pub active_tab: AnalysisTab,
}

impl AnalysisView {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            load: AnalysisLoad::Loading,
            active_tab: AnalysisTab::default(),
        }
    }

    /// Fetches the analysis once. Failures are not retried.
    pub async fn fetch(&mut self, api: &ApiClient) {
        self.load = match api.get_analysis(&self.document_id).await {
            Ok(data) => AnalysisLoad::Ready(data),
            Err(e) => {
                error!("Error fetching analysis for {}: {}", self.document_id, e);
                AnalysisLoad::Failed(ANALYSIS_FAILED_MESSAGE.to_string())
            }
        };
    }

    /// A view over an analysis fetched earlier.
    pub fn ready(document_id: impl Into<String>, data: DocumentAnalysis) -> Self {
        Self {
            document_id: document_id.into(),
            load: AnalysisLoad::Ready(data),
            active_tab: AnalysisTab::default(),
        }
    }

    /// Tab switching is local; it never triggers a fetch.
    pub fn select_tab(&mut self, tab: AnalysisTab) {
        self.active_tab = tab;
    }

    pub fn body(&self) -> Option<TabBody<'_>> {
        match &self.load {
            AnalysisLoad::Ready(data) => Some(tab_body(data, self.active_tab)),
            _ => None,
        }
    }

    /// The bodies of every tab in display order, all built from the one fetched
    /// payload. Empty until the analysis is ready.
    pub fn panels(&self) -> Vec<(AnalysisTab, TabBody<'_>)> {
        match &self.load {
            AnalysisLoad::Ready(data) => AnalysisTab::ALL
                .into_iter()
                .map(|tab| (tab, tab_body(data, tab)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Analyses fetched by open document views, keyed by document id. Mounting a
/// view fetches and replaces its entry; actions inside the view reuse it.
#[derive(Default)]
pub struct AnalysisShelf {
    views: Mutex<HashMap<String, DocumentAnalysis>>,
}

impl AnalysisShelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the view of `document_id`: one fetch, kept for later actions.
    pub async fn mount(&self, api: &ApiClient, document_id: &str) -> AnalysisView {
        let mut view = AnalysisView::new(document_id);
        view.fetch(api).await;
        let mut views = self.views.lock().await;
        match &view.load {
            AnalysisLoad::Ready(data) => {
                views.insert(document_id.to_string(), data.clone());
            }
            _ => {
                views.remove(document_id);
            }
        }
        view
    }

    /// The view as last mounted. Fetches only when it was never mounted.
    pub async fn reopen(&self, api: &ApiClient, document_id: &str) -> AnalysisView {
        let cached = self.views.lock().await.get(document_id).cloned();
        match cached {
            Some(data) => AnalysisView::ready(document_id, data),
            None => self.mount(api, document_id).await,
        }
    }

    pub async fn clear(&self) {
        self.views.lock().await.clear();
    }
}

//=========================================================================================
// Reply flow
//=========================================================================================

pub const NO_ANSWERS_MESSAGE: &str = "Please answer at least one question to generate a reply";
pub const REPLY_FAILED_MESSAGE: &str = "Failed to generate reply. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("Please answer at least one question to generate a reply")]
    NoAnswers,
    #[error("A reply is already being generated")]
    InFlight,
    /// The drafts were cleared, e.g. by a logout, while the request was pending.
    #[error("The reply draft was discarded")]
    Discarded,
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: PortError,
    },
}

pub fn answer_key(index: usize) -> String {
    format!("question_{index}")
}

/// The reply draft of one document view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyFlow {
    answers: BTreeMap<usize, String>,
    pending: bool,
    letter: Option<String>,
}

impl ReplyFlow {
    /// Records the answer for question `index`; indexes past the reply limit are ignored.
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) {
        if index < MAX_REPLY_QUESTIONS {
            self.answers.insert(index, text.into());
        }
    }

    pub fn answer(&self, index: usize) -> &str {
        self.answers.get(&index).map(String::as_str).unwrap_or("")
    }

    /// Blank answers do not count as entered.
    pub fn answered(&self) -> usize {
        self.answers.values().filter(|a| !a.trim().is_empty()).count()
    }

    pub fn payload(&self) -> ReplyAnswers {
        self.answers
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| (answer_key(*index), text.clone()))
            .collect()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn letter(&self) -> Option<&str> {
        self.letter.as_deref()
    }

    /// Marks a request in flight and returns its payload.
    pub fn begin(&mut self) -> Result<ReplyAnswers, ReplyError> {
        if self.pending {
            return Err(ReplyError::InFlight);
        }
        if self.answered() == 0 {
            return Err(ReplyError::NoAnswers);
        }
        self.pending = true;
        Ok(self.payload())
    }

    /// Settles the in-flight request. The form is kept intact on failure.
    pub fn finish(&mut self, result: Result<String, PortError>) -> Result<(), ReplyError> {
        self.pending = false;
        match result {
            Ok(letter) => {
                self.letter = Some(letter);
                Ok(())
            }
            Err(source) => Err(ReplyError::Failed {
                message: REPLY_FAILED_MESSAGE.to_string(),
                source,
            }),
        }
    }

    /// Hides the letter and returns to the form; answers stay for re-editing.
    pub fn generate_new(&mut self) {
        self.letter = None;
    }
}

/// Reply flows of all open document views, keyed by document id.
#[derive(Default)]
pub struct ReplyDesk {
    flows: Mutex<HashMap<String, ReplyFlow>>,
}

impl ReplyDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self, document_id: &str) -> ReplyFlow {
        self.flows
            .lock()
            .await
            .get(document_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn update<F>(&self, document_id: &str, edit: F)
    where
        F: FnOnce(&mut ReplyFlow),
    {
        let mut flows = self.flows.lock().await;
        edit(flows.entry(document_id.to_string()).or_default());
    }

    /// Requests a letter for the current answers. Only one request per document
    /// may be in flight; the lock is released while it is pending.
    pub async fn generate(&self, api: &ApiClient, document_id: &str) -> Result<String, ReplyError> {
        let answers = {
            let mut flows = self.flows.lock().await;
            flows.entry(document_id.to_string()).or_default().begin()?
        };

        info!("Generating reply for {} from {} answers", document_id, answers.len());
        let result = api.generate_reply(document_id, &answers).await;
        if let Err(e) = &result {
            error!("Error generating reply for {}: {}", document_id, e);
        }

        let mut flows = self.flows.lock().await;
        let Some(flow) = flows.get_mut(document_id) else {
            return Err(ReplyError::Discarded);
        };
        flow.finish(result)?;
        Ok(flow.letter().unwrap_or_default().to_string())
    }

    pub async fn generate_new(&self, document_id: &str) {
        self.update(document_id, ReplyFlow::generate_new).await;
    }

    /// Drops every draft and letter.
    pub async fn clear(&self) {
        self.flows.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Analysis, AnalysisStatus, Calculations, RiskAssessment};
    use crate::fakes::{document, Call, FakeBackend};
    use crate::session::{MemorySessionStorage, SessionStore};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn wrap(analysis: Analysis) -> DocumentAnalysis {
        DocumentAnalysis {
            document: document("d1", "Lease.pdf", AnalysisStatus::Completed),
            analysis,
        }
    }

    async fn api(backend: Arc<FakeBackend>) -> ApiClient {
        let store = Arc::new(SessionStore::new(Arc::new(MemorySessionStorage::new())));
        store.initialize().await;
        ApiClient::new(backend, store)
    }

    fn questions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Question {i}?")).collect()
    }

    #[test]
    fn tab_ids_parse_and_unknown_falls_back_to_summary() {
        for tab in AnalysisTab::ALL {
            assert_eq!(AnalysisTab::parse(Some(tab.id())), tab);
        }
        assert_eq!(AnalysisTab::parse(Some("bogus")), AnalysisTab::Summary);
        assert_eq!(AnalysisTab::parse(None), AnalysisTab::Summary);
    }

    #[test]
    fn empty_key_terms_render_empty_state() {
        let data = wrap(Analysis::default());
        assert_eq!(tab_body(&data, AnalysisTab::Terms), TabBody::Empty(NO_KEY_TERMS));
        assert_eq!(
            NO_KEY_TERMS.message,
            "No key terms identified in this document."
        );
    }

    #[test]
    fn every_tab_has_a_defined_body_for_an_empty_payload() {
        let data = wrap(Analysis::default());
        assert_eq!(tab_body(&data, AnalysisTab::Summary), TabBody::Empty(NO_SUMMARY));
        assert_eq!(
            tab_body(&data, AnalysisTab::Calculations),
            TabBody::Empty(NO_CALCULATIONS)
        );
        assert_eq!(
            tab_body(&data, AnalysisTab::Risks),
            TabBody::Risks {
                label: "Unknown",
                level: RiskLevel::Medium,
                factors: &[],
                recommendations: &[],
            }
        );
        assert_eq!(
            tab_body(&data, AnalysisTab::Fraud),
            TabBody::Fraud {
                indicators: Listing::Empty(NO_FRAUD),
                unusual_clauses: &[],
            }
        );
        assert_eq!(tab_body(&data, AnalysisTab::Questions), TabBody::Empty(NO_QUESTIONS));
        assert_eq!(tab_body(&data, AnalysisTab::Reply), TabBody::Empty(NO_REPLY_QUESTIONS));
        assert_eq!(NO_FRAUD.tone, Tone::Positive);
    }

    #[test]
    fn calculations_hidden_unless_flagged() {
        let detail = FinancialDetail {
            kind: Some("payment".to_string()),
            amount: Some("$1,200".to_string()),
            explanation: None,
        };
        let mut analysis = Analysis {
            calculations: Some(Calculations {
                has_calculations: false,
                financial_details: vec![detail.clone()],
            }),
            ..Default::default()
        };
        assert_eq!(
            tab_body(&wrap(analysis.clone()), AnalysisTab::Calculations),
            TabBody::Empty(NO_CALCULATIONS)
        );

        analysis.calculations.as_mut().unwrap().has_calculations = true;
        let data = wrap(analysis);
        assert_eq!(
            tab_body(&data, AnalysisTab::Calculations),
            TabBody::Calculations(&[detail])
        );
    }

    #[test]
    fn risks_tab_uses_backend_level() {
        let data = wrap(Analysis {
            risk_assessment: Some(RiskAssessment {
                overall_risk: Some("High".to_string()),
                risk_factors: vec!["Auto-renewal".to_string()],
                recommendations: vec![],
            }),
            ..Default::default()
        });
        match tab_body(&data, AnalysisTab::Risks) {
            TabBody::Risks { label, level, factors, .. } => {
                assert_eq!(label, "High");
                assert_eq!(level, RiskLevel::High);
                assert_eq!(factors.len(), 1);
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn reply_tab_offers_at_most_five_questions() {
        let data = wrap(Analysis {
            suggested_questions: questions(7),
            ..Default::default()
        });
        match tab_body(&data, AnalysisTab::Reply) {
            TabBody::Reply(shown) => assert_eq!(shown.len(), MAX_REPLY_QUESTIONS),
            other => panic!("unexpected body {other:?}"),
        }
        match tab_body(&data, AnalysisTab::Questions) {
            TabBody::Questions(all) => assert_eq!(all.len(), 7),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_failure_is_terminal() {
        let backend = Arc::new(FakeBackend::default());
        let api = api(backend.clone()).await;
        let mut view = AnalysisView::new("missing");

        view.fetch(&api).await;

        assert_eq!(view.load, AnalysisLoad::Failed(ANALYSIS_FAILED_MESSAGE.to_string()));
        assert!(view.body().is_none());
        assert_eq!(backend.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn switching_tabs_does_not_refetch() {
        let backend = Arc::new(FakeBackend {
            analysis: Some(Analysis::default()),
            ..Default::default()
        });
        let api = api(backend.clone()).await;
        let mut view = AnalysisView::new("d1");
        view.fetch(&api).await;

        for tab in AnalysisTab::ALL {
            view.select_tab(tab);
            assert!(view.body().is_some());
        }
        assert_eq!(backend.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn shelf_fetches_on_mount_only() {
        let backend = Arc::new(FakeBackend {
            analysis: Some(Analysis {
                summary: Some("A lease.".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let api = api(backend.clone()).await;
        let shelf = AnalysisShelf::new();

        let view = shelf.mount(&api, "d1").await;
        assert_eq!(view.panels().len(), AnalysisTab::ALL.len());
        for _ in 0..3 {
            let view = shelf.reopen(&api, "d1").await;
            assert_eq!(view.body(), Some(TabBody::Summary("A lease.")));
        }
        assert_eq!(backend.calls().await.len(), 1);

        shelf.mount(&api, "d1").await;
        assert_eq!(backend.calls().await.len(), 2);

        shelf.clear().await;
        shelf.reopen(&api, "d1").await;
        assert_eq!(backend.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_mount_is_not_kept() {
        let backend = Arc::new(FakeBackend::default());
        let api = api(backend.clone()).await;
        let shelf = AnalysisShelf::new();

        let view = shelf.mount(&api, "d1").await;
        assert!(view.panels().is_empty());
        shelf.reopen(&api, "d1").await;
        assert_eq!(backend.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn clearing_the_desk_drops_drafts_and_letters() {
        let api = api(Arc::new(FakeBackend::default())).await;
        let desk = ReplyDesk::new();
        desk.update("d1", |flow| flow.set_answer(0, "private answer")).await;
        desk.generate(&api, "d1").await.unwrap();

        desk.clear().await;

        let flow = desk.snapshot("d1").await;
        assert_eq!(flow.letter(), None);
        assert_eq!(flow.answer(0), "");
    }

    #[test]
    fn reply_flow_rejects_without_answers() {
        let mut flow = ReplyFlow::default();
        assert!(matches!(flow.begin(), Err(ReplyError::NoAnswers)));

        flow.set_answer(0, "   ");
        assert!(matches!(flow.begin(), Err(ReplyError::NoAnswers)));
        assert!(!flow.is_pending());
    }

    #[test]
    fn reply_flow_ignores_questions_past_the_limit() {
        let mut flow = ReplyFlow::default();
        flow.set_answer(MAX_REPLY_QUESTIONS, "too far");
        assert_eq!(flow.answered(), 0);
    }

    #[tokio::test]
    async fn no_answers_sends_no_request() {
        let backend = Arc::new(FakeBackend::default());
        let api = api(backend.clone()).await;
        let desk = ReplyDesk::new();

        let err = desk.generate(&api, "d1").await.unwrap_err();

        assert!(matches!(err, ReplyError::NoAnswers));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn successful_reply_shows_letter_and_generate_new_keeps_answers() {
        let backend = Arc::new(FakeBackend::default());
        let api = api(backend.clone()).await;
        let desk = ReplyDesk::new();
        desk.update("d1", |flow| {
            flow.set_answer(1, "I disagree with clause 4");
        })
        .await;

        let letter = desk.generate(&api, "d1").await.unwrap();
        assert_eq!(letter, "Dear Sir...");
        assert_eq!(desk.snapshot("d1").await.letter(), Some("Dear Sir..."));

        let mut expected = ReplyAnswers::new();
        expected.insert("question_1".to_string(), "I disagree with clause 4".to_string());
        assert_eq!(
            backend.calls().await,
            vec![Call::Reply {
                token: None,
                id: "d1".to_string(),
                answers: expected
            }]
        );

        desk.generate_new("d1").await;
        let flow = desk.snapshot("d1").await;
        assert_eq!(flow.letter(), None);
        assert_eq!(flow.answer(1), "I disagree with clause 4");
    }

    #[tokio::test]
    async fn failed_reply_preserves_form() {
        let backend = Arc::new(FakeBackend {
            reply_error: true,
            ..Default::default()
        });
        let api = api(backend).await;
        let desk = ReplyDesk::new();
        desk.update("d1", |flow| flow.set_answer(0, "yes")).await;

        let err = desk.generate(&api, "d1").await.unwrap_err();

        assert_eq!(err.to_string(), REPLY_FAILED_MESSAGE);
        let flow = desk.snapshot("d1").await;
        assert!(!flow.is_pending());
        assert_eq!(flow.letter(), None);
        assert_eq!(flow.answer(0), "yes");
    }

    #[tokio::test]
    async fn only_one_reply_in_flight() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend {
            reply_gate: Some(gate.clone()),
            ..Default::default()
        });
        let api = Arc::new(api(backend).await);
        let desk = Arc::new(ReplyDesk::new());
        desk.update("d1", |flow| flow.set_answer(0, "yes")).await;

        let first = {
            let (api, desk) = (api.clone(), desk.clone());
            tokio::spawn(async move { desk.generate(&api, "d1").await })
        };
        while !desk.snapshot("d1").await.is_pending() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(desk.generate(&api, "d1").await, Err(ReplyError::InFlight)));

        gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), "Dear Sir...");
    }

    #[tokio::test]
    async fn letter_arriving_after_clear_is_discarded() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend {
            reply_gate: Some(gate.clone()),
            ..Default::default()
        });
        let api = Arc::new(api(backend).await);
        let desk = Arc::new(ReplyDesk::new());
        desk.update("d1", |flow| flow.set_answer(0, "yes")).await;

        let pending = {
            let (api, desk) = (api.clone(), desk.clone());
            tokio::spawn(async move { desk.generate(&api, "d1").await })
        };
        while !desk.snapshot("d1").await.is_pending() {
            tokio::task::yield_now().await;
        }

        desk.clear().await;
        gate.notify_one();

        assert!(matches!(pending.await.unwrap(), Err(ReplyError::Discarded)));
        assert_eq!(desk.snapshot("d1").await, ReplyFlow::default());
    }
}
