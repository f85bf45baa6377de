//! crates/legalai_core/src/documents.rs
//!
//! Document list view state: one fetch per mount, then in-memory search and
//! status filtering over the fetched sequence.

use tracing::error;

use crate::api::ApiClient;
use crate::domain::{AnalysisStatus, Document};
use crate::routing::Route;

/// Status filter of the dashboard's select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AnalysisStatus),
}

impl StatusFilter {
    /// Parses the select value; anything unrecognized means `All`.
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(AnalysisStatus::parse)
            .map(StatusFilter::Only)
            .unwrap_or(StatusFilter::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn admits(self, status: AnalysisStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl DocumentQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        contains_ignore_case(&doc.filename, &self.search) && self.status.admits(doc.analysis_status)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns matching documents, keeping the server's order.
pub fn filter_documents<'a>(documents: &'a [Document], query: &DocumentQuery) -> Vec<&'a Document> {
    documents.iter().filter(|doc| query.matches(doc)).collect()
}

/// Where clicking a document row leads. Only completed analyses open.
pub fn open_document(doc: &Document) -> Option<Route> {
    (doc.analysis_status == AnalysisStatus::Completed).then(|| Route::Document(doc.id.clone()))
}

/// The fetched document list of one dashboard view.
#[derive(Debug, Clone, Default)]
pub struct DocumentList {
    documents: Vec<Document>,
    load_error: Option<String>,
}

impl DocumentList {
    /// Fetches the user's documents once. A failed fetch is logged and leaves the
    /// list empty with a notice.
    pub async fn load(api: &ApiClient) -> Self {
        match api.list_documents().await {
            Ok(documents) => Self::from_documents(documents),
            Err(e) => {
                error!("Error fetching documents: {}", e);
                Self {
                    documents: Vec::new(),
                    load_error: Some(e.user_message("Could not load your documents.")),
                }
            }
        }
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            load_error: None,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn visible(&self, query: &DocumentQuery) -> Vec<&Document> {
        filter_documents(&self.documents, query)
    }

    /// Empty-state heading and hint, or `None` when something is visible.
    pub fn empty_state(&self, query: &DocumentQuery) -> Option<(&'static str, &'static str)> {
        if self.documents.is_empty() {
            Some((
                "No documents uploaded yet",
                "Upload your first legal document to get started with AI analysis",
            ))
        } else if self.visible(query).is_empty() {
            Some((
                "No documents match your search",
                "Try adjusting your search or filter criteria",
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{document, FakeBackend};
    use crate::session::{MemorySessionStorage, SessionStore};
    use std::sync::Arc;

    fn sample() -> Vec<Document> {
        vec![
            document("1", "Lease.pdf", AnalysisStatus::Completed),
            document("2", "NDA.docx", AnalysisStatus::Pending),
        ]
    }

    fn names(docs: Vec<&Document>) -> Vec<&str> {
        docs.into_iter().map(|d| d.filename.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive() {
        let docs = sample();
        for term in ["lease", "LEASE", "LeAsE"] {
            let query = DocumentQuery::new(term, StatusFilter::All);
            assert_eq!(names(filter_documents(&docs, &query)), vec!["Lease.pdf"]);
        }
    }

    #[test]
    fn status_filter_with_empty_search() {
        let docs = sample();
        let query = DocumentQuery::new("", StatusFilter::parse(Some("pending")));
        assert_eq!(names(filter_documents(&docs, &query)), vec!["NDA.docx"]);
    }

    #[test]
    fn empty_query_keeps_server_order() {
        let docs = sample();
        let query = DocumentQuery::default();
        assert_eq!(names(filter_documents(&docs, &query)), vec!["Lease.pdf", "NDA.docx"]);
    }

    #[test]
    fn unknown_filter_value_means_all() {
        assert_eq!(StatusFilter::parse(Some("archived")), StatusFilter::All);
        assert_eq!(StatusFilter::parse(None), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("failed")).as_str(), "failed");
    }

    #[test]
    fn only_completed_documents_open() {
        let docs = sample();
        assert_eq!(open_document(&docs[0]), Some(Route::Document("1".to_string())));
        assert_eq!(open_document(&docs[1]), None);
        assert_eq!(open_document(&docs[0]).unwrap().path(), "/document/1");
    }

    #[test]
    fn empty_states_distinguish_no_documents_from_no_matches() {
        let empty = DocumentList::default();
        assert_eq!(
            empty.empty_state(&DocumentQuery::default()).map(|(h, _)| h),
            Some("No documents uploaded yet")
        );

        let list = DocumentList::from_documents(sample());
        assert!(list.empty_state(&DocumentQuery::default()).is_none());
        assert_eq!(
            list.empty_state(&DocumentQuery::new("contract", StatusFilter::All))
                .map(|(h, _)| h),
            Some("No documents match your search")
        );
    }

    #[tokio::test]
    async fn load_fetches_once_and_preserves_order() {
        let backend = Arc::new(FakeBackend {
            documents: sample(),
            ..Default::default()
        });
        let store = Arc::new(SessionStore::new(Arc::new(MemorySessionStorage::new())));
        store.initialize().await;
        let api = ApiClient::new(backend.clone(), store);

        let list = DocumentList::load(&api).await;

        assert_eq!(backend.calls().await.len(), 1);
        assert_eq!(list.documents(), sample().as_slice());
        assert!(list.load_error().is_none());
    }
}
