//! crates/legalai_core/src/api.rs
//!
//! The API client facade. Each call reads the current session from the
//! [`SessionStore`] and hands it to the backend port, so the bearer credential is
//! decided per request instead of living in shared client defaults.

use std::sync::Arc;
use tracing::debug;

use crate::domain::{AuthMode, Credentials, Document, DocumentAnalysis, FileUpload, Session};
use crate::ports::{LegalDocumentService, PortResult, ReplyAnswers};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn LegalDocumentService>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn LegalDocumentService>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Exchanges credentials for a session. The caller decides whether to store it.
    pub async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> PortResult<Session> {
        debug!("Authenticating via {}", mode.as_str());
        self.backend.authenticate(mode, credentials).await
    }

    pub async fn list_documents(&self) -> PortResult<Vec<Document>> {
        let auth = self.session.current().await;
        self.backend.list_documents(auth.as_ref()).await
    }

    pub async fn upload_document(&self, file: &FileUpload) -> PortResult<String> {
        let auth = self.session.current().await;
        self.backend.upload_document(auth.as_ref(), file).await
    }

    pub async fn get_analysis(&self, document_id: &str) -> PortResult<DocumentAnalysis> {
        let auth = self.session.current().await;
        self.backend.get_analysis(auth.as_ref(), document_id).await
    }

    pub async fn generate_reply(&self, document_id: &str, answers: &ReplyAnswers) -> PortResult<String> {
        let auth = self.session.current().await;
        self.backend
            .generate_reply(auth.as_ref(), document_id, answers)
            .await
    }
}
