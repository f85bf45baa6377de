//! In-process backend double shared by the core unit tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use crate::domain::{
    Analysis, AnalysisStatus, AuthMode, Credentials, Document, DocumentAnalysis, FileUpload, Session,
};
use crate::ports::{LegalDocumentService, PortError, PortResult, ReplyAnswers};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Auth { mode: AuthMode, email: String },
    List { token: Option<String> },
    Upload { token: Option<String>, filename: String },
    Analysis { token: Option<String>, id: String },
    Reply { token: Option<String>, id: String, answers: ReplyAnswers },
}

#[derive(Default)]
pub struct FakeBackend {
    pub(crate) calls: Mutex<Vec<Call>>,
    pub documents: Vec<Document>,
    pub analysis: Option<Analysis>,
    pub upload_error: Option<String>,
    pub reply_error: bool,
    /// When set, uploads wait for a notification before answering.
    pub upload_gate: Option<Arc<Notify>>,
    pub reply_gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }
}

fn token(auth: Option<&Session>) -> Option<String> {
    auth.map(|s| s.token.clone())
}

pub fn document(id: &str, filename: &str, status: AnalysisStatus) -> Document {
    Document {
        id: id.to_string(),
        filename: filename.to_string(),
        file_size: 1024,
        uploaded_at: None,
        analysis_status: status,
    }
}

#[async_trait]
impl LegalDocumentService for FakeBackend {
    async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> PortResult<Session> {
        self.record(Call::Auth {
            mode,
            email: credentials.email.clone(),
        })
        .await;
        Ok(Session::new(format!("token-for-{}", credentials.email), "user-1"))
    }

    async fn list_documents(&self, auth: Option<&Session>) -> PortResult<Vec<Document>> {
        self.record(Call::List { token: token(auth) }).await;
        Ok(self.documents.clone())
    }

    async fn upload_document(&self, auth: Option<&Session>, file: &FileUpload) -> PortResult<String> {
        self.record(Call::Upload {
            token: token(auth),
            filename: file.filename.clone(),
        })
        .await;
        if let Some(gate) = &self.upload_gate {
            gate.notified().await;
        }
        match &self.upload_error {
            Some(detail) => Err(PortError::Http {
                status: 400,
                detail: Some(detail.clone()),
            }),
            None => Ok("doc-new".to_string()),
        }
    }

    async fn get_analysis(&self, auth: Option<&Session>, document_id: &str) -> PortResult<DocumentAnalysis> {
        self.record(Call::Analysis {
            token: token(auth),
            id: document_id.to_string(),
        })
        .await;
        match &self.analysis {
            Some(analysis) => Ok(DocumentAnalysis {
                document: document(document_id, "Lease.pdf", AnalysisStatus::Completed),
                analysis: analysis.clone(),
            }),
            None => Err(PortError::Http {
                status: 404,
                detail: Some("Analysis not found".to_string()),
            }),
        }
    }

    async fn generate_reply(
        &self,
        auth: Option<&Session>,
        document_id: &str,
        answers: &ReplyAnswers,
    ) -> PortResult<String> {
        self.record(Call::Reply {
            token: token(auth),
            id: document_id.to_string(),
            answers: answers.clone(),
        })
        .await;
        if let Some(gate) = &self.reply_gate {
            gate.notified().await;
        }
        if self.reply_error {
            return Err(PortError::Http {
                status: 500,
                detail: None,
            });
        }
        Ok("Dear Sir...".to_string())
    }
}
