//! crates/legalai_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP client and storage used by the host.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{AuthMode, Credentials, Document, DocumentAnalysis, FileUpload, Session};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, disk).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}{}", detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Http { status: u16, detail: Option<String> },
    #[error("Could not reach the backend: {0}")]
    Transport(String),
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The message to show a user: the backend's own `detail` when it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortError::Http {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Answers for the reply letter, keyed `question_{index}`.
pub type ReplyAnswers = BTreeMap<String, String>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for the single process-wide session.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Reads the persisted session, `None` when nothing is stored.
    async fn load(&self) -> PortResult<Option<Session>>;

    async fn save(&self, session: &Session) -> PortResult<()>;

    async fn clear(&self) -> PortResult<()>;
}

/// The backend REST surface consumed by the portal.
///
/// Every resource call receives the session explicitly; implementations attach
/// its token as a bearer credential when present and send an unauthenticated
/// request otherwise.
#[async_trait]
pub trait LegalDocumentService: Send + Sync {
    // --- Auth ---
    async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> PortResult<Session>;

    // --- Documents ---
    async fn list_documents(&self, auth: Option<&Session>) -> PortResult<Vec<Document>>;

    /// Uploads one file and returns the new document's identifier.
    async fn upload_document(&self, auth: Option<&Session>, file: &FileUpload) -> PortResult<String>;

    async fn get_analysis(
        &self,
        auth: Option<&Session>,
        document_id: &str,
    ) -> PortResult<DocumentAnalysis>;

    /// Requests a generated reply letter and returns its text.
    async fn generate_reply(
        &self,
        auth: Option<&Session>,
        document_id: &str,
        answers: &ReplyAnswers,
    ) -> PortResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_detail() {
        let err = PortError::Http {
            status: 401,
            detail: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("An error occurred"), "Invalid credentials");
        assert_eq!(err.to_string(), "Backend returned status 401: Invalid credentials");
    }

    #[test]
    fn user_message_falls_back_without_detail() {
        let err = PortError::Transport("connection refused".to_string());
        assert_eq!(err.user_message("An error occurred"), "An error occurred");

        let blank = PortError::Http {
            status: 500,
            detail: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Upload failed"), "Upload failed");
    }
}
