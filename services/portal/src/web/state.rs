//! services/portal/src/web/state.rs
//!
//! Defines the portal's shared state, created once at startup and passed to all handlers.

use crate::config::Config;
use legalai_core::analysis::{AnalysisShelf, ReplyDesk};
use legalai_core::ports::{LegalDocumentService, SessionStorage};
use legalai_core::session::SessionStore;
use legalai_core::upload::UploadController;
use legalai_core::ApiClient;
use std::sync::Arc;

/// The shared application state.
///
/// The portal serves a single user, so the session, the upload controller, the
/// fetched analyses and the reply drafts are process-wide.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
    pub uploads: Arc<UploadController>,
    pub analyses: Arc<AnalysisShelf>,
    pub replies: Arc<ReplyDesk>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        backend: Arc<dyn LegalDocumentService>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let api = Arc::new(ApiClient::new(backend, session.clone()));
        Self {
            config,
            uploads: Arc::new(UploadController::new(api.clone())),
            analyses: Arc::new(AnalysisShelf::new()),
            replies: Arc::new(ReplyDesk::new()),
            session,
            api,
        }
    }

    /// Ends the session and drops everything the signed-in user left behind.
    pub async fn sign_out(&self) {
        self.session.logout().await;
        self.replies.clear().await;
        self.analyses.clear().await;
        self.uploads.reset().await;
    }
}
