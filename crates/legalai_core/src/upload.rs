//! crates/legalai_core/src/upload.rs
//!
//! Upload lifecycle: `idle -> uploading -> succeeded | failed`, plus the drop-zone
//! state used by the drag-and-drop input path.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::domain::FileUpload;
use crate::ports::PortError;

/// Extensions offered by the file picker. Advisory only; the backend decides
/// what it accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Fallback text when the backend gives no detail for a failed upload.
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file. Please try again.";

pub fn is_accepted_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Value for an HTML `accept` attribute, e.g. `.pdf,.docx,.txt`.
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading { filename: String },
    Succeeded { document_id: String },
    /// Idle with the failure panel still shown. It accepts a new submit exactly
    /// like `Idle`; dismissing the panel only hides the message.
    Failed { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("The selected file is empty")]
    EmptyFile,
    #[error("Another upload is already in progress")]
    Busy,
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: PortError,
    },
}

pub struct UploadController {
    api: Arc<ApiClient>,
    state: Mutex<UploadState>,
}

impl UploadController {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: Mutex::new(UploadState::Idle),
        }
    }

    pub async fn state(&self) -> UploadState {
        self.state.lock().await.clone()
    }

    /// Uploads `file` and returns the new document's identifier.
    ///
    /// The state lock is not held across the network call, so the controller can be
    /// observed as `Uploading` while the request is pending.
    pub async fn submit(&self, file: FileUpload) -> Result<String, UploadError> {
        if file.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        {
            let mut state = self.state.lock().await;
            if matches!(*state, UploadState::Uploading { .. }) {
                return Err(UploadError::Busy);
            }
            *state = UploadState::Uploading {
                filename: file.filename.clone(),
            };
        }

        info!("Uploading {} ({} bytes)", file.filename, file.size());
        let result = self.api.upload_document(&file).await;

        let mut state = self.state.lock().await;
        // After a reset the outcome goes to the caller only.
        let settles = matches!(*state, UploadState::Uploading { .. });
        match result {
            Ok(document_id) => {
                info!("Uploaded {} as document {}", file.filename, document_id);
                if settles {
                    *state = UploadState::Succeeded {
                        document_id: document_id.clone(),
                    };
                }
                Ok(document_id)
            }
            Err(e) => {
                error!("Failed to upload {}: {}", file.filename, e);
                let message = e.user_message(UPLOAD_FAILED_MESSAGE);
                if settles {
                    *state = UploadState::Failed {
                        message: message.clone(),
                    };
                }
                Err(UploadError::Rejected { message, source: e })
            }
        }
    }

    /// Returns to `Idle` unconditionally, e.g. when the user signs out.
    pub async fn reset(&self) {
        *self.state.lock().await = UploadState::Idle;
    }

    /// Dismisses a failure panel or a consumed success, returning to `Idle`.
    pub async fn dismiss(&self) {
        let mut state = self.state.lock().await;
        if !matches!(*state, UploadState::Uploading { .. }) {
            *state = UploadState::Idle;
        }
    }
}

//=========================================================================================
// Drag and drop
//=========================================================================================

#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<FileUpload>),
}

/// Tracks whether a drag is hovering the drop zone.
#[derive(Debug, Default)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Applies one drag event; a drop yields the file to submit, if any.
    pub fn handle(&mut self, event: DragEvent) -> Option<FileUpload> {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.active = true;
                None
            }
            DragEvent::Leave => {
                self.active = false;
                None
            }
            DragEvent::Drop(files) => {
                self.active = false;
                first_file(files)
            }
        }
    }
}

/// Only the first of several selected files is uploaded.
pub fn first_file(files: Vec<FileUpload>) -> Option<FileUpload> {
    files.into_iter().next()
}
