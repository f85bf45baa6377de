//! services/portal/src/web/upload.rs
//!
//! The upload view: a file picker with a drag-and-drop zone, posting a multipart
//! form that is handed to the shared `UploadController`.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use legalai_core::domain::FileUpload;
use legalai_core::routing::Route;
use legalai_core::upload::{
    accept_attribute, first_file, DragEvent, DropZone, UploadError, UploadState,
    ACCEPTED_EXTENSIONS,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::web::{render, state::AppState};

const DISMISS_ACTION: &str = "/upload/dismiss";

// Toggles the drop-zone highlight and submits dropped files through the same form.
const DROP_ZONE_SCRIPT: &str = r#"<script>
const zone = document.getElementById('drop-zone');
const input = document.getElementById('file');
const form = document.getElementById('upload-form');
['dragenter', 'dragover'].forEach(t => zone.addEventListener(t, e => { e.preventDefault(); zone.classList.add('dragover'); }));
zone.addEventListener('dragleave', () => zone.classList.remove('dragover'));
zone.addEventListener('drop', e => {
  e.preventDefault();
  zone.classList.remove('dragover');
  if (e.dataTransfer.files.length > 0) {
    input.files = e.dataTransfer.files;
    document.getElementById('source').value = 'drop';
    form.submit();
  }
});
</script>"#;

fn upload_page(state: &UploadState, error: Option<&str>) -> Html<String> {
    let panel = match (error, state) {
        (Some(message), _) => render::error_panel(message, None),
        (None, UploadState::Failed { message }) => render::error_panel(message, Some(DISMISS_ACTION)),
        (None, UploadState::Uploading { filename }) => format!(
            r#"<div class="notice">Uploading {}...</div>"#,
            render::escape(filename)
        ),
        _ => String::new(),
    };
    let disabled = if matches!(state, UploadState::Uploading { .. }) {
        " disabled"
    } else {
        ""
    };
    let body = format!(
        r#"<section class="card">
<h1>Upload Document</h1>
{panel}
<form id="upload-form" method="post" action="/upload" enctype="multipart/form-data">
<input type="hidden" id="source" name="source" value="picker">
<div id="drop-zone" class="upload-area">
<p>Drag and drop your document here, or choose a file</p>
<input type="file" id="file" name="file" accept="{accept}" required>
<p class="muted">Supported formats: {formats}</p>
</div>
<button type="submit"{disabled}>Upload and Analyze</button>
</form>
</section>
{DROP_ZONE_SCRIPT}"#,
        accept = accept_attribute(),
        formats = ACCEPTED_EXTENSIONS
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join(", "),
    );
    render::page("Upload", true, &body)
}

/// GET /upload - Shows the form and any pending failure panel.
pub async fn upload_form(State(state): State<Arc<AppState>>) -> Html<String> {
    upload_page(&state.uploads.state().await, None)
}

/// POST /upload - Uploads the first file of the form and opens its analysis view.
pub async fn upload_submit(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, (StatusCode, String)> {
    let mut files = Vec::new();
    let mut dropped = false;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart data: {}", e);
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        if field.name() == Some("source") {
            dropped = field.text().await.map(|v| v == "drop").unwrap_or(false);
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            error!("Failed to read file bytes: {}", e);
            (StatusCode::BAD_REQUEST, "Failed to read file bytes".to_string())
        })?;
        files.push(FileUpload::new(filename, content_type, data));
    }

    let file = if dropped {
        DropZone::default().handle(DragEvent::Drop(files))
    } else {
        first_file(files)
    };
    let Some(file) = file else {
        return Ok(upload_page(&state.uploads.state().await, Some("Please choose a file to upload."))
            .into_response());
    };
    debug!("Received {} from the {}", file.filename, if dropped { "drop zone" } else { "file picker" });

    match state.uploads.submit(file).await {
        Ok(document_id) => {
            state.uploads.dismiss().await;
            Ok(Redirect::to(&Route::Document(document_id).path()).into_response())
        }
        Err(UploadError::Rejected { .. }) => {
            Ok(upload_page(&state.uploads.state().await, None).into_response())
        }
        Err(e) => {
            let message = e.to_string();
            Ok(upload_page(&state.uploads.state().await, Some(&message)).into_response())
        }
    }
}

/// POST /upload/dismiss - Closes the failure panel.
pub async fn upload_dismiss(State(state): State<Arc<AppState>>) -> Redirect {
    state.uploads.dismiss().await;
    Redirect::to(&Route::Upload.path())
}
