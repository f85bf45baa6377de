//! services/portal/src/adapters/backend.rs
//!
//! This module contains the HTTP adapter for the document analysis backend.
//! It implements the `LegalDocumentService` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use legalai_core::domain::{
    Analysis, AnalysisStatus, AuthMode, Calculations, Credentials, Document, DocumentAnalysis,
    FileUpload, FinancialDetail, KeyTerm, RiskAssessment, Session,
};
use legalai_core::ports::{LegalDocumentService, PortError, PortResult, ReplyAnswers};
use legalai_core::routing::is_document_id;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `LegalDocumentService` port.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    api_base: String,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` rooted at `api_base` (e.g. `https://host/api`).
    pub fn new(api_base: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("legalai-portal/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Builds a request, attaching the bearer credential only when a session is present.
    fn request(&self, method: reqwest::Method, path: &str, auth: Option<&Session>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match auth {
            Some(session) => builder.bearer_auth(&session.token),
            None => builder,
        }
    }
}

/// `/documents/{id}/{action}` with the id encoded as one path segment.
fn document_path(document_id: &str, action: &str) -> PortResult<String> {
    if !is_document_id(document_id) {
        return Err(PortError::Unexpected(format!(
            "Invalid document id '{}'",
            document_id
        )));
    }
    Ok(format!(
        "/documents/{}/{}",
        urlencoding::encode(document_id),
        action
    ))
}

/// Sends `builder` and decodes a JSON body, mapping non-success statuses to
/// `PortError::Http` with the backend's `detail` when it sent one.
async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> PortResult<T> {
    let response = builder
        .send()
        .await
        .map_err(|e| PortError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_detail);
        debug!("Backend answered {} ({:?})", status, detail);
        return Err(PortError::Http {
            status: status.as_u16(),
            detail,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PortError::Unexpected(format!("Malformed backend response: {}", e)))
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}
impl ErrorBody {
    fn into_detail(self) -> Option<String> {
        match self.detail? {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct AuthRecord {
    access_token: String,
    user_id: String,
}
impl AuthRecord {
    fn to_domain(self) -> Session {
        Session::new(self.access_token, self.user_id)
    }
}

#[derive(Deserialize)]
struct DocumentRecord {
    id: String,
    filename: String,
    file_size: Option<u64>,
    uploaded_at: Option<String>,
    analysis_status: Option<String>,
}
impl DocumentRecord {
    fn to_domain(self) -> Document {
        let analysis_status = match self.analysis_status.as_deref() {
            Some(raw) => AnalysisStatus::parse(raw).unwrap_or_else(|| {
                warn!("Unknown analysis status '{}' for document {}", raw, self.id);
                AnalysisStatus::Pending
            }),
            None => AnalysisStatus::Pending,
        };
        Document {
            uploaded_at: self.uploaded_at.as_deref().and_then(parse_timestamp),
            id: self.id,
            filename: self.filename,
            file_size: self.file_size.unwrap_or(0),
            analysis_status,
        }
    }
}

/// Accepts RFC 3339 and naive ISO-8601 timestamps; naive ones are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|at| at.and_utc()))
        .ok()
}

#[derive(Deserialize)]
struct UploadRecord {
    document_id: String,
}

#[derive(Deserialize)]
struct KeyTermRecord {
    term: Option<String>,
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct FinancialDetailRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    amount: Option<Value>,
    explanation: Option<String>,
}

#[derive(Deserialize)]
struct CalculationsRecord {
    has_calculations: Option<bool>,
    financial_details: Option<Vec<FinancialDetailRecord>>,
}

#[derive(Deserialize)]
struct RiskRecord {
    overall_risk: Option<String>,
    risk_factors: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AnalysisRecord {
    document_type: Option<String>,
    summary: Option<String>,
    key_terms: Option<Vec<KeyTermRecord>>,
    calculations: Option<CalculationsRecord>,
    risk_assessment: Option<RiskRecord>,
    fraud_indicators: Option<Vec<String>>,
    unusual_clauses: Option<Vec<String>>,
    suggested_questions: Option<Vec<String>>,
}
impl AnalysisRecord {
    fn to_domain(self) -> Analysis {
        Analysis {
            document_type: self.document_type,
            summary: self.summary,
            key_terms: self
                .key_terms
                .unwrap_or_default()
                .into_iter()
                .map(|t| KeyTerm {
                    term: t.term.unwrap_or_default(),
                    explanation: t.explanation.unwrap_or_default(),
                })
                .collect(),
            calculations: self.calculations.map(|c| Calculations {
                has_calculations: c.has_calculations.unwrap_or(false),
                financial_details: c
                    .financial_details
                    .unwrap_or_default()
                    .into_iter()
                    .map(|d| FinancialDetail {
                        kind: d.kind,
                        amount: d.amount.and_then(value_text),
                        explanation: d.explanation,
                    })
                    .collect(),
            }),
            risk_assessment: self.risk_assessment.map(|r| RiskAssessment {
                overall_risk: r.overall_risk,
                risk_factors: r.risk_factors.unwrap_or_default(),
                recommendations: r.recommendations.unwrap_or_default(),
            }),
            fraud_indicators: self.fraud_indicators.unwrap_or_default(),
            unusual_clauses: self.unusual_clauses.unwrap_or_default(),
            suggested_questions: self.suggested_questions.unwrap_or_default(),
        }
    }
}

/// Amounts arrive as strings or bare numbers depending on the model's output.
fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[derive(Deserialize)]
struct DocumentAnalysisRecord {
    document: DocumentRecord,
    #[serde(default)]
    analysis: Option<AnalysisRecord>,
}
impl DocumentAnalysisRecord {
    fn to_domain(self) -> DocumentAnalysis {
        DocumentAnalysis {
            document: self.document.to_domain(),
            analysis: self.analysis.unwrap_or_default().to_domain(),
        }
    }
}

#[derive(Deserialize)]
struct ReplyRecord {
    letter: String,
}

//=========================================================================================
// `LegalDocumentService` Trait Implementation
//=========================================================================================

#[async_trait]
impl LegalDocumentService for HttpBackend {
    async fn authenticate(&self, mode: AuthMode, credentials: &Credentials) -> PortResult<Session> {
        let path = match mode {
            AuthMode::Login => "/auth/login",
            AuthMode::Register => "/auth/register",
        };
        let body = CredentialsBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        let record: AuthRecord =
            send_json(self.request(reqwest::Method::POST, path, None).json(&body)).await?;
        Ok(record.to_domain())
    }

    async fn list_documents(&self, auth: Option<&Session>) -> PortResult<Vec<Document>> {
        let records: Vec<DocumentRecord> =
            send_json(self.request(reqwest::Method::GET, "/documents", auth)).await?;
        Ok(records.into_iter().map(DocumentRecord::to_domain).collect())
    }

    async fn upload_document(&self, auth: Option<&Session>, file: &FileUpload) -> PortResult<String> {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.filename.clone());
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| PortError::Unexpected(format!("Invalid content type: {}", e)))?;
        }
        let form = Form::new().part("file", part);

        let record: UploadRecord = send_json(
            self.request(reqwest::Method::POST, "/documents/upload", auth)
                .multipart(form),
        )
        .await?;
        Ok(record.document_id)
    }

    async fn get_analysis(&self, auth: Option<&Session>, document_id: &str) -> PortResult<DocumentAnalysis> {
        let path = document_path(document_id, "analysis")?;
        let record: DocumentAnalysisRecord =
            send_json(self.request(reqwest::Method::GET, &path, auth)).await?;
        Ok(record.to_domain())
    }

    async fn generate_reply(
        &self,
        auth: Option<&Session>,
        document_id: &str,
        answers: &ReplyAnswers,
    ) -> PortResult<String> {
        let path = document_path(document_id, "reply")?;
        let record: ReplyRecord =
            send_json(self.request(reqwest::Method::POST, &path, auth).json(answers)).await?;
        Ok(record.letter)
    }
}
