//! crates/legalai_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal.
//! These structs are independent of any HTTP client or serialization format;
//! the adapters translate wire records into these types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;

//=========================================================================================
// Authentication
//=========================================================================================

/// The client-held proof of authentication.
///
/// A session is either fully present or absent (`Option<Session>`), so the token
/// and the user identifier are always set and cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

/// Email and password submitted from the login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Which authentication endpoint the login form targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("register") => AuthMode::Register,
            _ => AuthMode::Login,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Register => "register",
        }
    }
}

//=========================================================================================
// Documents
//=========================================================================================

/// Backend-tracked processing status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStatus {
    Pending,
    Analyzing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub const ALL: [AnalysisStatus; 4] = [
        AnalysisStatus::Pending,
        AnalysisStatus::Analyzing,
        AnalysisStatus::Completed,
        AnalysisStatus::Failed,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AnalysisStatus::Pending),
            "analyzing" => Some(AnalysisStatus::Analyzing),
            "completed" => Some(AnalysisStatus::Completed),
            "failed" => Some(AnalysisStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Analyzing => "analyzing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-uploaded file plus its processing status. Owned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub file_size: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub analysis_status: AnalysisStatus,
}

/// A file chosen by the user for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

//=========================================================================================
// Analysis
//=========================================================================================

/// A legal term with its plain-English explanation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyTerm {
    pub term: String,
    pub explanation: String,
}

/// One extracted financial figure (interest rate, payment, fee...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialDetail {
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub explanation: Option<String>,
}

impl FinancialDetail {
    /// Human label for `kind`, e.g. `interest_rate` -> `Interest rate`.
    pub fn label(&self) -> String {
        let raw = self.kind.as_deref().unwrap_or("detail").replace('_', " ");
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculations {
    pub has_calculations: bool,
    pub financial_details: Vec<FinancialDetail>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskAssessment {
    pub overall_risk: Option<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Styling class for the overall risk of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Unknown or absent values are styled as medium risk.
    pub fn classify(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("low") => RiskLevel::Low,
            Some("high") => RiskLevel::High,
            _ => RiskLevel::Medium,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Medium => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}

impl RiskAssessment {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::classify(self.overall_risk.as_deref())
    }
}

/// The AI-derived result attached to a completed document.
///
/// Every field may be missing from the backend payload; views render a
/// defined fallback for each absent or empty part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub document_type: Option<String>,
    pub summary: Option<String>,
    pub key_terms: Vec<KeyTerm>,
    pub calculations: Option<Calculations>,
    pub risk_assessment: Option<RiskAssessment>,
    pub fraud_indicators: Vec<String>,
    pub unusual_clauses: Vec<String>,
    pub suggested_questions: Vec<String>,
}

impl Analysis {
    /// The overall risk label, `"Unknown"` when the backend gave none.
    pub fn overall_risk_label(&self) -> &str {
        self.risk_assessment
            .as_ref()
            .and_then(|r| r.overall_risk.as_deref())
            .filter(|r| !r.trim().is_empty())
            .unwrap_or("Unknown")
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_assessment
            .as_ref()
            .map(RiskAssessment::level)
            .unwrap_or(RiskLevel::Medium)
    }
}

/// The payload of `GET /documents/{id}/analysis`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAnalysis {
    pub document: Document,
    pub analysis: Analysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_backend_strings() {
        for status in AnalysisStatus::ALL {
            assert_eq!(AnalysisStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AnalysisStatus::parse("queued"), None);
    }

    #[test]
    fn risk_level_is_case_insensitive_and_defaults_to_medium() {
        assert_eq!(RiskLevel::classify(Some("HIGH")), RiskLevel::High);
        assert_eq!(RiskLevel::classify(Some("low")), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(Some("severe")), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(None), RiskLevel::Medium);
    }

    #[test]
    fn missing_overall_risk_reads_unknown() {
        let analysis = Analysis::default();
        assert_eq!(analysis.overall_risk_label(), "Unknown");
        assert_eq!(analysis.risk_level(), RiskLevel::Medium);
    }

    #[test]
    fn financial_detail_label_is_humanized() {
        let detail = FinancialDetail {
            kind: Some("interest_rate".to_string()),
            ..Default::default()
        };
        assert_eq!(detail.label(), "Interest rate");
    }
}
