pub mod analysis;
pub mod api;
pub mod documents;
pub mod domain;
pub mod format;
pub mod ports;
pub mod routing;
pub mod session;
pub mod upload;

#[cfg(test)]
mod fakes;

pub use api::ApiClient;
pub use domain::{
    Analysis, AnalysisStatus, AuthMode, Calculations, Credentials, Document, DocumentAnalysis,
    FileUpload, FinancialDetail, KeyTerm, RiskAssessment, RiskLevel, Session,
};
pub use ports::{LegalDocumentService, PortError, PortResult, ReplyAnswers, SessionStorage};
pub use routing::{Access, Resolution, Route};
pub use session::{MemorySessionStorage, SessionPresence, SessionStore};
