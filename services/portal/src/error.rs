//! services/portal/src/error.rs
//!
//! Defines the primary error type for the portal service.

use crate::config::ConfigError;

/// The primary error type for the `portal` service.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error building the backend HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_failures_convert_with_their_source() {
        let bind = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = PortalError::from(bind);
        assert!(matches!(err, PortalError::Io(_)));
        assert_eq!(err.to_string(), "IO error: address in use");
    }
}
