use thiserror::Error;

use crate::backend::{BackendError, ErrorInfo, Phase};

#[derive(Debug, Error)]
pub enum ImportError {
    /// An inbound payload is not valid base64; raised before any backend call
    #[error("{field} is not a valid base64 string")]
    Decode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// The backend rejected a phase; displays the backend's message verbatim
    #[error("{}", .details.error_message)]
    Rejected { phase: Phase, details: ErrorInfo },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ImportError {
    /// Domain errors are expected outcomes; everything else is a fault
    pub fn is_fault(&self) -> bool {
        !matches!(self, ImportError::Rejected { .. })
    }
}
