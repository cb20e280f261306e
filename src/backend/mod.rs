//! Archival backend seam
//!
//! The import core only talks to the records-management system through
//! [`ArchiveBackend`]: stage the preservation object, stage the metadata
//! document, then apply the file set. [`HttpArchiveBackend`] is the
//! production client; [`MockBackend`] records calls for tests.

mod http;
mod mock;
mod types;

pub use http::HttpArchiveBackend;
pub use mock::{BackendCall, MockBackend};
pub use types::{
    Applied, Checksum, ErrorInfo, FileInfo, FinalizeRequest, ImportMode, PhaseResult,
    StageMetadataRequest, StageObjectRequest, Staged,
};

use async_trait::async_trait;
use thiserror::Error;

/// The three sequential backend operations of one import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    StageObject,
    StageMetadata,
    Finalize,
}

impl Phase {
    /// Step label recorded with phase failures
    pub fn step(&self) -> &'static str {
        match self {
            Phase::StageObject => "Import preservation object",
            Phase::StageMetadata => "Import Metadata",
            Phase::Finalize => "Apply import",
        }
    }

    /// Backend operation name
    pub fn operation(&self) -> &'static str {
        match self {
            Phase::StageObject => "ImportPreservationObject",
            Phase::StageMetadata => "ImportMetadataFile",
            Phase::Finalize => "ApplyImport",
        }
    }
}

/// Failures talking to the backend, as opposed to errors it reports as data
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to build backend client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid backend url '{0}'")]
    InvalidUrl(String),

    #[error("{operation} request failed")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned HTTP {status}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
        #[source]
        body: ResponseBody,
    },

    #[error("{operation} response could not be decoded")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Body of a failed backend response, kept as the source of the status error
#[derive(Debug, Error)]
#[error("response body: {0}")]
pub struct ResponseBody(pub String);

pub type Result<T> = std::result::Result<T, BackendError>;

/// Import operations offered by the archival backend.
///
/// Each call is made at most once per import request. A structured failure
/// comes back inside the [`PhaseResult`]; `Err` is reserved for faults
/// reaching or understanding the backend.
#[async_trait]
pub trait ArchiveBackend: Send + Sync {
    async fn stage_object(&self, request: StageObjectRequest) -> Result<PhaseResult<Staged>>;

    async fn stage_metadata(&self, request: StageMetadataRequest)
    -> Result<PhaseResult<Staged>>;

    async fn finalize(&self, request: FinalizeRequest) -> Result<PhaseResult<Applied>>;
}
