use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use super::{
    Applied, ArchiveBackend, BackendError, ErrorInfo, FinalizeRequest, Phase, PhaseResult,
    Result, StageMetadataRequest, StageObjectRequest, Staged,
};

/// A request received by [`MockBackend`], in arrival order
#[derive(Debug, Clone)]
pub enum BackendCall {
    StageObject(StageObjectRequest),
    StageMetadata(StageMetadataRequest),
    Finalize(FinalizeRequest),
}

impl BackendCall {
    pub fn phase(&self) -> Phase {
        match self {
            BackendCall::StageObject(_) => Phase::StageObject,
            BackendCall::StageMetadata(_) => Phase::StageMetadata,
            BackendCall::Finalize(_) => Phase::Finalize,
        }
    }
}

/// In-memory backend for development and tests.
///
/// Succeeds every phase unless told otherwise, and keeps every request it
/// receives so callers can assert on ordering and payloads. An empty
/// imported id makes finalize answer without one.
#[derive(Debug, Default)]
pub struct MockBackend {
    imported_file_set_id: String,
    errors: HashMap<Phase, ErrorInfo>,
    faults: HashMap<Phase, String>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    pub fn new(imported_file_set_id: impl Into<String>) -> Self {
        Self {
            imported_file_set_id: imported_file_set_id.into(),
            ..Self::default()
        }
    }

    /// Make `phase` report a structured domain error
    pub fn with_error(mut self, phase: Phase, code: i32, message: impl Into<String>) -> Self {
        self.errors.insert(
            phase,
            ErrorInfo {
                error_id: Some(format!("mock-{}", phase.operation())),
                error_code: code,
                error_message: message.into(),
                phase: Some(phase.operation().to_string()),
            },
        );
        self
    }

    /// Make `phase` fail with a fault whose source is a connection reset
    pub fn with_fault(mut self, phase: Phase, message: impl Into<String>) -> Self {
        self.faults.insert(phase, message.into());
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().clone()
    }

    pub fn call_count(&self, phase: Phase) -> usize {
        self.lock().iter().filter(|call| call.phase() == phase).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BackendCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond<T>(&self, phase: Phase, call: BackendCall, payload: T) -> Result<PhaseResult<T>> {
        self.lock().push(call);
        tracing::info!(operation = phase.operation(), "Mock backend call");

        if let Some(message) = self.faults.get(&phase) {
            return Err(BackendError::Other {
                message: message.clone(),
                source: Box::new(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )),
            });
        }

        Ok(match self.errors.get(&phase) {
            Some(info) => PhaseResult::failed(info.clone(), payload),
            None => PhaseResult::ok(payload),
        })
    }
}

#[async_trait]
impl ArchiveBackend for MockBackend {
    async fn stage_object(&self, request: StageObjectRequest) -> Result<PhaseResult<Staged>> {
        let staged = Staged {
            file_set_id: Some(request.file_set_id.to_string()),
        };
        self.respond(Phase::StageObject, BackendCall::StageObject(request), staged)
    }

    async fn stage_metadata(
        &self,
        request: StageMetadataRequest,
    ) -> Result<PhaseResult<Staged>> {
        let staged = Staged {
            file_set_id: Some(request.file_set_id.to_string()),
        };
        self.respond(Phase::StageMetadata, BackendCall::StageMetadata(request), staged)
    }

    async fn finalize(&self, request: FinalizeRequest) -> Result<PhaseResult<Applied>> {
        let applied = Applied {
            imported_file_set_id: Some(self.imported_file_set_id.clone())
                .filter(|id| !id.is_empty()),
        };
        self.respond(Phase::Finalize, BackendCall::Finalize(request), applied)
    }
}
