//! Error sinks for failed imports
//!
//! Two record kinds reach a sink: a [`PhaseFailureRecord`] when the backend
//! rejects a phase with a structured error, and a [`FaultRecord`] when an
//! import dies on anything else. Sinks never fail the caller; a sink that
//! cannot persist a record logs that and moves on.

mod file;

pub use file::FileSink;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use tracing::error;
use uuid::Uuid;

use crate::backend::{ErrorInfo, Phase};

/// A phase the backend rejected with a non-zero error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseFailureRecord {
    pub step: &'static str,
    pub phase: Option<String>,
    pub error_code: i32,
    pub error_id: Option<String>,
    pub error_message: String,
}

impl PhaseFailureRecord {
    pub fn new(phase: Phase, info: &ErrorInfo) -> Self {
        Self {
            step: phase.step(),
            phase: info.phase.clone(),
            error_code: info.error_code,
            error_id: info.error_id.clone(),
            error_message: info.error_message.clone(),
        }
    }
}

/// An unexpected failure, with its full `source()` chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultRecord {
    pub correlation_id: Uuid,
    /// Outermost message first
    pub chain: Vec<String>,
}

impl FaultRecord {
    pub fn new(correlation_id: Uuid, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut current = Some(err);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }

        Self {
            correlation_id,
            chain,
        }
    }
}

#[async_trait]
pub trait ErrorSink: Send + Sync {
    async fn record_phase_failure(&self, record: &PhaseFailureRecord);

    async fn record_fault(&self, record: &FaultRecord);
}

/// Emits records as structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }

    fn emit_phase_failure(record: &PhaseFailureRecord) {
        error!(
            step = record.step,
            phase = record.phase.as_deref().unwrap_or(""),
            error_code = record.error_code,
            error_id = record.error_id.as_deref().unwrap_or(""),
            error_message = %record.error_message,
            "Archival backend rejected import phase"
        );
    }

    fn emit_fault(record: &FaultRecord) {
        error!(
            correlation_id = %record.correlation_id,
            chain = ?record.chain,
            "Import failed with unexpected fault"
        );
    }
}

#[async_trait]
impl ErrorSink for TracingSink {
    async fn record_phase_failure(&self, record: &PhaseFailureRecord) {
        Self::emit_phase_failure(record);
    }

    async fn record_fault(&self, record: &FaultRecord) {
        Self::emit_fault(record);
    }
}

/// Keeps records in memory (tests, local development)
#[derive(Debug, Default)]
pub struct MemorySink {
    phase_failures: Mutex<Vec<PhaseFailureRecord>>,
    faults: Mutex<Vec<FaultRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase_failures(&self) -> Vec<PhaseFailureRecord> {
        lock(&self.phase_failures).clone()
    }

    pub fn faults(&self) -> Vec<FaultRecord> {
        lock(&self.faults).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ErrorSink for MemorySink {
    async fn record_phase_failure(&self, record: &PhaseFailureRecord) {
        lock(&self.phase_failures).push(record.clone());
    }

    async fn record_fault(&self, record: &FaultRecord) {
        lock(&self.faults).push(record.clone());
    }
}
