//! Tracing setup and in-process import counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Install the global tracing subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Counters for the import endpoint
#[derive(Debug, Default)]
pub struct Metrics {
    imports_received: AtomicU64,
    imports_completed: AtomicU64,
    phase_failures: AtomicU64,
    faults: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import_received(&self) {
        self.imports_received.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "imports_received", "Metric incremented");
    }

    pub fn import_completed(&self) {
        self.imports_completed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "imports_completed", "Metric incremented");
    }

    pub fn phase_failed(&self) {
        self.phase_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "phase_failures", "Metric incremented");
    }

    pub fn fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "faults", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            imports_received: self.imports_received.load(Ordering::Relaxed),
            imports_completed: self.imports_completed.load(Ordering::Relaxed),
            phase_failures: self.phase_failures.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub imports_received: u64,
    pub imports_completed: u64,
    pub phase_failures: u64,
    pub faults: u64,
}
