use async_trait::async_trait;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::{ErrorSink, FaultRecord, PhaseFailureRecord, TracingSink};

const PHASE_LOG: &str = "phase-errors.log";
const FAULT_LOG: &str = "faults.log";
const SEPARATOR: &str =
    "-------------------------------------------------------------------------";

/// Appends human-readable records to two files in a log directory.
///
/// Every record is also emitted as a tracing event, so a write failure
/// loses only the file copy.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn append(&self, file_name: &str, text: &str) {
        let path = self.dir.join(file_name);
        if let Err(err) = append_to(&path, text).await {
            warn!(path = %path.display(), error = %err, "Failed to write error log");
        }
    }
}

async fn append_to(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await
}

fn format_phase_failure(record: &PhaseFailureRecord) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Date: {}", chrono::Utc::now().to_rfc3339());
    let _ = writeln!(text, "Step: {}", record.step);
    let _ = writeln!(text, "Phase: {}", record.phase.as_deref().unwrap_or(""));
    let _ = writeln!(text, "Error Code: {}", record.error_code);
    let _ = writeln!(text, "Error ID: {}", record.error_id.as_deref().unwrap_or(""));
    let _ = writeln!(text, "Error Message: {}", record.error_message);
    let _ = writeln!(text);
    let _ = writeln!(text, "{SEPARATOR}");
    text
}

fn format_fault(record: &FaultRecord) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{SEPARATOR}");
    let _ = writeln!(text, "Date: {}", chrono::Utc::now().to_rfc3339());
    let _ = writeln!(text, "Correlation ID: {}", record.correlation_id);
    for (depth, message) in record.chain.iter().enumerate() {
        if depth == 0 {
            let _ = writeln!(text, "Error: {message}");
        } else {
            let _ = writeln!(text, "Caused by: {message}");
        }
    }
    let _ = writeln!(text);
    text
}

#[async_trait]
impl ErrorSink for FileSink {
    async fn record_phase_failure(&self, record: &PhaseFailureRecord) {
        TracingSink::emit_phase_failure(record);
        self.append(PHASE_LOG, &format_phase_failure(record)).await;
    }

    async fn record_fault(&self, record: &FaultRecord) {
        TracingSink::emit_fault(record);
        self.append(FAULT_LOG, &format_fault(record)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn phase_failure() -> PhaseFailureRecord {
        PhaseFailureRecord {
            step: "Import Metadata",
            phase: Some("Validation".to_string()),
            error_code: 42,
            error_id: Some("E-1".to_string()),
            error_message: "bad XML".to_string(),
        }
    }

    #[tokio::test]
    async fn appends_phase_failures() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::open(temp_dir.path().join("logs")).unwrap();

        sink.record_phase_failure(&phase_failure()).await;
        sink.record_phase_failure(&phase_failure()).await;

        let written = std::fs::read_to_string(sink.dir().join(PHASE_LOG)).unwrap();
        assert_eq!(written.matches("Step: Import Metadata").count(), 2);
        assert!(written.contains("Error Code: 42"));
        assert!(written.contains("Error Message: bad XML"));
    }

    #[tokio::test]
    async fn writes_fault_chain_with_correlation_id() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::open(temp_dir.path()).unwrap();
        let correlation_id = Uuid::new_v4();

        sink.record_fault(&FaultRecord {
            correlation_id,
            chain: vec![
                "ApplyImport request failed".to_string(),
                "connection reset by peer".to_string(),
            ],
        })
        .await;

        let written = std::fs::read_to_string(sink.dir().join(FAULT_LOG)).unwrap();
        assert!(written.contains(&format!("Correlation ID: {correlation_id}")));
        assert!(written.contains("Error: ApplyImport request failed"));
        assert!(written.contains("Caused by: connection reset by peer"));
    }

    #[tokio::test]
    async fn write_failure_does_not_panic() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::open(temp_dir.path()).unwrap();
        // A directory where the log file should be makes the append fail.
        std::fs::create_dir(sink.dir().join(PHASE_LOG)).unwrap();

        sink.record_phase_failure(&phase_failure()).await;
    }
}
