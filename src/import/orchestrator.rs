use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::ImportError;
use super::models::{ImportRequest, ImportResponse};
use super::translator::DecodedImport;
use crate::backend::{ArchiveBackend, BackendError, Phase, PhaseResult};
use crate::errorlog::{ErrorSink, FaultRecord, PhaseFailureRecord};
use crate::observability::Metrics;

/// Drives one import through the backend's three phases.
///
/// Phases run strictly in order: stage object, stage metadata, apply. The
/// first phase the backend rejects ends the import and later phases are
/// never attempted. Already staged artifacts are left for the backend to
/// clean up; nothing is retried or rolled back here.
pub struct Importer {
    backend: Arc<dyn ArchiveBackend>,
    sink: Arc<dyn ErrorSink>,
    metrics: Arc<Metrics>,
}

impl Importer {
    pub fn new(
        backend: Arc<dyn ArchiveBackend>,
        sink: Arc<dyn ErrorSink>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            backend,
            sink,
            metrics,
        }
    }

    /// Runs the import and records its failure, if any, in the error sink.
    ///
    /// Faults get a fresh correlation id and their whole source chain is
    /// recorded; the returned error still displays only the outermost message.
    #[tracing::instrument(skip_all, fields(file_set_id = %request.file_set_id))]
    pub async fn import(&self, request: ImportRequest) -> Result<ImportResponse, ImportError> {
        self.metrics.import_received();

        match self.run_phases(request).await {
            Ok(response) => {
                self.metrics.import_completed();
                info!(
                    imported_file_set_id = %response.imported_file_set_id,
                    "Import applied"
                );
                Ok(response)
            }
            Err(err) if err.is_fault() => {
                let correlation_id = Uuid::new_v4();
                self.metrics.fault();
                debug!(%correlation_id, error = %err, "Import aborted");
                self.sink
                    .record_fault(&FaultRecord::new(correlation_id, &err))
                    .await;
                Err(err)
            }
            Err(err) => {
                self.metrics.phase_failed();
                Err(err)
            }
        }
    }

    async fn run_phases(&self, request: ImportRequest) -> Result<ImportResponse, ImportError> {
        let decoded = DecodedImport::decode(request)?;

        let staged = self
            .backend
            .stage_object(decoded.stage_object_request())
            .await?;
        self.settle(Phase::StageObject, staged).await?;

        let staged = self
            .backend
            .stage_metadata(decoded.stage_metadata_request())
            .await?;
        self.settle(Phase::StageMetadata, staged).await?;

        let applied = self.backend.finalize(decoded.finalize_request()).await?;
        let applied = self.settle(Phase::Finalize, applied).await?;
        let imported_file_set_id = applied
            .imported_file_set_id
            .filter(|id| !id.is_empty())
            .ok_or(BackendError::MissingField {
                operation: Phase::Finalize.operation(),
                field: "importedFileSetId",
            })?;

        Ok(ImportResponse {
            imported_file_set_id,
        })
    }

    /// Unwraps a phase result, recording a rejection before failing
    async fn settle<T: Send>(&self, phase: Phase, result: PhaseResult<T>) -> Result<T, ImportError> {
        match result.into_result() {
            Ok(payload) => {
                debug!(step = phase.step(), "Phase succeeded");
                Ok(payload)
            }
            Err(details) => {
                warn!(
                    step = phase.step(),
                    error_code = details.error_code,
                    error_message = %details.error_message,
                    "Phase rejected by archival backend"
                );
                self.sink
                    .record_phase_failure(&PhaseFailureRecord::new(phase, &details))
                    .await;
                Err(ImportError::Rejected { phase, details })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, MockBackend};
    use crate::errorlog::MemorySink;
    use crate::import::models::PreservationObject;
    use base64::{Engine, engine::general_purpose::STANDARD};
    use chrono::NaiveDate;

    fn request() -> ImportRequest {
        ImportRequest {
            submission_agreement_id: "SA-1".to_string(),
            file_set_id: Uuid::new_v4(),
            preservation_object: PreservationObject {
                data: STANDARD.encode(b"object bytes"),
                file_name: "scan.tif".to_string(),
                file_extension: "tif".to_string(),
            },
            metadata_xml: STANDARD.encode(b"<record/>"),
            confidentiality_level: 0,
            confidentiality_degradation_date: NaiveDate::from_ymd_opt(2040, 6, 30).unwrap(),
            personal_data_flag: false,
        }
    }

    struct Harness {
        backend: Arc<MockBackend>,
        sink: Arc<MemorySink>,
        metrics: Arc<Metrics>,
        importer: Importer,
    }

    fn harness(backend: MockBackend) -> Harness {
        let backend = Arc::new(backend);
        let sink = Arc::new(MemorySink::new());
        let metrics = Arc::new(Metrics::new());
        let importer = Importer::new(backend.clone(), sink.clone(), metrics.clone());
        Harness {
            backend,
            sink,
            metrics,
            importer,
        }
    }

    fn phases(backend: &MockBackend) -> Vec<Phase> {
        backend.calls().iter().map(BackendCall::phase).collect()
    }

    #[tokio::test]
    async fn runs_phases_in_order_and_returns_imported_id() {
        let h = harness(MockBackend::new("F123"));

        let response = h.importer.import(request()).await.unwrap();

        assert_eq!(response.imported_file_set_id, "F123");
        assert_eq!(
            phases(&h.backend),
            vec![Phase::StageObject, Phase::StageMetadata, Phase::Finalize]
        );
        assert!(h.sink.phase_failures().is_empty());
        assert!(h.sink.faults().is_empty());
        assert_eq!(h.metrics.snapshot().imports_completed, 1);
    }

    #[tokio::test]
    async fn object_rejection_skips_remaining_phases() {
        let h = harness(MockBackend::new("F123").with_error(Phase::StageObject, 3, "quota exceeded"));

        let err = h.importer.import(request()).await.unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(h.backend.call_count(Phase::StageObject), 1);
        assert_eq!(h.backend.call_count(Phase::StageMetadata), 0);
        assert_eq!(h.backend.call_count(Phase::Finalize), 0);

        let failures = h.sink.phase_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].step, "Import preservation object");
    }

    #[tokio::test]
    async fn metadata_rejection_skips_finalize() {
        let h = harness(MockBackend::new("F123").with_error(Phase::StageMetadata, 42, "bad XML"));

        let err = h.importer.import(request()).await.unwrap_err();

        assert!(matches!(
            err,
            ImportError::Rejected {
                phase: Phase::StageMetadata,
                ..
            }
        ));
        assert_eq!(err.to_string(), "bad XML");
        assert_eq!(h.backend.call_count(Phase::StageObject), 1);
        assert_eq!(h.backend.call_count(Phase::StageMetadata), 1);
        assert_eq!(h.backend.call_count(Phase::Finalize), 0);

        let failures = h.sink.phase_failures();
        assert_eq!(failures[0].step, "Import Metadata");
        assert_eq!(failures[0].error_code, 42);
        assert_eq!(h.metrics.snapshot().phase_failures, 1);
        assert!(h.sink.faults().is_empty());
    }

    #[tokio::test]
    async fn finalize_rejection_is_tagged_apply_import() {
        let h = harness(MockBackend::new("F123").with_error(Phase::Finalize, 9, "checksum mismatch"));

        let err = h.importer.import(request()).await.unwrap_err();

        assert_eq!(err.to_string(), "checksum mismatch");
        assert_eq!(h.sink.phase_failures()[0].step, "Apply import");
        assert_eq!(h.backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn decode_failure_happens_before_any_backend_call() {
        let h = harness(MockBackend::new("F123"));
        let mut request = request();
        request.metadata_xml = "*** not base64 ***".to_string();

        let err = h.importer.import(request).await.unwrap_err();

        assert!(matches!(err, ImportError::Decode { field: "metadataXml", .. }));
        assert!(h.backend.calls().is_empty());

        let faults = h.sink.faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].chain[0], "metadataXml is not a valid base64 string");
        assert!(faults[0].chain.len() > 1);
    }

    #[tokio::test]
    async fn fault_records_full_chain_but_displays_top_message() {
        let h = harness(MockBackend::new("F123").with_fault(Phase::Finalize, "archive service unavailable"));

        let err = h.importer.import(request()).await.unwrap_err();

        assert_eq!(err.to_string(), "archive service unavailable");
        assert_eq!(h.backend.calls().len(), 3);

        let faults = h.sink.faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(
            faults[0].chain,
            vec!["archive service unavailable", "connection reset by peer"]
        );
        assert!(h.sink.phase_failures().is_empty());
        assert_eq!(h.metrics.snapshot().faults, 1);
    }

    #[tokio::test]
    async fn each_fault_gets_its_own_correlation_id() {
        let h = harness(MockBackend::new("F123").with_fault(Phase::StageObject, "down"));

        let _ = h.importer.import(request()).await;
        let _ = h.importer.import(request()).await;

        let faults = h.sink.faults();
        assert_eq!(faults.len(), 2);
        assert_ne!(faults[0].correlation_id, faults[1].correlation_id);
        assert_eq!(h.backend.call_count(Phase::StageMetadata), 0);
    }

    #[tokio::test]
    async fn accepted_finalize_without_imported_id_is_a_fault() {
        let h = harness(MockBackend::new(""));

        let err = h.importer.import(request()).await.unwrap_err();

        assert!(err.is_fault());
        assert_eq!(err.to_string(), "ApplyImport response is missing importedFileSetId");
        assert_eq!(h.backend.calls().len(), 3);
        assert_eq!(h.sink.faults().len(), 1);
        assert_eq!(h.metrics.snapshot().imports_completed, 0);
    }

    #[test]
    fn status_fault_records_the_response_body() {
        let err = ImportError::from(BackendError::Status {
            operation: "ApplyImport",
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: crate::backend::ResponseBody("SOAP fault: store offline".to_string()),
        });

        let record = FaultRecord::new(Uuid::nil(), &err);

        assert_eq!(err.to_string(), "ApplyImport returned HTTP 502 Bad Gateway");
        assert_eq!(
            record.chain,
            vec![
                "ApplyImport returned HTTP 502 Bad Gateway",
                "response body: SOAP fault: store offline"
            ]
        );
    }

    #[tokio::test]
    async fn finalize_carries_checksums_of_staged_bytes() {
        let h = harness(MockBackend::new("F123"));

        h.importer.import(request()).await.unwrap();

        let calls = h.backend.calls();
        let (BackendCall::StageObject(object), BackendCall::Finalize(finalize)) =
            (&calls[0], &calls[2])
        else {
            panic!("unexpected call order: {calls:?}");
        };
        assert_eq!(
            finalize.files[0].checksum,
            crate::import::checksum(&object.chunk)
        );
    }
}
