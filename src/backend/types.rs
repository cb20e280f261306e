//! Wire types exchanged with the archival backend.
//!
//! Field names are camelCase on the wire; byte payloads (chunks and digests)
//! travel as standard base64 strings.

use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured error the backend reports inside a phase result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub error_id: Option<String>,
    pub error_code: i32,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub phase: Option<String>,
}

/// Outcome of one backend phase.
///
/// A phase succeeded when `error_info` is absent or carries code `0`;
/// any other code fails the whole import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResult<T> {
    #[serde(default)]
    pub error_info: Option<ErrorInfo>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> PhaseResult<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            error_info: None,
            payload,
        }
    }

    pub fn failed(error_info: ErrorInfo, payload: T) -> Self {
        Self {
            error_info: Some(error_info),
            payload,
        }
    }

    /// Splits the result into the success payload or the reported error
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self.error_info {
            Some(info) if info.error_code != 0 => Err(info),
            _ => Ok(self.payload),
        }
    }
}

/// Payload of the two staging phases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staged {
    /// File set id echoed back by backends that acknowledge the staged chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_set_id: Option<String>,
}

/// Payload of the finalize phase.
///
/// The id may be absent when the phase is rejected; an accepted finalize
/// without one is a protocol fault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applied {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_file_set_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: String,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

/// Staging mode requested when the file set is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportMode {
    /// Metadata plus content hash, with the object staged on the backend filesystem
    #[serde(rename = "METADATAANDHASH_FS")]
    MetadataAndHashFs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageObjectRequest {
    pub submission_agreement_id: String,
    pub file_set_id: Uuid,
    pub file_extension: String,
    pub total_file_size: u64,
    pub chunk_size: usize,
    #[serde(with = "base64_bytes")]
    pub chunk: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMetadataRequest {
    pub submission_agreement_id: String,
    pub file_set_id: Uuid,
    pub encoding: String,
    pub total_file_size: u64,
    pub chunk_size: usize,
    #[serde(with = "base64_bytes")]
    pub chunk: Bytes,
}

/// One file committed by the finalize phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_id: Uuid,
    pub original_file_id: Uuid,
    #[builder(into)]
    pub original_file_name: String,
    pub checksum: Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    #[builder(into)]
    pub submission_agreement_id: String,
    pub file_set_id: Uuid,
    pub import_mode: ImportMode,
    pub metadata_checksum: Checksum,
    pub confidentiality_level: i32,
    pub confidentiality_degradation_date: NaiveDate,
    pub personal_data_flag: bool,
    pub files: Vec<FileInfo>,
}

pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(value.as_ref()))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<Vec<u8>>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(T::from)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_error_code_counts_as_success() {
        let result = PhaseResult::failed(
            ErrorInfo {
                error_id: None,
                error_code: 0,
                error_message: String::new(),
                phase: None,
            },
            Staged::default(),
        );

        assert!(result.into_result().is_ok());
    }

    #[test]
    fn non_zero_error_code_fails_the_phase() {
        let result = PhaseResult::failed(
            ErrorInfo {
                error_id: Some("e-1".to_string()),
                error_code: 42,
                error_message: "bad XML".to_string(),
                phase: Some("Validation".to_string()),
            },
            Staged::default(),
        );

        let err = result.into_result().unwrap_err();
        assert_eq!(err.error_code, 42);
        assert_eq!(err.error_message, "bad XML");
    }

    #[test]
    fn finalize_result_parses_from_backend_json() {
        let body = json!({
            "errorInfo": null,
            "importedFileSetId": "F123"
        });

        let result: PhaseResult<Applied> = serde_json::from_value(body).unwrap();
        assert_eq!(
            result.into_result().unwrap().imported_file_set_id.as_deref(),
            Some("F123")
        );
    }

    #[test]
    fn rejected_finalize_parses_without_imported_id() {
        let body = json!({
            "errorInfo": { "errorCode": 9, "errorMessage": "checksum mismatch" }
        });

        let result: PhaseResult<Applied> = serde_json::from_value(body).unwrap();
        assert_eq!(result.payload.imported_file_set_id, None);
        assert_eq!(result.into_result().unwrap_err().error_code, 9);
    }

    #[test]
    fn staging_result_parses_without_payload_fields() {
        let body = json!({
            "errorInfo": { "errorId": "x", "errorCode": 7, "errorMessage": "quota" }
        });

        let result: PhaseResult<Staged> = serde_json::from_value(body).unwrap();
        let err = result.into_result().unwrap_err();
        assert_eq!(err.error_code, 7);
        assert_eq!(err.phase, None);
    }

    #[test]
    fn stage_request_serializes_chunk_as_base64() {
        let request = StageObjectRequest {
            submission_agreement_id: "SA-1".to_string(),
            file_set_id: Uuid::nil(),
            file_extension: "pdf".to_string(),
            total_file_size: 5,
            chunk_size: 5,
            chunk: Bytes::from_static(b"hello"),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["chunk"], "aGVsbG8=");
        assert_eq!(value["totalFileSize"], 5);
        assert_eq!(value["submissionAgreementId"], "SA-1");
    }

    #[test]
    fn import_mode_uses_backend_constant() {
        let value = serde_json::to_value(ImportMode::MetadataAndHashFs).unwrap();
        assert_eq!(value, "METADATAANDHASH_FS");
    }
}
