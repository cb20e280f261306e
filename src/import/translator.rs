//! Turns an [`ImportRequest`] into the three backend request payloads.
//!
//! Both artifacts are decoded once, up front, so a malformed payload fails
//! the import before the backend sees anything. The decoded buffers are
//! [`Bytes`], so handing them to each phase does not copy them.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use chrono::NaiveDate;
use uuid::Uuid;

use super::checksum::checksum;
use super::error::ImportError;
use super::models::ImportRequest;
use crate::backend::{
    FileInfo, FinalizeRequest, ImportMode, StageMetadataRequest, StageObjectRequest,
};

/// Encoding label sent with the metadata document
pub const METADATA_ENCODING: &str = "UTF-8";

/// An import request whose payloads have been decoded
#[derive(Debug, Clone)]
pub struct DecodedImport {
    submission_agreement_id: String,
    file_set_id: Uuid,
    file_name: String,
    file_extension: String,
    confidentiality_level: i32,
    confidentiality_degradation_date: NaiveDate,
    personal_data_flag: bool,
    object: Bytes,
    metadata: Bytes,
}

impl DecodedImport {
    pub fn decode(request: ImportRequest) -> Result<Self, ImportError> {
        let object = decode_base64("preservationObject.data", &request.preservation_object.data)?;
        let metadata = decode_base64("metadataXml", &request.metadata_xml)?;

        Ok(Self {
            submission_agreement_id: request.submission_agreement_id,
            file_set_id: request.file_set_id,
            file_name: request.preservation_object.file_name,
            file_extension: request.preservation_object.file_extension,
            confidentiality_level: request.confidentiality_level,
            confidentiality_degradation_date: request.confidentiality_degradation_date,
            personal_data_flag: request.personal_data_flag,
            object,
            metadata,
        })
    }

    /// The whole object travels as a single chunk
    pub fn stage_object_request(&self) -> StageObjectRequest {
        StageObjectRequest {
            submission_agreement_id: self.submission_agreement_id.clone(),
            file_set_id: self.file_set_id,
            file_extension: self.file_extension.clone(),
            total_file_size: self.object.len() as u64,
            chunk_size: self.object.len(),
            chunk: self.object.clone(),
        }
    }

    pub fn stage_metadata_request(&self) -> StageMetadataRequest {
        StageMetadataRequest {
            submission_agreement_id: self.submission_agreement_id.clone(),
            file_set_id: self.file_set_id,
            encoding: METADATA_ENCODING.to_string(),
            total_file_size: self.metadata.len() as u64,
            chunk_size: self.metadata.len(),
            chunk: self.metadata.clone(),
        }
    }

    /// Binds both artifacts' checksums into the apply request.
    ///
    /// The file id is the file set id; each call assigns a fresh original file id.
    pub fn finalize_request(&self) -> FinalizeRequest {
        let file = FileInfo::builder()
            .file_id(self.file_set_id)
            .original_file_id(Uuid::new_v4())
            .original_file_name(self.file_name.as_str())
            .checksum(checksum(&self.object))
            .build();

        FinalizeRequest::builder()
            .submission_agreement_id(self.submission_agreement_id.as_str())
            .file_set_id(self.file_set_id)
            .import_mode(ImportMode::MetadataAndHashFs)
            .metadata_checksum(checksum(&self.metadata))
            .confidentiality_level(self.confidentiality_level)
            .confidentiality_degradation_date(self.confidentiality_degradation_date)
            .personal_data_flag(self.personal_data_flag)
            .files(vec![file])
            .build()
    }
}

/// Standard-alphabet base64; embedded ASCII whitespace (line wrapping) is ignored
fn decode_base64(field: &'static str, encoded: &str) -> Result<Bytes, ImportError> {
    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    STANDARD
        .decode(compact)
        .map(Bytes::from)
        .map_err(|source| ImportError::Decode { field, source })
}
