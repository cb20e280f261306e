use thiserror::Error;

use crate::import::ImportRequest;

/// Required-field checks on an import request, applied before the import runs.
///
/// The base64 payloads are not checked here: an empty string decodes to an
/// empty artifact and is passed on to the backend as such.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("submissionAgreementId is required")]
    MissingSubmissionAgreementId,
    #[error("fileSetId must not be the nil UUID")]
    NilFileSetId,
    #[error("preservationObject.fileName is required")]
    MissingFileName,
    #[error("preservationObject.fileExtension is required")]
    MissingFileExtension,
}

pub fn validate_import_request(request: &ImportRequest) -> Result<(), RequestValidationError> {
    if request.submission_agreement_id.trim().is_empty() {
        return Err(RequestValidationError::MissingSubmissionAgreementId);
    }

    if request.file_set_id.is_nil() {
        return Err(RequestValidationError::NilFileSetId);
    }

    let object = &request.preservation_object;
    if object.file_name.trim().is_empty() {
        return Err(RequestValidationError::MissingFileName);
    }
    if object.file_extension.trim().is_empty() {
        return Err(RequestValidationError::MissingFileExtension);
    }

    Ok(())
}
