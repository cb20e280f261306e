//! Inbound import request and outbound response.
//!
//! A request carries both artifacts base64-encoded:
//!
//! ```json
//! {
//!   "submissionAgreementId": "SA-2024-017",
//!   "fileSetId": "2f6c1f8e-8a4b-4c55-9d7a-0a9f3c5e1b22",
//!   "preservationObject": {
//!     "data": "JVBERi0xLjcK...",
//!     "fileName": "decision.pdf",
//!     "fileExtension": "pdf"
//!   },
//!   "metadataXml": "PD94bWwgdmVyc2lvbj0iMS4wIj8+...",
//!   "confidentialityLevel": 0,
//!   "confidentialityDegradationDate": "2054-01-01",
//!   "personalDataFlag": false
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub submission_agreement_id: String,
    #[serde(alias = "uuid")]
    pub file_set_id: Uuid,
    pub preservation_object: PreservationObject,
    /// Base64-encoded metadata document
    pub metadata_xml: String,
    pub confidentiality_level: i32,
    pub confidentiality_degradation_date: NaiveDate,
    pub personal_data_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreservationObject {
    /// Base64-encoded file content
    pub data: String,
    pub file_name: String,
    pub file_extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub imported_file_set_id: String,
}
