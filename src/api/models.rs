//! API models for the import and health endpoints.
//!
//! `POST /api/import` accepts an [`ImportRequest`] and answers with an
//! [`ImportResponse`]; see [`crate::import::models`] for the JSON shape.
//! Failures are returned as `text/plain`.

use serde::Serialize;

pub use crate::import::{ImportRequest, ImportResponse, PreservationObject};
use crate::observability::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub imports: MetricsSnapshot,
}
