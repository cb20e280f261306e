//! Request plumbing shared by the import handler

use axum::http::{HeaderMap, header};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Requires a `Content-Type` of `application/json`, parameters allowed
pub fn require_json(headers: &HeaderMap) -> Result<(), ApiError> {
    let raw = headers
        .get(header::CONTENT_TYPE)
        .ok_or_else(|| ApiError::InvalidPayload("missing Content-Type header".into()))?
        .to_str()
        .map_err(|_| ApiError::InvalidPayload("Content-Type is not valid ASCII".into()))?;

    let media_type: mime::Mime = raw
        .parse()
        .map_err(|_| ApiError::InvalidPayload(format!("invalid Content-Type: {raw}")))?;

    if media_type.essence_str() != mime::APPLICATION_JSON.essence_str() {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}",
            media_type.essence_str()
        )));
    }

    Ok(())
}

/// Collects the (already decompressed) body, enforcing the size limit.
///
/// The limit applies while frames arrive, so a streamed or inflated body is
/// cut off once it passes `limit` bytes.
pub async fn read_body(body: axum::body::Body, limit: usize) -> Result<Vec<u8>, ApiError> {
    let data = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|err| {
            if err.is::<LengthLimitError>() {
                ApiError::PayloadTooLarge(limit)
            } else {
                ApiError::InvalidPayload(format!("failed to read body: {err}"))
            }
        })?
        .to_bytes();

    Ok(data.to_vec())
}
