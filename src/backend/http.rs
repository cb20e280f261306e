//! JSON-over-HTTP client for the archival backend

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    Applied, ArchiveBackend, BackendError, FinalizeRequest, Phase, PhaseResult, ResponseBody,
    Result, StageMetadataRequest, StageObjectRequest, Staged,
};
use crate::config::BackendConfig;

/// Error response bodies beyond this many bytes are truncated
const MAX_ERROR_BODY: usize = 4 * 1024;

#[derive(Debug, Clone)]
struct Endpoints {
    stage_object: Url,
    stage_metadata: Url,
    finalize: Url,
}

/// Backend client posting each phase to its configured endpoint.
///
/// No retries: a transport failure surfaces immediately as a fault.
#[derive(Debug, Clone)]
pub struct HttpArchiveBackend {
    client: Client,
    endpoints: Endpoints,
    token: Option<String>,
}

impl HttpArchiveBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let endpoints = Endpoints {
            stage_object: join(base, &config.stage_object_path)?,
            stage_metadata: join(base, &config.stage_metadata_path)?,
            finalize: join(base, &config.finalize_path)?,
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(BackendError::Client)?;

        Ok(Self {
            client,
            endpoints,
            token: config.token.clone(),
        })
    }

    async fn post<B, T>(&self, phase: Phase, url: &Url, body: &B) -> Result<PhaseResult<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let operation = phase.operation();
        debug!(operation, %url, "Calling archival backend");

        let mut request = self.client.post(url.clone()).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport { operation, source })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| BackendError::Transport { operation, source })?;

        if !status.is_success() {
            let body = error_body(&bytes);
            warn!(operation, %status, %body, "Backend answered with an error status");
            return Err(BackendError::Status {
                operation,
                status,
                body: ResponseBody(body),
            });
        }

        debug!(operation, status = status.as_u16(), size = bytes.len(), "Backend responded");

        serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode { operation, source })
    }
}

fn error_body(bytes: &[u8]) -> String {
    if bytes.len() <= MAX_ERROR_BODY {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let mut body = String::from_utf8_lossy(&bytes[..MAX_ERROR_BODY]).into_owned();
    body.push_str(" [truncated]");
    body
}

/// Appends an endpoint path to the base url, keeping any base path prefix
fn join(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{base}{path}");
    Url::parse(&raw).map_err(|_| BackendError::InvalidUrl(raw))
}

#[async_trait]
impl ArchiveBackend for HttpArchiveBackend {
    async fn stage_object(&self, request: StageObjectRequest) -> Result<PhaseResult<Staged>> {
        self.post(Phase::StageObject, &self.endpoints.stage_object, &request)
            .await
    }

    async fn stage_metadata(
        &self,
        request: StageMetadataRequest,
    ) -> Result<PhaseResult<Staged>> {
        self.post(Phase::StageMetadata, &self.endpoints.stage_metadata, &request)
            .await
    }

    async fn finalize(&self, request: FinalizeRequest) -> Result<PhaseResult<Applied>> {
        self.post(Phase::Finalize, &self.endpoints.finalize, &request)
            .await
    }
}
