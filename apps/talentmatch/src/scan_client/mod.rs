/// Scan Client: the single point of entry for calls to the remote ranking service.
///
/// One call per scan, no retries. The request body is multipart; its content type
/// is left to the transport so the boundary is always consistent.
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::ScanError;
use crate::intake::ScanRequest;
use crate::models::CandidateResult;

#[cfg(test)]
pub(crate) mod mock;

/// Fixed sub-path appended to the configured base URL.
pub const SCAN_PATH: &str = "scan/pdf";
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
/// Every resume is attached under this one shared field name.
pub const FILES_FIELD: &str = "files";

/// The remote ranking service as seen by a scan session.
///
/// `ScanSession` holds an `Arc<dyn RankingService>` so tests can swap the HTTP client out.
#[async_trait]
pub trait RankingService: Send + Sync {
    /// Performs exactly one scan and returns the candidates in the order the service sent them.
    async fn scan(&self, request: &ScanRequest) -> Result<Vec<CandidateResult>, ScanError>;
}

/// HTTP implementation of [`RankingService`].
#[derive(Clone)]
pub struct ScanClient {
    client: Client,
    endpoint: Url,
}

impl ScanClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: scan_endpoint(&config.api_base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RankingService for ScanClient {
    async fn scan(&self, request: &ScanRequest) -> Result<Vec<CandidateResult>, ScanError> {
        let form = build_form(request)?;

        info!(
            "Submitting scan: {} resume(s) to {}",
            request.files().len(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!("Ranking service answered {} ({} bytes)", status, body.len());

        classify_response(status, &body)
    }
}

/// `{base}/scan/pdf`, keeping every path segment of the base.
fn scan_endpoint(base: &Url) -> anyhow::Result<Url> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), SCAN_PATH);
    Ok(Url::parse(&joined)?)
}

fn build_form(request: &ScanRequest) -> Result<Form, ScanError> {
    let mut form = Form::new().text(JOB_DESCRIPTION_FIELD, request.job_description().to_string());

    for (field, level) in request.priorities().form_fields() {
        form = form.text(field, level);
    }

    for file in request.files() {
        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())?;
        form = form.part(FILES_FIELD, part);
    }

    Ok(form)
}

/// Maps a status and raw body onto the scan outcome.
fn classify_response(status: StatusCode, body: &[u8]) -> Result<Vec<CandidateResult>, ScanError> {
    if !status.is_success() {
        return match serde_json::from_slice::<Value>(body) {
            Ok(payload) => {
                warn!("Ranking service rejected scan with {status}");
                Err(ScanError::Service {
                    status: status.as_u16(),
                    payload,
                })
            }
            Err(e) => Err(ScanError::Network(format!(
                "status {status} with unreadable error body: {e}"
            ))),
        };
    }

    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| ScanError::ResponseFormat(format!("response body is not JSON: {e}")))?;

    let results = envelope
        .get("results")
        .ok_or_else(|| ScanError::ResponseFormat("missing 'results' field".to_string()))?;

    Vec::<CandidateResult>::deserialize(results)
        .map_err(|e| ScanError::ResponseFormat(format!("malformed 'results': {e}")))
}
