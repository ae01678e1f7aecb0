//! Remote asset retrieval with fallback to the next candidate on rejection.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{PipelineError, PipelineResult, TransportError};

/// Placeholder substituted with the decimal candidate identifier.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body. Left empty for non-success statuses.
    pub body: Vec<u8>,
}

impl SourceResponse {
    /// Whether the status lies in `[200, 300)`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can issue one GET for a locator.
///
/// `Err` means no usable response arrived at all; a response with any status is `Ok`.
pub trait AssetSource {
    /// Issue a single request for `url`.
    fn get(&self, url: &str)
    -> impl Future<Output = Result<SourceResponse, TransportError>> + Send;
}

/// Production source backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    /// Pooled client with timeouts applied.
    client: reqwest::Client,
}

impl HttpSource {
    /// What: Build the HTTP source with connect/overall timeouts and an identifying user agent.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Ok(HttpSource)`; `Err` if the TLS backend cannot be initialised.
    ///
    /// # Errors
    /// - Returns `Err` when `reqwest` fails to build the client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(format!("earthview/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl AssetSource for HttpSource {
    async fn get(&self, url: &str) -> Result<SourceResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(SourceResponse {
                status: status.as_u16(),
                body: Vec::new(),
            });
        }
        let body = response.bytes().await?;
        Ok(SourceResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

/// A successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    /// Candidate identifier that succeeded.
    pub id: u32,
    /// Locator that was fetched.
    pub url: String,
    /// Response body.
    pub bytes: Vec<u8>,
    /// Number of candidates tried, including the successful one.
    pub attempts: usize,
}

/// What: Substitute an identifier into a locator template.
///
/// Inputs:
/// - `template`: URL containing `{id}`
/// - `id`: Candidate identifier
///
/// Output:
/// - The template with every `{id}` replaced by the unpadded decimal identifier.
#[must_use]
pub fn locator(template: &str, id: u32) -> String {
    template.replace(ID_PLACEHOLDER, &id.to_string())
}

/// What: Walk the candidate sequence until one locator answers with a success status.
///
/// Inputs:
/// - `source`: Request issuer
/// - `template`: Locator template
/// - `sequence`: Candidates in the order they should be tried
///
/// Output:
/// - `Ok(Acquired)` for the first candidate answering `[200, 300)`.
///
/// # Errors
/// - `PipelineError::Transport` on the first request that gets no response; nothing further is
///   tried.
/// - `PipelineError::Exhausted` when every candidate was rejected.
///
/// Details:
/// - Non-success statuses move on to the next candidate with no limit other than the sequence
///   length. Transport failures are not retried.
pub async fn acquire<S: AssetSource + Sync>(
    source: &S,
    template: &str,
    sequence: &[u32],
) -> PipelineResult<Acquired> {
    for (index, &id) in sequence.iter().enumerate() {
        let url = locator(template, id);
        debug!(id, attempt = index + 1, url = %url, "requesting candidate");

        let response = match source.get(&url).await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %url, error = %err, "no response for candidate");
                return Err(PipelineError::Transport { url, source: err });
            }
        };

        if response.is_success() {
            info!(
                id,
                attempts = index + 1,
                bytes = response.body.len(),
                url = %url,
                "fetched candidate"
            );
            return Ok(Acquired {
                id,
                url,
                bytes: response.body,
                attempts: index + 1,
            });
        }
        debug!(id, status = response.status, "candidate rejected");
    }

    Err(PipelineError::Exhausted {
        attempts: sequence.len(),
    })
}
