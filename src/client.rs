use std::{sync::Arc, time::Duration};

use reqwest::{header::USER_AGENT, Client as ReqwestClient};
use serde::de::DeserializeOwned;
use tokio::{
    sync::{Semaphore, SemaphorePermit},
    task::JoinHandle,
    time::interval,
};

use crate::{
    error::Error,
    models::{catalog::Catalog, thread::Attachment, thread::Thread},
    result::Result,
};

/// Production JSON API host.
pub const API_BASE: &str = "https://a.4cdn.org";

/// Production media host.
pub const MEDIA_BASE: &str = "https://i.4cdn.org";

const USER_AGENT_VALUE: &str = "fourget/1.0";

/// Bounded retry: a fixed number of attempts with a fixed delay in between.
///
/// No exponential backoff and no adaptive throttling. Retries are
/// immediate-bounded, which is adequate for a best-effort fetch tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Fixed sleep between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy with the given attempt bound and inter-attempt delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A policy that never sleeps, for deterministic tests.
    pub fn without_delay(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Knobs for [`Client`] construction.
///
/// The [`Default`] values match the production endpoints and rate limits;
/// tests substitute a local server and a zero-delay policy.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Retry policy applied to every request.
    pub retry: RetryPolicy,
    /// Interval at which the rate limiter grants a new request permit.
    pub request_interval: Duration,
    /// Base URL of the JSON API (catalog and thread endpoints).
    pub api_base: String,
    /// Base URL of the media host (image blobs).
    pub media_base: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            request_interval: Duration::from_secs(1),
            api_base: API_BASE.to_string(),
            media_base: MEDIA_BASE.to_string(),
        }
    }
}

/// HTTP client for the imageboard's read-only API.
///
/// Wraps a [`reqwest::Client`] with a global rate limiter and a bounded
/// [`RetryPolicy`]. All endpoint knowledge (URLs, JSON schemas) lives here
/// and in [`crate::models`]; callers only see typed results.
#[derive(Debug)]
pub struct Client {
    http: ReqwestClient,
    limiter: RateLimit,
    retry: RetryPolicy,
    api_base: String,
    media_base: String,
}

/// Global request pacing: one permit is replenished per interval, so at
/// most one request is dispatched per interval regardless of how many
/// workers are fetching.
#[derive(Debug)]
struct RateLimit {
    permit: Arc<Semaphore>,
    replenisher: JoinHandle<()>,
}

impl RateLimit {
    fn new(period: Duration) -> Self {
        let permit = Arc::new(Semaphore::new(0));
        let clone = permit.clone();

        let replenisher = tokio::spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if clone.available_permits() == 0 {
                    clone.add_permits(1);
                }
            }
        });

        Self {
            permit,
            replenisher,
        }
    }

    async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.permit.acquire().await.map_err(Into::into)
    }
}

impl Drop for RateLimit {
    fn drop(&mut self) {
        self.replenisher.abort();
    }
}

impl Client {
    /// A client against the production endpoints with default rate limits.
    pub fn new() -> Client {
        Self::with_config(ClientConfig::default())
    }

    /// A client built from explicit configuration.
    pub fn with_config(config: ClientConfig) -> Client {
        Client {
            http: ReqwestClient::new(),
            limiter: RateLimit::new(config.request_interval),
            retry: config.retry,
            api_base: config.api_base,
            media_base: config.media_base,
        }
    }

    /// Fetches the catalog of a board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] once the retry bound is exhausted and
    /// [`Error::Decode`] if the endpoint answers with malformed JSON.
    pub async fn get_catalog(&self, board: &str) -> Result<Catalog> {
        let url = format!("{}/{board}/catalog.json", self.api_base);
        let (catalog, _) = self.fetch_json::<Catalog>(&url).await?;
        Ok(catalog)
    }

    /// Fetches a thread by its OP id.
    ///
    /// Returns the parsed thread together with the raw body bytes, which
    /// are what lands on disk as `thread.json`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Client::get_catalog`].
    pub async fn get_thread(&self, board: &str, no: u64) -> Result<(Thread, Vec<u8>)> {
        let url = format!("{}/{board}/thread/{no}.json", self.api_base);
        self.fetch_json(&url).await
    }

    /// Downloads the image blob of an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`]; callers are expected to log and skip
    /// rather than abort the thread.
    pub async fn get_image(&self, board: &str, attachment: &Attachment) -> Result<Vec<u8>> {
        let url = format!("{}/{board}/{}", self.media_base, attachment.remote_name());
        let response = self
            .get_with_retry(&url)
            .await
            .map_err(|err| Error::Image {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        let blob = response.bytes().await.map_err(|err| Error::Image {
            url: url.clone(),
            reason: err.to_string(),
        })?;
        Ok(blob.to_vec())
    }

    async fn fetch_json<T>(&self, url: &str) -> Result<(T, Vec<u8>)>
    where
        T: DeserializeOwned,
    {
        let response = self.get_with_retry(url).await?;
        let body = response.bytes().await?.to_vec();
        let parsed = serde_json::from_slice(&body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok((parsed, body))
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let permit = self.limiter.acquire().await?;
            let outcome = self
                .http
                .get(url)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .send()
                .await;
            // reduce the permit count
            permit.forget();

            let reason = match outcome {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(url, attempt, "request succeeded");
                    return Ok(response);
                }
                Ok(response) => format!("unexpected status {}", response.status()),
                Err(err) => err.to_string(),
            };

            if attempt >= self.retry.max_attempts {
                return Err(Error::Network {
                    url: url.to_string(),
                    attempts: attempt,
                    reason,
                });
            }
            tracing::warn!(url, attempt, %reason, "request failed, retrying");
            if !self.retry.delay.is_zero() {
                tokio::time::sleep(self.retry.delay).await;
            }
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{Client, ClientConfig, RetryPolicy};
    use crate::error::Error;

    fn test_client(server: &MockServer, max_attempts: u32) -> Client {
        Client::with_config(ClientConfig {
            retry: RetryPolicy::without_delay(max_attempts),
            request_interval: Duration::from_millis(1),
            api_base: server.uri(),
            media_base: server.uri(),
        })
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/g/catalog.json"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/g/catalog.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "page": 1, "threads": [ { "no": 570368, "sub": "paper planes", "replies": 2 } ] }
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server, 3);
        let catalog = client.get_catalog("g").await.unwrap();
        assert_eq!(catalog.thread_ids(), vec![570_368]);
    }

    #[tokio::test]
    async fn retry_exhaustion_is_a_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/g/catalog.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server, 2);
        let err = client.get_catalog("g").await.unwrap_err();
        assert!(matches!(err, Error::Network { attempts: 2, .. }), "{err}");
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/g/thread/570368.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server, 1);
        let err = client.get_thread("g", 570_368).await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }), "{err}");
    }

    #[tokio::test]
    async fn image_failures_map_to_the_image_error_kind() {
        let server = MockServer::start().await;
        let client = test_client(&server, 1);
        let attachment = crate::models::thread::Attachment {
            tim: 1_546_293_948_883,
            ext: ".jpg".to_string(),
            filename: "dart".to_string(),
        };

        // nothing mounted: the media host 404s
        let err = client.get_image("g", &attachment).await.unwrap_err();
        assert!(matches!(err, Error::Image { .. }), "{err}");
    }
}
