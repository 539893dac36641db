use crate::error::{Result, ScanError};
use crate::result::FetchResponse;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; relink/0.1; +https://github.com/relink-dev/relink)";

/// Raw HTTP capability. Everything that talks to the network goes through this
/// trait so resolution logic can run against a stub in tests.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Body-less request; the returned body is always empty.
    async fn head(&self, url: &str) -> Result<FetchResponse>;

    async fn get(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(Duration::from_secs(10), DEFAULT_USER_AGENT, 2 * 1024 * 1024)
    }

    pub fn with_options(timeout: Duration, user_agent: &str, max_body_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ScanError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    fn describe(response: &Response) -> FetchResponse {
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        FetchResponse {
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
            content_type,
            body: String::new(),
        }
    }

    /// Reads at most `max_body_bytes`; the remainder of the body is dropped.
    async fn read_capped(&self, mut response: Response) -> Result<String> {
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_bytes.saturating_sub(buf.len());
            if chunk.len() >= room {
                buf.extend_from_slice(&chunk[..room]);
                break;
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn head(&self, url: &str) -> Result<FetchResponse> {
        debug!("HEAD {}", url);
        let response = self.client.head(url).send().await?;
        Ok(Self::describe(&response))
    }

    async fn get(&self, url: &str) -> Result<FetchResponse> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let mut fetched = Self::describe(&response);
        fetched.body = self.read_capped(response).await?;
        Ok(fetched)
    }
}
