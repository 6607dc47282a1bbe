use crate::models::{ChatRequest, Endpoint, RawResponse, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// Delivers one chat request to the server and hands back whatever came back.
///
/// Implementations report transport failures as errors but never interpret
/// the HTTP status; that is the caller's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_message(&self, endpoint: Endpoint, request: &ChatRequest) -> Result<RawResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(120),
            connect: Duration::from_secs(10),
        }
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    server_url: String,
}

impl ApiClient {
    pub fn new(server_url: impl Into<String>, timeouts: Timeouts) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()?;

        let server_url = server_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, server_url })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.server_url, endpoint.path())
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn post_message(&self, endpoint: Endpoint, request: &ChatRequest) -> Result<RawResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = self.url_for(endpoint);
        debug!(%url, "posting chat message");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:5000/", Timeouts::default()).unwrap();
        assert_eq!(client.server_url(), "http://localhost:5000");
        assert_eq!(client.url_for(Endpoint::Search), "http://localhost:5000/search");
        assert_eq!(client.url_for(Endpoint::KbAnswer), "http://localhost:5000/kbanswer");
        assert_eq!(client.url_for(Endpoint::Answer), "http://localhost:5000/answer");
    }

    #[test]
    fn url_keeps_path_prefix() {
        let client = ApiClient::new("https://example.com/chat", Timeouts::default()).unwrap();
        assert_eq!(client.url_for(Endpoint::Answer), "https://example.com/chat/answer");
    }
}
