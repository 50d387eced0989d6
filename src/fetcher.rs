use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

use crate::config::ScraperConfig;
use crate::models::{HttpMethod, RawResponse, SourceDescriptor};
use crate::utils::error::{AppError, Result};

/// Performs the request a source describes and hands back the raw body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<RawResponse>;
}

pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            timeout_secs: config.request_timeout,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<RawResponse> {
        let start_time = Instant::now();

        let mut request = self
            .client
            .request(source.method.into(), source.endpoint.clone());
        for (name, value) in &source.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let (HttpMethod::Post, Some(form)) = (source.method, &source.form) {
            request = request.form(form);
        }

        let response = request.send().await.map_err(|e| self.map_error(source, e))?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.map_err(|e| self.map_error(source, e))?;

        tracing::debug!(
            "Fetched {} ({} bytes, status {}) in {}ms",
            source.name,
            body.len(),
            status,
            start_time.elapsed().as_millis()
        );

        Ok(RawResponse::new(status, url, body))
    }
}

impl HttpFetcher {
    fn map_error(&self, source: &SourceDescriptor, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout {
                url: source.endpoint.to_string(),
                seconds: self.timeout_secs,
            }
        } else {
            AppError::Http(err)
        }
    }
}
