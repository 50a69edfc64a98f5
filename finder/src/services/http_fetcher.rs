//! Real page fetcher backed by reqwest

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::error::{FinderError, FinderResult};
use crate::traits::PageFetcher;

/// HTTP fetcher sending browser-like headers
pub struct RealPageFetcher {
    client: reqwest::Client,
}

impl RealPageFetcher {
    pub fn new(http: &HttpConfig) -> FinderResult<Self> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&http.accept_language)
            .map_err(|_| FinderError::config("http.accept_language"))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| FinderError::config(format!("http client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for RealPageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FinderResult<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(url, status));
        }

        response.text().await.map_err(|e| FinderError::TransientNetwork {
            url: url.to_string(),
            message: format!("reading body: {e}"),
        })
    }
}

/// 5xx and 429 are worth retrying; any other failure status is not
pub fn classify_status(url: &str, status: StatusCode) -> FinderError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        FinderError::TransientNetwork {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        }
    } else {
        FinderError::HttpStatus { url: url.to_string(), status: status.as_u16() }
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> FinderError {
    if error.is_builder() {
        return FinderError::config(format!("invalid request for {url}: {error}"));
    }
    let message = if error.is_timeout() {
        "timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };
    FinderError::TransientNetwork { url: url.to_string(), message }
}
