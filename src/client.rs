//! HTTP transport for the content API.
//!
//! One GET per call, query parameters serialized by reqwest, no retries at
//! this level. Any non-2xx status is a transport error whatever the body
//! says; a 2xx body is handed to the validators as untyped JSON, and a 2xx
//! body that is not JSON at all fails validation rather than transport.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::TransportError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry a path: {}", base_url);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path (e.g. `/v1/projects/my-slug`) against the
    /// base URL. Existing percent escapes are kept; other characters that
    /// cannot appear in a path are encoded.
    pub fn url_for(&self, endpoint: &str) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        url.set_path(&path);
        url
    }

    /// GET `endpoint` with `params` and return the JSON body, or `None` when
    /// a 2xx body does not parse as JSON. That case is left to the caller's
    /// validation, since the request itself succeeded.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<Value>, TransportError> {
        let url = self.url_for(endpoint);
        debug!("GET {} {:?}", endpoint, params);

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", endpoint, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(endpoint, e))?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!("GET {} returned a body that is not JSON: {}", endpoint, e);
                Ok(None)
            }
        }
    }
}
