//! Resource fetchers.
//!
//! Each fetcher issues one GET, checks the body against the registered
//! schema for its (resource, variant), and returns the typed payload. A
//! non-2xx status surfaces as a transport error; a 2xx body that fails its
//! schema surfaces as the resource's response error. Fetchers never retry.

pub mod blogs;
pub mod certifications;
pub mod experiences;
pub mod projects;
pub mod search;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, ErrorReason, ResourceDomain, ResponseError};
use crate::i18n::Language;
use crate::schema::{self, narrow, Variant};

/// The schema a response must match and the error it produces otherwise.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Expected {
    pub domain: ResourceDomain,
    pub variant: Variant,
    pub reason: ErrorReason,
}

impl Expected {
    pub(crate) const fn new(domain: ResourceDomain, variant: Variant, reason: ErrorReason) -> Self {
        Self {
            domain,
            variant,
            reason,
        }
    }

    fn error(&self, endpoint: &str) -> ApiError {
        ResponseError::new(self.domain, self.reason, endpoint).into()
    }
}

pub(crate) async fn get_validated<T: DeserializeOwned>(
    client: &ApiClient,
    endpoint: &str,
    params: &[(&str, String)],
    expected: Expected,
) -> Result<T, ApiError> {
    let Some(data) = client.get(endpoint, params).await? else {
        warn!(
            "{} {} payload from {} is not JSON",
            expected.domain, expected.variant, endpoint
        );
        return Err(expected.error(endpoint));
    };

    if !schema::validate(expected.domain, expected.variant, &data) {
        warn!(
            "{} {} payload from {} failed validation",
            expected.domain, expected.variant, endpoint
        );
        return Err(expected.error(endpoint));
    }

    debug!("Validated {} {} payload from {}", expected.domain, expected.variant, endpoint);
    narrow(data).ok_or_else(|| expected.error(endpoint))
}

pub(crate) fn lang_param(lang: Language) -> (&'static str, String) {
    ("lang", lang.code().to_string())
}

/// `lang`, plus `limit` when one was given.
pub(crate) fn lang_and_limit(lang: Language, limit: Option<u32>) -> Vec<(&'static str, String)> {
    let mut params = vec![lang_param(lang)];
    if let Some(limit) = limit {
        params.push(("limit", limit.to_string()));
    }
    params
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use wiremock::MockServer;

    use crate::client::ApiClient;

    pub fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("mock server URI is valid")
    }
}
