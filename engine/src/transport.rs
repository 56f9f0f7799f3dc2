//! HTTP transport: builds the shared client and sends one fetch's request.
//! The concurrent multi-fetch scheduling itself lives in
//! [`crate::query`], one `tokio` task per [`dnsdbq_types::Fetch`] rather than
//! a hand-rolled multi-handle.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use dnsdbq_backend::AuthSpec;
use thiserror::Error;

/// Bounded connect time, unbounded read time by default so long-running
/// streamed fetches are not cut off mid-flight.
const CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// Per-process HTTP timeout override (`DNSDBQ_HTTP_TIMEOUT`).
    pub timeout_secs: Option<u64>,
    pub ipv4_only: bool,
    pub ipv6_only: bool,
    /// `-U`: disable SSL/TLS certificate verification.
    pub insecure: bool,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Build(reqwest::Error),
    #[error("request failed: {0}")]
    Request(reqwest::Error),
    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),
}

#[must_use]
pub fn build_client(config: &TransportConfig) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder()
    .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
    .danger_accept_invalid_certs(config.insecure);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if config.ipv4_only {
        builder = builder.local_address(Some(Ipv4Addr::UNSPECIFIED.into()));
    } else if config.ipv6_only {
        builder = builder.local_address(Some(Ipv6Addr::UNSPECIFIED.into()));
    }

    builder.build().map_err(TransportError::Build)
}

fn apply_auth(builder: reqwest::RequestBuilder, auth: &AuthSpec) -> reqwest::RequestBuilder {
    match auth {
        AuthSpec::Header { name, value } => builder.header(name.as_str(), value.as_str()),
        AuthSpec::Basic { user, password } => builder.basic_auth(user, Some(password)),
        AuthSpec::None => builder,
    }
}

/// Send one GET request for a single [`dnsdbq_types::Fetch`], installing the
/// backend's auth and the `Accept: application/json` header.
pub async fn send_request(
    client: &reqwest::Client,
    url: url::Url,
    auth: &AuthSpec,
) -> Result<reqwest::Response, TransportError> {
    let builder = client.get(url).header("Accept", "application/json");
    let builder = apply_auth(builder, auth);
    builder.send().await.map_err(TransportError::Request)
}
