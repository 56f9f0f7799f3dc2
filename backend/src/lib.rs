//! Backend adapters: each implementation abstracts one pDNS service's
//! URL/auth/status shape.

mod circl;
mod dnsdb;

pub use circl::CirclBackend;
pub use dnsdb::DnsdbBackend;

use dnsdbq_types::{Encap, Fence, QueryDescriptor, QueryParams, Verb};
use thiserror::Error;

/// HTTP-status/encapsulation verdict a backend maps a completed fetch onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NoError,
    Error,
}

/// How to attach credentials to an outgoing request.
///
/// Kept IO-free here; the HTTP transport (in `dnsdbq-engine`) is the one
/// piece that actually calls into `reqwest`, so this crate has no
/// dependency on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSpec {
    Header { name: String, value: String },
    Basic { user: String, password: String },
    None,
}

/// Everything a backend needs to compose a URL for one fetch.
#[derive(Debug, Clone, Copy)]
pub struct UrlRequest<'a> {
    pub descriptor: &'a QueryDescriptor,
    /// One element of the descriptor's (possibly comma-separated) rrtype
    /// list, already fanned out by the engine.
    pub rrtype: Option<&'a str>,
    pub params: &'a QueryParams,
    pub fence: Fence,
    pub verb: Verb,
    /// True for the degenerate info/rate-limit request.
    pub is_meta_query: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("verb/parameter combination rejected: {0}")]
    VerbRejected(String),
    #[error("configuration key {0:?} is not recognized by this backend")]
    UnknownKey(String),
    #[error("backend not ready: {0}")]
    NotReady(String),
    #[error("URL could not be constructed for this query")]
    UrlConstruction,
}

/// Abstracts one pDNS service.
pub trait Backend: Send + Sync {
    /// `cof` or `saf`.
    fn encap(&self) -> Encap;

    /// Compose the absolute URL for one fetch, or `None` on unrecoverable
    /// error (e.g. a qualifier this backend cannot encode).
    fn url(&self, req: &UrlRequest<'_>) -> Option<url::Url>;

    /// Install credentials for the fetch built from `self.url(..)`.
    fn auth(&self) -> AuthSpec;

    /// Map an HTTP status code (plus whether this line was SAF-encapsulated)
    /// to a two-valued verdict. SAF-encapsulated 404 is "error"; COF 404 is
    /// "noerror" (means empty result).
    fn status(&self, http_code: u16) -> Status;

    /// Reject verb/parameter combinations this backend does not support.
    fn verb_ok(&self, verb: Verb, params: &QueryParams) -> Result<(), BackendError>;

    /// Receive a configuration key/value pair (apikey, server,...).
    fn setval(&mut self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Final readiness check after all configuration has been applied.
    fn ready(&self) -> Result<(), BackendError>;

    /// Optional "info" (rate-limit) request URL; `None` if unsupported.
    fn info_url(&self) -> Option<url::Url> {
        None
    }

    /// Format the raw body of an `info` response into a human summary.
    fn format_info(&self, _body: &[u8]) -> String {
        "info endpoint not supported by this backend".to_string()
    }

    /// Per-backend maximum rrtype fan-out width.
    fn max_rrtypes(&self) -> usize {
        8
    }
}

/// Resolve a backend by its `-u NAME` selector.
#[must_use]
pub fn by_name(name: &str) -> Option<Box<dyn Backend>> {
    match name {
        "dnsdb" | "dnsdb2" => Some(Box::new(DnsdbBackend::default())),
        "circl" => Some(Box::new(CirclBackend::default())),
        _ => None,
    }
}

pub(crate) fn is_sevenbit_clean(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii())
}

pub(crate) fn append_fence_params(url: &mut url::Url, fence: Fence) {
    let mut pairs = url.query_pairs_mut();
    if fence.first_after > 0 {
        pairs.append_pair("time_first_after", &fence.first_after.to_string());
    }
    if fence.first_before > 0 {
        pairs.append_pair("time_first_before", &fence.first_before.to_string());
    }
    if fence.last_after > 0 {
        pairs.append_pair("time_last_after", &fence.last_after.to_string());
    }
    if fence.last_before > 0 {
        pairs.append_pair("time_last_before", &fence.last_before.to_string());
    }
}

pub(crate) fn append_common_params(url: &mut url::Url, params: &QueryParams, swclient: &str, version: &str) {
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("swclient", swclient);
        pairs.append_pair("version", version);
        if params.has_query_limit() {
            pairs.append_pair("limit", &params.query_limit.to_string());
        }
        if params.has_offset() {
            pairs.append_pair("offset", &params.offset.to_string());
        }
        if params.has_max_count() {
            pairs.append_pair("max_count", &params.max_count.to_string());
        }
        if params.gravel {
            pairs.append_pair("aggr", "f");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sevenbit_clean_rejects_high_bytes() {
        assert!(is_sevenbit_clean("example.com"));
        assert!(!is_sevenbit_clean("exämple.com"));
    }
}

