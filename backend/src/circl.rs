use dnsdbq_types::{Encap, QueryMode, QueryParams, Verb};

use crate::{AuthSpec, Backend, BackendError, Status, UrlRequest, append_common_params, is_sevenbit_clean};

const DEFAULT_SERVER: &str = "https://www.circl.lu/pdns/query";
const SWCLIENT: &str = "dnsdbq-rs";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// COF-only backend: accepts only the "lookup" verb, only three bare RESTful
/// prefixes, and rejects any qualifier (rrtype, bailiwick, prefix length) it
/// cannot encode as a plain path segment.
#[derive(Debug, Clone)]
pub struct CirclBackend {
    api_key: Option<String>,
    server: String,
}

impl Default for CirclBackend {
    fn default() -> Self {
        Self {
            api_key: None,
            server: DEFAULT_SERVER.to_string(),
        }
    }
}

impl Backend for CirclBackend {
    fn encap(&self) -> Encap {
        Encap::Cof
    }

    fn url(&self, req: &UrlRequest<'_>) -> Option<url::Url> {
        if req.is_meta_query {
            return None;
        }

        let d = req.descriptor;
        if d.mode().is_raw() {
            return None;
        }
        if req.rrtype.is_some() || d.bailiwick().is_some() || d.prefix_length().is_some() {
            return None;
        }

        let thing = d.thing();
        if thing.contains('/') || !is_sevenbit_clean(thing) {
            return None;
        }

        let prefix = match d.mode() {
            QueryMode::RrsetByName => "rrset/name",
            QueryMode::RdataByName => "rdata/name",
            QueryMode::RdataByIp => "rdata/ip",
            QueryMode::RawRrset | QueryMode::RawName => unreachable!("rejected above"),
        };

        let raw = format!("{}/{prefix}/{thing}", self.server.trim_end_matches('/'));
        let mut url = url::Url::parse(&raw).ok()?;
        append_common_params(&mut url, req.params, SWCLIENT, VERSION);
        Some(url)
    }

    fn auth(&self) -> AuthSpec {
        match &self.api_key {
            Some(key) => AuthSpec::Basic {
                user: key.clone(),
                password: String::new(),
            },
            None => AuthSpec::None,
        }
    }

    fn status(&self, http_code: u16) -> Status {
        // COF: any non-2xx is an error except 404, which means "no records".
        if (200..300).contains(&http_code) || http_code == 404 {
            Status::NoError
        } else {
            Status::Error
        }
    }

    fn verb_ok(&self, verb: Verb, _params: &QueryParams) -> Result<(), BackendError> {
        match verb {
            Verb::Lookup => Ok(()),
            Verb::Summarize => Err(BackendError::VerbRejected(
                    "this backend supports only the lookup verb".to_string(),
            )),
        }
    }

    fn setval(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        match key {
            "apikey" => {
                self.api_key = Some(value.to_string());
                Ok(())
            }
            "server" => {
                self.server = value.to_string();
                Ok(())
            }
            other => Err(BackendError::UnknownKey(other.to_string())),
        }
    }

    fn ready(&self) -> Result<(), BackendError> {
        Ok(())
    }

    fn max_rrtypes(&self) -> usize {
        0
    }
}
