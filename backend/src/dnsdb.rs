use dnsdbq_types::{Encap, QueryMode, QueryParams, Verb};

use crate::{
    AuthSpec, Backend, BackendError, Status, UrlRequest, append_common_params,
    append_fence_params, is_sevenbit_clean,
};

const DEFAULT_SERVER: &str = "https://api.dnsdb.info";
const SWCLIENT: &str = "dnsdbq-rs";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SAF-capable backend (DNSDB v2 API shape).
///
/// Its URL includes a `/v2` suffix when the encapsulation is SAF and the
/// configured server does not already contain it.
#[derive(Debug, Clone)]
pub struct DnsdbBackend {
    api_key: Option<String>,
    server: String,
    eight_bit_clean: bool,
}

impl Default for DnsdbBackend {
    fn default() -> Self {
        Self {
            api_key: None,
            server: DEFAULT_SERVER.to_string(),
            eight_bit_clean: false,
        }
    }
}

impl DnsdbBackend {
    fn base_url(&self) -> String {
        if self.server.contains("/v2") {
            self.server.trim_end_matches('/').to_string()
        } else {
            format!("{}/dnsdb/v2", self.server.trim_end_matches('/'))
        }
    }

    fn path_for(&self, req: &UrlRequest<'_>) -> Option<String> {
        let d = req.descriptor;
        let thing = d.thing();
        if !self.eight_bit_clean && !is_sevenbit_clean(thing) {
            return None;
        }

        let mut segments = match d.mode() {
            QueryMode::RrsetByName => vec!["rrset".to_string(), "name".to_string(), thing.to_string()],
            QueryMode::RawRrset => vec!["rrset".to_string(), "raw".to_string(), thing.to_string()],
            QueryMode::RdataByName => vec!["rdata".to_string(), "name".to_string(), thing.to_string()],
            QueryMode::RawName => vec!["rdata".to_string(), "raw".to_string(), thing.to_string()],
            QueryMode::RdataByIp => {
                let mut subject = thing.to_string();
                if let Some(pfx) = d.prefix_length() {
                    subject = format!("{subject},{pfx}");
                }
                vec!["rdata".to_string(), "ip".to_string(), subject]
            }
        };

        if let Some(rrtype) = req.rrtype {
            segments.push(rrtype.to_string());
            if d.mode().is_rrset()
            && let Some(bw) = d.bailiwick()
            {
                segments.push(bw.to_string());
            }
        } else if d.mode().is_rrset()
        && let Some(bw) = d.bailiwick()
        {
            segments.push("ANY".to_string());
            segments.push(bw.to_string());
        }

        Some(segments.join("/"))
    }
}

impl Backend for DnsdbBackend {
    fn encap(&self) -> Encap {
        Encap::Saf
    }

    fn url(&self, req: &UrlRequest<'_>) -> Option<url::Url> {
        let path = self.path_for(req)?;
        let verb = if req.is_meta_query {
            "rate_limit"
        } else {
            req.verb.url_segment()
        };
        let raw = format!("{}/{verb}/{path}", self.base_url());
        let mut url = url::Url::parse(&raw).ok()?;
        append_common_params(&mut url, req.params, SWCLIENT, VERSION);
        append_fence_params(&mut url, req.fence);
        Some(url)
    }

    fn auth(&self) -> AuthSpec {
        match &self.api_key {
            Some(key) => AuthSpec::Header {
                name: "X-Api-Key".to_string(),
                value: key.clone(),
            },
            None => AuthSpec::None,
        }
    }

    fn status(&self, http_code: u16) -> Status {
        // SAF encapsulation: a 404 means the endpoint itself was not found,
        // never "empty COF result" (that case arrives as a normal SAF
        // `succeeded` terminal line with zero records).
        if (200..300).contains(&http_code) {
            Status::NoError
        } else {
            Status::Error
        }
    }

    fn verb_ok(&self, _verb: Verb, _params: &QueryParams) -> Result<(), BackendError> {
        Ok(())
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
            "eight_bit_clean" => {
                self.eight_bit_clean = value == "1" || value.eq_ignore_ascii_case("true");
                Ok(())
            }
            other => Err(BackendError::UnknownKey(other.to_string())),
        }
    }

    fn ready(&self) -> Result<(), BackendError> {
        if self.api_key.is_none() {
            return Err(BackendError::NotReady("missing apikey".to_string()));
        }
        Ok(())
    }

    fn info_url(&self) -> Option<url::Url> {
        let raw = format!("{}/rate_limit", self.base_url());
        url::Url::parse(&raw).ok()
    }

    fn format_info(&self, body: &[u8]) -> String {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => format!("rate limit info: {value}"),
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        }
    }

    fn max_rrtypes(&self) -> usize {
        8
    }
}
