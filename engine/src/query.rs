//! Query engine: fence decomposition, rrtype fan-out, the SAF state machine,
//! receive-side filtering, and dispatch to the writer.

use std::rc::Rc;

use dnsdbq_backend::{AuthSpec, Backend, BackendError, Status, UrlRequest};
use dnsdbq_types::{DescriptorError, Encap, ParamsError, QueryDescriptor, QueryParams, SafCond, Verb, parse_record};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use crate::demux::LineDemux;
use crate::filter;
use crate::transport;
use crate::writer::Writer;

/// Shared across every `Fetch` a `Query` fans out to; dispatch is
/// serialized through the lock one record at a time, matching this crate's
/// single-threaded cooperative scheduling model.
pub type SharedWriter = Rc<AsyncMutex<Writer>>;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("backend could not construct a URL for this query")]
    UrlConstruction,
}

/// Per-`Fetch` SAF lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafState {
    Init,
    Begin,
    Ongoing,
    Succeeded,
    Limited,
    Failed,
    /// A SAF fetch that never reached a terminal condition before EOF.
    Missing,
}

impl SafState {
    /// Applies one record's `cond` to the current state. Returns whether the
    /// record itself should continue into filter/dispatch. `Limited`/`Failed`
    /// carry a `msg` worth presenting, so those are kept; an unrecognized
    /// `cond` latches the stream to `Missing` and is dropped.
    pub(crate) fn advance(self, cond: SafCond) -> (Self, bool) {
        match cond {
            SafCond::Begin => (Self::Begin, false),
            SafCond::Ongoing => (Self::Ongoing, true),
            SafCond::Succeeded => (Self::Succeeded, false),
            SafCond::Limited => (Self::Limited, true),
            SafCond::Failed => (Self::Failed, true),
            SafCond::Unrecognized(_) => (Self::Missing, false),
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Limited | Self::Failed | Self::Missing)
    }
}

/// Outcome of one `Fetch` after its stream has been fully consumed.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub saf_state: Option<SafState>,
    /// The `msg` carried by the terminal (or last-seen) SAF record, if any.
    pub saf_msg: Option<String>,
    pub http_error_message: Option<String>,
    pub transport_error: bool,
}

impl FetchReport {
    /// Higher is worse; used to pick the "most severe outcome" across a
    /// query's fetches for its terminal status/message.
    #[must_use]
    pub fn severity(&self) -> u8 {
        if self.transport_error {
            return 5;
        }
        if self.http_error_message.is_some() {
            return 4;
        }
        match self.saf_state {
            Some(SafState::Failed) => 3,
            Some(SafState::Limited) => 2,
            Some(SafState::Missing) => 1,
            _ => 0,
        }
    }

    #[must_use]
    pub fn exit_code_nonzero(&self) -> bool {
        self.transport_error
        || matches!(self.saf_state, Some(SafState::Failed) | Some(SafState::Limited))
    }

    #[must_use]
    pub fn message(&self) -> Option<String> {
        if let Some(body) = &self.http_error_message {
            return Some(body.clone());
        }
        if self.saf_msg.is_some() {
            return self.saf_msg.clone();
        }
        match self.saf_state {
            Some(SafState::Failed) => Some("failed".to_string()),
            Some(SafState::Limited) => Some("limited".to_string()),
            Some(SafState::Missing) => Some("missing".to_string()),
            _ => None,
        }
    }
}

/// The Query's terminal outcome, aggregated across every Fetch.
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    pub status: Option<String>,
    pub message: Option<String>,
    pub exit_code_nonzero: bool,
}

async fn run_fetch(
    client: &reqwest::Client,
    encap: Encap,
    url: url::Url,
    auth: AuthSpec,
    status_of: impl Fn(u16) -> Status,
    params: &QueryParams,
    writer: &SharedWriter,
    quiet: bool,
) -> FetchReport {
    let response = match transport::send_request(client, url, &auth).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("transport error: {e}");
            return FetchReport { transport_error: true,..FetchReport::default() };
        }
    };

    let http_code = response.status().as_u16();
    if status_of(http_code) == Status::Error {
        let body = response.text().await.unwrap_or_default();
        if !quiet {
            tracing::warn!("HTTP {http_code}: {body}");
        }
        return FetchReport { http_error_message: Some(body),..FetchReport::default() };
    }

    let mut demux = LineDemux::new();
    let mut saf_state = if encap == Encap::Saf { Some(SafState::Init) } else { None };
    let mut saf_msg = None;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("transport error mid-stream: {e}");
                return FetchReport { transport_error: true, saf_state, saf_msg,..FetchReport::default() };
            }
        };

        for line in demux.push(&chunk) {
            let tuple = match parse_record(&line, encap) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("record parse error: {e}");
                    continue;
                }
            };

            if let Some(cond) = tuple.cond.clone() {
                if let SafCond::Unrecognized(ref raw) = cond {
                    tracing::warn!("unrecognized SAF cond {raw:?}; treating stream as missing");
                }
                if tuple.msg.is_some() {
                    saf_msg = tuple.msg.clone();
                }
                let (next, keep_record) = saf_state.unwrap_or(SafState::Init).advance(cond);
                saf_state = Some(next);
                if !keep_record || tuple.is_saf_keepalive() {
                    continue;
                }
            } else if tuple.is_saf_keepalive() {
                continue;
            }

            if !filter::keep(&tuple, params) {
                continue;
            }

            let mut w = writer.lock().await;
            if let Err(e) = w.dispatch(tuple).await {
                tracing::error!("writer dispatch failed: {e}");
            }
        }
    }

    if let Some(state) = saf_state
    && !state.is_terminal()
    {
        saf_state = Some(SafState::Missing);
    }

    FetchReport { saf_state, saf_msg,..FetchReport::default() }
}

/// Run one abstract query: validate params, fan out by rrtype, fetch each
/// URL concurrently, and dispatch every surviving record to `writer`.
pub async fn run_query(
    client: &reqwest::Client,
    backend: &dyn Backend,
    descriptor: &QueryDescriptor,
    params: &QueryParams,
    verb: Verb,
    writer: &SharedWriter,
    quiet: bool,
) -> Result<QueryOutcome, QueryError> {
    params.validate()?;
    backend.verb_ok(verb, params)?;

    let fence = params.fence();
    let rrtypes = descriptor.rrtypes(backend.max_rrtypes())?;
    let fetch_rrtypes: Vec<Option<String>> = if rrtypes.is_empty() {
        vec![descriptor.raw_rrtype().map(str::to_string)]
    } else {
        rrtypes.into_iter().map(Some).collect()
    };

    let encap = backend.encap();
    let auth = backend.auth();
    let mut futures = Vec::with_capacity(fetch_rrtypes.len());

    for rrtype in &fetch_rrtypes {
        let req = UrlRequest {
            descriptor,
            rrtype: rrtype.as_deref(),
            params,
            fence,
            verb,
            is_meta_query: false,
        };
        let url = backend.url(&req).ok_or(QueryError::UrlConstruction)?;
        let status_of = {
            // `status` takes `&self`; capture by reference via a small
            // closure so each fetch future can call it independently.
            move |code: u16| backend.status(code)
        };
        futures.push(run_fetch(client, encap, url, auth.clone(), status_of, params, writer, quiet));
    }

    let reports = futures_util::future::join_all(futures).await;

    let worst = reports.iter().max_by_key(|r| r.severity());
    let outcome = match worst {
        Some(report) if report.severity() > 0 => QueryOutcome {
            status: Some(if report.exit_code_nonzero() { "error".to_string() } else { "noerror".to_string() }),
            message: report.message(),
            exit_code_nonzero: report.exit_code_nonzero(),
        },
        _ => QueryOutcome { status: Some("noerror".to_string()), message: None, exit_code_nonzero: false },
    };

    Ok(outcome)
}
