//! `-J FILE|-` bypass mode: feed a local NDJSON source
//! directly through the same demultiplexer/parser/filter/dispatch chain a
//! live HTTP fetch uses, skipping the transport and backend entirely.

use dnsdbq_types::{Encap, QueryParams, SafCond, parse_record};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::demux::LineDemux;
use crate::filter;
use crate::query::{FetchReport, SafState};
use crate::writer::Writer;

/// Drain `reader` to EOF, demuxing/parsing/filtering/dispatching exactly as
/// [`crate::query::run_query`] does for one HTTP fetch.
pub async fn run_json_input<R: AsyncRead + Unpin>(
    mut reader: R,
    encap: Encap,
    params: &QueryParams,
    writer: &mut Writer,
) -> Result<FetchReport, std::io::Error> {
    let mut demux = LineDemux::new();
    let mut saf_state = if encap == Encap::Saf { Some(SafState::Init) } else { None };
    let mut saf_msg = None;
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        for line in demux.push(&buf[..n]) {
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

            if let Err(e) = writer.dispatch(tuple).await {
                tracing::error!("writer dispatch failed: {e}");
            }
        }
    }

    if let Some(state) = saf_state
    && !state.is_terminal()
    {
        saf_state = Some(SafState::Missing);
    }

    Ok(FetchReport { saf_state, saf_msg,..FetchReport::default() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsdbq_present::{OutputFormat, Presenter, TimeFormat};
    use dnsdbq_types::Verb;

    #[tokio::test]
    async fn drains_cof_lines_from_a_byte_slice() {
        let input: &[u8] = b"{\"rrname\":\"a.\",\"rrtype\":\"A\",\"rdata\":\"1.1.1.1\"}\n";
        let presenter = Presenter::new(OutputFormat::Json { datefix: false }, TimeFormat::Unix, Verb::Lookup, dnsdbq_types::QueryMode::RrsetByName);
        let mut writer = Writer::new(presenter, -1, None).unwrap();
        let report = run_json_input(input, Encap::Cof, &QueryParams::default(), &mut writer)
        .await
        .unwrap();
        assert!(report.saf_state.is_none());
        assert_eq!(writer.accepted_count(), 1);
    }

    #[tokio::test]
    async fn saf_without_terminal_cond_ends_missing() {
        let input: &[u8] =
        b"{\"cond\":\"begin\"}\n{\"cond\":\"ongoing\",\"obj\":{\"rrname\":\"a.\",\"rrtype\":\"A\",\"rdata\":\"1.1.1.1\"}}\n";
        let presenter = Presenter::new(OutputFormat::Text, TimeFormat::Unix, Verb::Lookup, dnsdbq_types::QueryMode::RrsetByName);
        let mut writer = Writer::new(presenter, -1, None).unwrap();
        let report = run_json_input(input, Encap::Saf, &QueryParams::default(), &mut writer)
        .await
        .unwrap();
        assert_eq!(report.saf_state, Some(SafState::Missing));
    }
}

