//! Batch driver: reads query lines, reparses `$options` lines, launches a
//! query per line, and frames the output.

use std::rc::Rc;

use dnsdbq_backend::Backend;
use dnsdbq_sort::SortError;
use dnsdbq_types::{DescriptorError, QueryDescriptor, QueryMode, QueryParams, Verb};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

use crate::query::{QueryError, SharedWriter, run_query};
use crate::writer::Writer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    None,
    Terse,
    Verbose,
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("malformed batch line: {0}")]
    Malformed(String),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error(transparent)]
    Sort(#[from] SortError),
}

/// Parse one `rrset/name/NAME[/RRTYPE[/BAILIWICK]]`-shaped line into a descriptor.
pub fn parse_batch_query_line(line: &str) -> Result<QueryDescriptor, BatchError> {
    let parts: Vec<&str> = line.split('/').collect();
    if parts.len() < 3 {
        return Err(BatchError::Malformed(line.to_string()));
    }

    let mode = match (parts[0], parts[1]) {
        ("rrset", "name") => QueryMode::RrsetByName,
        ("rrset", "raw") => QueryMode::RawRrset,
        ("rdata", "name") => QueryMode::RdataByName,
        ("rdata", "raw") => QueryMode::RawName,
        ("rdata", "ip") => QueryMode::RdataByIp,
        _ => return Err(BatchError::Malformed(line.to_string())),
    };

    let rest = &parts[2..];
    let subject = rest.first().ok_or_else(|| BatchError::Malformed(line.to_string()))?;
    let mut descriptor = QueryDescriptor::new(mode, *subject)?;

    match mode {
        QueryMode::RdataByIp => {
            if let Some(pfx) = rest.get(1) {
                let pfx: u8 = pfx.parse().map_err(|_| BatchError::Malformed(line.to_string()))?;
                descriptor = descriptor.with_prefix_length(pfx)?;
            }
        }
        QueryMode::RrsetByName | QueryMode::RawRrset => {
            if let Some(rrtype) = rest.get(1) {
                descriptor = descriptor.with_rrtype(*rrtype);
            }
            if let Some(bailiwick) = rest.get(2) {
                descriptor = descriptor.with_bailiwick(*bailiwick);
            }
        }
        QueryMode::RdataByName | QueryMode::RawName => {
            if let Some(rrtype) = rest.get(1) {
                descriptor = descriptor.with_rrtype(*rrtype);
            }
        }
    }

    Ok(descriptor)
}

fn next_i64(tokens: &[&str], i: &mut usize) -> Result<i64, BatchError> {
    let value = tokens.get(*i + 1).ok_or_else(|| BatchError::Malformed(format!("{} missing argument", tokens[*i])))?;
    let parsed = value.parse().map_err(|_| BatchError::Malformed(format!("{} is not an integer", value)))?;
    *i += 2;
    Ok(parsed)
}

fn next_u64(tokens: &[&str], i: &mut usize) -> Result<u64, BatchError> {
    let value = tokens.get(*i + 1).ok_or_else(|| BatchError::Malformed(format!("{} missing argument", tokens[*i])))?;
    let parsed = value.parse().map_err(|_| BatchError::Malformed(format!("{} is not an integer", value)))?;
    *i += 2;
    Ok(parsed)
}

/// Reparse an `$options` line's trailing tokens against a fresh copy of the
/// command-line baseline.
pub fn parse_options_line(
    tokens: &[&str],
    baseline_params: QueryParams,
    baseline_verb: Verb,
) -> Result<(QueryParams, Verb), BatchError> {
    let mut params = baseline_params;
    let mut verb = baseline_verb;
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-l" => params.query_limit = next_i64(tokens, &mut i)?,
            "-L" => params.output_limit = next_i64(tokens, &mut i)?,
            "-M" => params.max_count = next_i64(tokens, &mut i)?,
            "-O" => params.offset = next_i64(tokens, &mut i)?,
            "-A" => params.after = next_u64(tokens, &mut i)?,
            "-B" => params.before = next_u64(tokens, &mut i)?,
            "-c" => {
                params.complete = true;
                i += 1;
            }
            "-V" => {
                let value = tokens.get(i + 1).ok_or_else(|| BatchError::Malformed("-V missing argument".to_string()))?;
                verb = match *value {
                    "lookup" => Verb::Lookup,
                    "summarize" => Verb::Summarize,
                    other => return Err(BatchError::Malformed(format!("unknown verb {other}"))),
                };
                i += 2;
            }
            other => return Err(BatchError::Malformed(format!("unrecognized $options flag {other}"))),
        }
    }

    Ok((params, verb))
}

/// Drive one pass over batch input lines. `make_writer` is called once when
/// `multiple` is set (one shared Writer for the whole batch) or once per
/// query line otherwise.
///
/// Returns whether any line ended in error (drives the process exit code).
pub async fn run_batch(
    lines: impl IntoIterator<Item = String>,
    client: &reqwest::Client,
    backend: &dyn Backend,
    baseline_params: QueryParams,
    baseline_verb: Verb,
    framing: Framing,
    multiple: bool,
    mut make_writer: impl FnMut() -> Result<Writer, SortError>,
    quiet: bool,
) -> Result<bool, BatchError> {
    let mut any_error = false;
    let mut params = baseline_params;
    let mut verb = baseline_verb;

    let shared: Option<SharedWriter> = if multiple {
        Some(Rc::new(AsyncMutex::new(make_writer()?)))
    } else {
        None
    };

    for raw_line in lines {
        let line = raw_line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("$options") {
            let tokens: Vec<&str> = rest.split_whitespace().collect();
            if tokens.is_empty() {
                params = baseline_params;
                verb = baseline_verb;
            } else {
                match parse_options_line(&tokens, baseline_params, baseline_verb) {
                    Ok((p, v)) => {
                        params = p;
                        verb = v;
                    }
                    Err(e) => {
                        tracing::warn!("batch $options error: {e}");
                        any_error = true;
                    }
                }
            }
            continue;
        }

        let descriptor = match parse_batch_query_line(line) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("batch line error: {e}");
                any_error = true;
                continue;
            }
        };

        if framing == Framing::Verbose {
            println!("++ {line}");
        }

        let writer: SharedWriter = match &shared {
            Some(w) => Rc::clone(w),
            None => Rc::new(AsyncMutex::new(make_writer()?)),
        };

        let outcome = run_query(client, backend, &descriptor, &params, verb, &writer, quiet).await;
        match &outcome {
            Ok(o) => {
                if o.exit_code_nonzero {
                    any_error = true;
                }
                if framing == Framing::Verbose {
                    println!(
                        "-- {} ({})",
                        o.status.clone().unwrap_or_default(),
                        o.message.clone().unwrap_or_default()
                    );
                }
            }
            Err(e) => {
                tracing::warn!("query error: {e}");
                any_error = true;
            }
        }

        if shared.is_none()
        && let Ok(w) = Rc::try_unwrap(writer)
        {
            w.into_inner().finish().await?;
        }

        if framing == Framing::Terse {
            println!("--");
        }
    }

    if let Some(w) = shared
    && let Ok(w) = Rc::try_unwrap(w)
    {
        w.into_inner().finish().await?;
    }

    Ok(any_error)
}

impl From<QueryError> for BatchError {
    fn from(e: QueryError) -> Self {
        BatchError::Malformed(e.to_string())
    }
}
