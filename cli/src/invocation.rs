//! Translates parsed CLI flags into the domain types the engine/present
//! crates consume: a [`QueryDescriptor`], a [`QueryParams`], an
//! [`OutputFormat`], and an optional [`SortSpec`].

use anyhow::{Context, Result, bail};
use dnsdbq_present::{OutputFormat, TimeFormat};
use dnsdbq_sort::SortSpec;
use dnsdbq_types::{QueryDescriptor, QueryMode, QueryParams, SortKey, Verb};

use crate::args::{Cli, ModeFlag};

/// Split a CLI single-shot argument on `/` into `(subject, rrtype, bailiwick)`.
fn split_slash_qualified(raw: &str) -> (&str, Option<&str>, Option<&str>) {
    let mut parts = raw.splitn(3, '/');
    let subject = parts.next().unwrap_or_default();
    let rrtype = parts.next();
    let bailiwick = parts.next();
    (subject, rrtype, bailiwick)
}

/// Build the [`QueryDescriptor`] for the single-shot (non-batch) path.
pub fn build_descriptor(flag: ModeFlag, raw: &str) -> Result<QueryDescriptor> {
    let (subject, second, third) = split_slash_qualified(raw);

    let descriptor = match flag {
        ModeFlag::RrsetName => {
            let mut d = QueryDescriptor::new(QueryMode::RrsetByName, subject)?;
            if let Some(rrtype) = second {
                d = d.with_rrtype(rrtype);
            }
            if let Some(bw) = third {
                d = d.with_bailiwick(bw);
            }
            d
        }
        ModeFlag::RawRrset => {
            let mut d = QueryDescriptor::new(QueryMode::RawRrset, subject)?;
            if let Some(rrtype) = second {
                d = d.with_rrtype(rrtype);
            }
            if let Some(bw) = third {
                d = d.with_bailiwick(bw);
            }
            d
        }
        ModeFlag::RdataName => {
            let mut d = QueryDescriptor::new(QueryMode::RdataByName, subject)?;
            if let Some(rrtype) = second {
                d = d.with_rrtype(rrtype);
            }
            d
        }
        ModeFlag::RawName => {
            let mut d = QueryDescriptor::new(QueryMode::RawName, subject)?;
            if let Some(rrtype) = second {
                d = d.with_rrtype(rrtype);
            }
            d
        }
        ModeFlag::RdataIp => {
            let mut d = QueryDescriptor::new(QueryMode::RdataByIp, subject)?;
            if let Some(pfx) = second {
                let pfx: u8 = pfx.parse().with_context(|| format!("invalid prefix length {pfx:?}"))?;
                d = d.with_prefix_length(pfx)?;
            }
            d
        }
    };

    Ok(descriptor)
}

pub fn build_params(cli: &Cli) -> Result<QueryParams> {
    let params = QueryParams {
        after: cli.after.unwrap_or(0),
        before: cli.before.unwrap_or(0),
        query_limit: cli.query_limit.unwrap_or(-1),
        output_limit: cli.output_limit.unwrap_or(-1),
        offset: cli.offset.unwrap_or(-1),
        max_count: cli.max_count.unwrap_or(-1),
        complete: cli.complete,
        gravel: cli.gravel,
    };
    params.validate()?;
    Ok(params)
}

pub fn build_verb(cli: &Cli) -> Result<Verb> {
    match cli.verb.as_str() {
        "lookup" => Ok(Verb::Lookup),
        "summarize" => Ok(Verb::Summarize),
        other => bail!("unknown verb {other:?}, expected lookup or summarize"),
    }
}

pub fn build_output_format(cli: &Cli) -> Result<OutputFormat> {
    let name = if cli.json_alias { "json" } else { cli.presentation.as_str() };
    match name {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json { datefix: cli.datefix }),
        "csv" => Ok(OutputFormat::Csv),
        "minimal" => Ok(OutputFormat::Minimal),
        other => bail!("unknown presentation format {other:?}, expected text, json, csv, or minimal"),
    }
}

pub fn build_time_format() -> TimeFormat {
    match std::env::var("DNSDB_TIME_FORMAT") {
        Ok(v) if v.eq_ignore_ascii_case("iso") => TimeFormat::Iso8601,
        _ => TimeFormat::Unix,
    }
}

fn parse_sort_keys(raw: &str) -> Result<Vec<SortKey>> {
    raw.split(',')
    .map(|s| SortKey::parse(s).with_context(|| format!("unknown sort key {s:?}")))
    .collect()
}

/// Build the writer's sort stage configuration from `-s`/`-S` plus `-k`, if given.
pub fn build_sort_spec(cli: &Cli) -> Result<Option<SortSpec>> {
    if !cli.sort_ascending && !cli.sort_descending {
        return Ok(None);
    }
    let raw = cli.sort_keys.as_deref().context("-s/-S requires -k KEY[,KEY...]")?;
    let keys = parse_sort_keys(raw)?;
    Ok(Some(SortSpec::new(keys, cli.sort_descending)))
}
