//! Command-line surface: every flag is a
//! `clap` field; the five query-mode flags are mutually exclusive.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "dnsdbq", version, about = "Query a passive DNS service for DNS observations")]
pub struct Cli {
    /// rrset-by-name lookup: NAME[/RRTYPE[/BAILIWICK]]
    #[arg(short = 'r', long = "rrset", value_name = "NAME[/TYPE[/BAILIWICK]]", group = "mode")]
    pub rrset_name: Option<String>,

    /// rdata-by-name lookup: NAME[/RRTYPE]
    #[arg(short = 'n', long = "rdata-name", value_name = "NAME[/TYPE]", group = "mode")]
    pub rdata_name: Option<String>,

    /// rdata-by-ip lookup: ADDR[/PFXLEN]
    #[arg(short = 'i', long = "rdata-ip", value_name = "ADDR[/PFXLEN]", group = "mode")]
    pub rdata_ip: Option<String>,

    /// raw hex-encoded rdata-name lookup: HEX[/RRTYPE]
    #[arg(short = 'N', long = "raw-name", value_name = "HEX[/TYPE]", group = "mode")]
    pub raw_name: Option<String>,

    /// raw hex-encoded rrset lookup: HEX[/RRTYPE[/BAILIWICK]]
    #[arg(short = 'R', long = "raw-rrset", value_name = "HEX[/TYPE[/BAILIWICK]]", group = "mode")]
    pub raw_rrset: Option<String>,

    /// Only return observations first seen at or after this time (epoch seconds).
    #[arg(short = 'A', long = "after", value_name = "EPOCH")]
    pub after: Option<u64>,

    /// Only return observations last seen at or before this time (epoch seconds).
    #[arg(short = 'B', long = "before", value_name = "EPOCH")]
    pub before: Option<u64>,

    /// Require strict time containment within the `-A`/`-B` fence.
    #[arg(short = 'c', long = "complete")]
    pub complete: bool,

    /// Server-side result cap.
    #[arg(short = 'l', long = "query-limit", value_name = "N")]
    pub query_limit: Option<i64>,

    /// Client-side output cap.
    #[arg(short = 'L', long = "output-limit", value_name = "N")]
    pub output_limit: Option<i64>,

    /// Server-side `max_count` passthrough.
    #[arg(short = 'M', long = "max-count", value_name = "N")]
    pub max_count: Option<i64>,

    /// Server-side result offset.
    #[arg(short = 'O', long = "offset", value_name = "N")]
    pub offset: Option<i64>,

    /// Request non-aggregated ("gravel") results.
    #[arg(short = 'g', long = "gravel")]
    pub gravel: bool,

    /// Read batch query lines from FILE (`-` for stdin); disables the single-shot query flags.
    #[arg(short = 'b', long = "batch", value_name = "FILE", conflicts_with = "mode")]
    pub batch_file: Option<String>,

    /// Batch framing: pass once for terse (`--`), twice for verbose (`++`/`--`).
    #[arg(short = 'f', action = clap::ArgAction::Count)]
    pub framing: u8,

    /// Merge every batch query into one shared writer/output channel.
    #[arg(short = 'm', long = "multiple")]
    pub multiple: bool,

    /// Output presentation: text, json, csv, or minimal.
    #[arg(short = 'p', long = "presentation", value_name = "FORMAT", default_value = "text")]
    pub presentation: String,

    /// Alias for `-p json`.
    #[arg(short = 'j')]
    pub json_alias: bool,

    /// Rewrite integer timestamps to ISO-8601 in JSON output.
    #[arg(long = "datefix")]
    pub datefix: bool,

    /// Sort output ascending; requires `-k`.
    #[arg(short = 's', long = "sort", conflicts_with = "sort_descending")]
    pub sort_ascending: bool,

    /// Sort output descending; requires `-k`.
    #[arg(short = 'S', long = "sort-desc")]
    pub sort_descending: bool,

    /// Sort key(s) for `-s`/`-S` (comma-separated).
    #[arg(short = 'k', long = "key", value_name = "KEY[,KEY...]")]
    pub sort_keys: Option<String>,

    /// Verb: lookup or summarize.
    #[arg(short = 'V', long = "verb", value_name = "lookup|summarize", default_value = "lookup")]
    pub verb: String,

    /// Select a named backend (overrides config/environment).
    #[arg(short = 'u', long = "backend", value_name = "NAME")]
    pub backend: Option<String>,

    /// Disable 7-bit-clean enforcement on subjects destined for a URL path segment.
    #[arg(short = '8', long = "eight-bit-clean")]
    pub eight_bit_clean: bool,

    /// Read NDJSON records from FILE (`-` for stdin) instead of issuing HTTP fetches.
    #[arg(short = 'J', long = "json-input", value_name = "FILE")]
    pub json_input: Option<String>,

    /// Force IPv4.
    #[arg(short = '4')]
    pub ipv4_only: bool,

    /// Force IPv6.
    #[arg(short = '6', conflicts_with = "ipv4_only")]
    pub ipv6_only: bool,

    /// Disable TLS certificate verification.
    #[arg(short = 'U', long = "insecure")]
    pub insecure: bool,

    /// Suppress non-error logging.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Path to the config file (overrides `DNSDBQ_CONFIG_FILE` and the default).
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<String>,
}

/// One of the five mutually exclusive query shapes, still holding its raw
/// (possibly slash-qualified) CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlag {
    RrsetName,
    RdataName,
    RdataIp,
    RawName,
    RawRrset,
}

impl Cli {
    /// The single-shot query mode/argument pair, if one was given.
    #[must_use]
    pub fn mode_arg(&self) -> Option<(ModeFlag, &str)> {
        if let Some(v) = &self.rrset_name {
            return Some((ModeFlag::RrsetName, v));
        }
        if let Some(v) = &self.rdata_name {
            return Some((ModeFlag::RdataName, v));
        }
        if let Some(v) = &self.rdata_ip {
            return Some((ModeFlag::RdataIp, v));
        }
        if let Some(v) = &self.raw_name {
            return Some((ModeFlag::RawName, v));
        }
        if let Some(v) = &self.raw_rrset {
            return Some((ModeFlag::RawRrset, v));
        }
        None
    }
}

