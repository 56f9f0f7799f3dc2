use std::fmt::Write as _;

use dnsdbq_types::{SafCond, Tuple, Verb};

use crate::timefmt::TimeFormat;

/// dig-style banner + one line per rdatum, blank line between tuples.
pub fn render(tuple: &Tuple, verb: Verb, time_format: TimeFormat) -> String {
    let mut out = String::new();

    if let Some(bw) = &tuple.bailiwick {
        let _ = writeln!(out, ";; bailiwick: {bw}");
    }
    if tuple.time_first > 0 || tuple.time_last > 0 {
        let _ = writeln!(
            out,
            ";; record times: {}.. {}",
            time_format.render(tuple.time_first),
            time_format.render(tuple.time_last)
        );
    }
    if tuple.zone_first > 0 || tuple.zone_last > 0 {
        let _ = writeln!(
            out,
            ";; zone times: {}.. {}",
            time_format.render(tuple.zone_first),
            time_format.render(tuple.zone_last)
        );
    }
    if let Some(count) = tuple.count {
        let _ = writeln!(out, ";; count: {count}");
    }
    if let Some(num_results) = tuple.num_results {
        let _ = writeln!(out, ";; num_results: {num_results}");
    }
    if let Some(msg) = &tuple.msg
    && matches!(&tuple.cond, Some(SafCond::Limited | SafCond::Failed))
    {
        let _ = writeln!(out, ";; {msg}");
    }

    // Summarize has no per-record rdata lines: the banner above is the
    // entire presentation for that verb.
    if verb == Verb::Summarize {
        out.push('\n');
        return out;
    }

    if let Some(rdata) = &tuple.rdata {
        for value in rdata.iter() {
            let _ = writeln!(out, "{}\t{}\t{}", tuple.rrname, tuple.rrtype, value);
        }
    }
    out.push('\n');
    out
}
