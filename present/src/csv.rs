use dnsdbq_types::Tuple;

use crate::timefmt::TimeFormat;

const HEADER: &str = "\"time_first\",\"time_last\",\"count\",\"bailiwick\",\"rrname\",\"rrtype\",\"rdata\"";

#[must_use]
pub fn header() -> &'static str {
    HEADER
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One CSV line per rdatum, timestamps quoted in the per-invocation time
/// format.
#[must_use]
pub fn render(tuple: &Tuple, time_format: TimeFormat) -> String {
    let first = quote(&time_format.render(tuple.time_first));
    let last = quote(&time_format.render(tuple.time_last));
    let count = tuple.count.map(|c| c.to_string()).unwrap_or_default();
    let bailiwick = quote(tuple.bailiwick.as_deref().unwrap_or(""));
    let rrname = quote(&tuple.rrname);
    let rrtype = quote(&tuple.rrtype);

    let mut lines = String::new();
    let values: Vec<&str> = tuple
    .rdata
    .as_ref()
    .map(|r| r.iter().collect())
    .unwrap_or_default();
    let values = if values.is_empty() { vec![""] } else { values };

    for value in values {
        lines.push_str(&format!(
                "{first},{last},{count},{bailiwick},{rrname},{rrtype},{}\n",
                quote(value)
        ));
    }
    lines
}
