use dnsdbq_types::{SortKey, Tuple};

/// Prefix a record with its six whitespace-separated sort keys
/// (`first last duration count rrname rdata`) followed by the original JSON
/// line.
#[must_use]
pub fn sort_prefixed_line(tuple: &Tuple) -> String {
    let duration = tuple.time_last.saturating_sub(tuple.time_first);
    let count = tuple.count.unwrap_or(0);
    let rdata = tuple
    .rdata
    .as_ref()
    .map(|r| r.iter().collect::<Vec<_>>().join(","))
    .unwrap_or_default();
    let rdata = if rdata.is_empty() { "-".to_string() } else { rdata };
    let rrname = if tuple.rrname.is_empty() {
        "-".to_string()
    } else {
        tuple.rrname.clone()
    };

    format!(
        "{} {} {} {} {} {} {}",
        tuple.time_first, tuple.time_last, duration, count, rrname, rdata, tuple.raw_json
    )
}

/// Strip the leading `SortKey::PREFIX_COLUMNS` whitespace-separated fields a
/// sorted line carries and return the original JSON suffix.
#[must_use]
pub fn strip_prefix(line: &str) -> Option<&str> {
    let mut rest = line;
    for _ in 0..SortKey::PREFIX_COLUMNS {
        let trimmed = rest.trim_start();
        let space = trimmed.find(char::is_whitespace)?;
        rest = &trimmed[space..];
    }
    Some(rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsdbq_types::Rdata;

    fn sample() -> Tuple {
        Tuple {
            rrname: "www.example.com.".to_string(),
            rrtype: "A".to_string(),
            rdata: Some(Rdata::Single("192.0.2.1".to_string())),
            count: Some(5),
            time_first: 100,
            time_last: 200,
            raw_json: r#"{"rrname":"www.example.com."}"#.to_string(),
            ..Tuple::default()
        }
    }

    #[test]
    fn round_trips_prefix_and_strip() {
        let line = sort_prefixed_line(&sample());
        assert_eq!(strip_prefix(&line).unwrap(), r#"{"rrname":"www.example.com."}"#);
    }

    #[test]
    fn prefix_has_six_columns_before_json() {
        let line = sort_prefixed_line(&sample());
        let cols: Vec<&str> = line.splitn(7, ' ').collect();
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0], "100");
        assert_eq!(cols[1], "200");
        assert_eq!(cols[2], "100");
        assert_eq!(cols[3], "5");
        assert_eq!(cols[4], "www.example.com.");
        assert_eq!(cols[5], "192.0.2.1");
    }

    #[test]
    fn handles_json_containing_internal_whitespace() {
        let mut t = sample();
        t.raw_json = r#"{"rrname":"x.", "msg":"hello world"}"#.to_string();
        let line = sort_prefixed_line(&t);
        assert_eq!(
            strip_prefix(&line).unwrap(),
            r#"{"rrname":"x.", "msg":"hello world"}"#
        );
    }
}

