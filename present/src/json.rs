use serde_json::Value;

use dnsdbq_types::Tuple;

/// ASN/CIDR enrichment for the `dnsdbq_rdata` annotation. The default no-op
/// keeps JSON presentation fully functional without it.
pub trait AsnEnricher: Send {
    fn annotate(&self, rdata: &str) -> Option<Value>;
}

pub struct NoopEnricher;

impl AsnEnricher for NoopEnricher {
    fn annotate(&self, _rdata: &str) -> Option<Value> {
        None
    }
}

const TIME_FIELDS: &[&str] = &["time_first", "time_last", "zone_time_first", "zone_time_last"];

/// Rewrite integer timestamp fields to ISO-8601 strings in place.
fn datefix(value: &mut Value) {
    let Value::Object(map) = value else { return };
    for field in TIME_FIELDS {
        if let Some(Value::Number(n)) = map.get(*field)
        && let Some(secs) = n.as_u64()
        {
            let iso = crate::timefmt::TimeFormat::Iso8601.render(secs);
            map.insert((*field).to_string(), Value::String(iso));
        }
    }
}

/// Emit the raw JSON line, optionally datefixed and/or annotated with
/// `dnsdbq_rdata` enrichment.
#[must_use]
pub fn render(
    tuple: &Tuple,
    apply_datefix: bool,
    enricher: Option<&dyn AsnEnricher>,
) -> String {
    if !apply_datefix && enricher.is_none() {
        return format!("{}\n", tuple.raw_json);
    }

    let Ok(mut value) = serde_json::from_str::<Value>(&tuple.raw_json) else {
        return format!("{}\n", tuple.raw_json);
    };

    if apply_datefix {
        datefix(&mut value);
    }

    if let Some(enricher) = enricher
    && let Some(rdata) = &tuple.rdata
    && let Value::Object(map) = &mut value
    {
        let annotations: Vec<Value> = rdata.iter().filter_map(|r| enricher.annotate(r)).collect();
        if !annotations.is_empty() {
            map.insert("dnsdbq_rdata".to_string(), Value::Array(annotations));
        }
    }

    format!("{value}\n")
}
