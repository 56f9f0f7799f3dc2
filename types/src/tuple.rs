use serde_json::Value;

use crate::error::RecordParseError;

/// Wire encapsulation of an NDJSON stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encap {
    /// "Common Output Format": the JSON object IS the record.
    Cof,
    /// "Streaming API Framing": the record is wrapped in `{cond,msg,obj}`.
    Saf,
}

/// SAF per-line lifecycle condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SafCond {
    Begin,
    Ongoing,
    Succeeded,
    Limited,
    Failed,
    /// A `cond` value the wire format doesn't define. Carried rather than
    /// rejected so the state machine can still latch to `Missing`.
    Unrecognized(String),
}

impl SafCond {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "begin" => Self::Begin,
            "ongoing" => Self::Ongoing,
            "succeeded" => Self::Succeeded,
            "limited" => Self::Limited,
            "failed" => Self::Failed,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Limited | Self::Failed)
    }
}

/// The right-hand side of a record: one value, or (for `-g`/gravel-style
/// aggregated multi-value answers) several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rdata {
    Single(String),
    Multi(Vec<String>),
}

impl Rdata {
    #[must_use]
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Single(s) => Box::new(std::iter::once(s.as_str())),
            Self::Multi(v) => Box::new(v.iter().map(String::as_str)),
        }
    }
}

/// One parsed record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tuple {
    pub rrname: String,
    pub rrtype: String,
    pub rdata: Option<Rdata>,
    pub bailiwick: Option<String>,
    pub count: Option<i64>,
    pub num_results: Option<i64>,
    pub time_first: u64,
    pub time_last: u64,
    pub zone_first: u64,
    pub zone_last: u64,
    pub cond: Option<SafCond>,
    pub msg: Option<String>,
    /// The original JSON line, kept so the writer/sort stage can re-emit it
    /// verbatim after the sort round-trip.
    pub raw_json: String,
}

impl Default for Rdata {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

fn as_u64_field(obj: &serde_json::Map<String, Value>, field: &'static str) -> Result<u64, RecordParseError> {
    match obj.get(field) {
        None => Ok(0),
        Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
        .as_u64()
        .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
        .ok_or(RecordParseError::WrongType {
                field,
                expected: "integer",
        }),
        Some(_) => Err(RecordParseError::WrongType {
                field,
                expected: "integer",
        }),
    }
}

fn as_i64_field(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Option<i64>, RecordParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or(RecordParseError::WrongType {
                field,
                expected: "integer",
        }),
        Some(_) => Err(RecordParseError::WrongType {
                field,
                expected: "integer",
        }),
    }
}

fn as_string_field(
    obj: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, RecordParseError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(RecordParseError::WrongType {
                field,
                expected: "string",
        }),
    }
}

fn as_rdata_field(obj: &serde_json::Map<String, Value>) -> Result<Option<Rdata>, RecordParseError> {
    match obj.get("rdata") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(Rdata::Single(s.clone()))),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    _ => {
                        return Err(RecordParseError::WrongType {
                                field: "rdata",
                                expected: "string or array of strings",
                        });
                    }
                }
            }
            Ok(Some(Rdata::Multi(out)))
        }
        Some(_) => Err(RecordParseError::WrongType {
                field: "rdata",
                expected: "string or array of strings",
        }),
    }
}

fn parse_cof_payload(obj: &serde_json::Map<String, Value>, raw_json: &str) -> Result<Tuple, RecordParseError> {
    let rrname = as_string_field(obj, "rrname")?.ok_or(RecordParseError::MissingField("rrname"))?;
    let rrtype = as_string_field(obj, "rrtype")?.ok_or(RecordParseError::MissingField("rrtype"))?;

    Ok(Tuple {
            rrname,
            rrtype,
            rdata: as_rdata_field(obj)?,
            bailiwick: as_string_field(obj, "bailiwick")?,
            count: as_i64_field(obj, "count")?,
            num_results: as_i64_field(obj, "num_results")?,
            time_first: as_u64_field(obj, "time_first")?,
            time_last: as_u64_field(obj, "time_last")?,
            zone_first: as_u64_field(obj, "zone_time_first")?,
            zone_last: as_u64_field(obj, "zone_time_last")?,
            cond: None,
            msg: None,
            raw_json: raw_json.to_string(),
    })
}

/// Parse one complete JSON line into a [`Tuple`].
///
/// For [`Encap::Cof`] the object IS the COF payload. For [`Encap::Saf`] the
/// object's `cond`/`msg` are extracted and the COF payload is the nested
/// `obj` (which may be absent for a pure keepalive/terminal line).
pub fn parse_record(line: &str, encap: Encap) -> Result<Tuple, RecordParseError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| RecordParseError::Json(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(RecordParseError::Json("top-level value is not an object".to_string()));
    };

    match encap {
        Encap::Cof => parse_cof_payload(&obj, line),
        Encap::Saf => {
            let cond = as_string_field(&obj, "cond")?.map(|s| SafCond::parse(&s));
            let msg = as_string_field(&obj, "msg")?;

            let nested = match obj.get("obj") {
                None | Some(Value::Null) => None,
                Some(Value::Object(nested)) => Some(nested.clone()),
                Some(_) => {
                    return Err(RecordParseError::WrongType {
                            field: "obj",
                            expected: "object",
                    });
                }
            };

            // The presentable record is the nested COF payload, not the outer
            // SAF envelope: `raw_json` tracks whatever the presenter and the
            // sort round-trip should see.
            let mut tuple = match nested {
                Some(ref nested) if !nested.is_empty() => {
                    let payload_json = Value::Object(nested.clone()).to_string();
                    parse_cof_payload(nested, &payload_json)?
                }
                _ => Tuple {
                    raw_json: line.to_string(),
                    ..Tuple::default()
                },
            };
            tuple.cond = cond;
            tuple.msg = msg;
            Ok(tuple)
        }
    }
}

impl Tuple {
    /// A SAF keepalive: no meaningful payload and no terminal condition.
    #[must_use]
    pub fn is_saf_keepalive(&self) -> bool {
        self.cond.is_none() && self.rrname.is_empty() && self.rrtype.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cof_line() {
        let line = r#"{"rrname":"www.example.com.","rrtype":"A","rdata":"192.0.2.1","count":5,"time_first":1000,"time_last":2000}"#;
        let t = parse_record(line, Encap::Cof).unwrap();
        assert_eq!(t.rrname, "www.example.com.");
        assert_eq!(t.count, Some(5));
        assert_eq!(t.rdata, Some(Rdata::Single("192.0.2.1".to_string())));
    }

    #[test]
    fn parses_cof_multivalue_rdata() {
        let line = r#"{"rrname":"example.com.","rrtype":"NS","rdata":["a.iana-servers.net.","b.iana-servers.net."]}"#;
        let t = parse_record(line, Encap::Cof).unwrap();
        assert_eq!(t.rdata.unwrap().iter().count(), 2);
    }

    #[test]
    fn rejects_wrong_type_count() {
        let line = r#"{"rrname":"x.","rrtype":"A","count":"five"}"#;
        assert_eq!(
            parse_record(line, Encap::Cof),
            Err(RecordParseError::WrongType {
                field: "count",
                expected: "integer"
            })
        );
    }

    #[test]
    fn parses_saf_begin_with_no_obj() {
        let line = r#"{"cond":"begin"}"#;
        let t = parse_record(line, Encap::Saf).unwrap();
        assert_eq!(t.cond, Some(SafCond::Begin));
        assert!(t.is_saf_keepalive());
    }

    #[test]
    fn parses_saf_ongoing_with_nested_obj() {
        let line = r#"{"cond":"ongoing","obj":{"rrname":"x.","rrtype":"A","rdata":"1.2.3.4"}}"#;
        let t = parse_record(line, Encap::Saf).unwrap();
        assert_eq!(t.cond, Some(SafCond::Ongoing));
        assert_eq!(t.rrname, "x.");
        assert!(!t.is_saf_keepalive());
    }

    #[test]
    fn parses_saf_limited_with_message() {
        let line = r#"{"cond":"limited","msg":"result limit reached"}"#;
        let t = parse_record(line, Encap::Saf).unwrap();
        assert_eq!(t.cond, Some(SafCond::Limited));
        assert_eq!(t.msg.as_deref(), Some("result limit reached"));
    }

    #[test]
    fn unrecognized_cond_parses_as_an_opaque_value() {
        let line = r#"{"cond":"mystery"}"#;
        let t = parse_record(line, Encap::Saf).unwrap();
        assert_eq!(t.cond, Some(SafCond::Unrecognized("mystery".to_string())));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            parse_record("{not json", Encap::Cof),
            Err(RecordParseError::Json(_))
        ));
    }
}

