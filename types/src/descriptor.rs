use crate::error::DescriptorError;

/// Shape of the query subject: which RESTful family it belongs to.
///
/// Mirrors the five slash-qualified forms a batch line or CLI invocation can
/// take: `rrset/name`, `rrset/raw`, `rdata/name`, `rdata/raw`,
/// `rdata/ip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// `-r`: owner-name rrset lookup.
    RrsetByName,
    /// `-n`: rdata-name lookup.
    RdataByName,
    /// `-i`: rdata-IP lookup, optionally prefix-qualified.
    RdataByIp,
    /// `-R`: raw hex-encoded rrset lookup.
    RawRrset,
    /// `-N`: raw hex-encoded rdata-name lookup.
    RawName,
}

impl QueryMode {
    #[must_use]
    pub fn is_raw(self) -> bool {
        matches!(self, Self::RawRrset | Self::RawName)
    }

    #[must_use]
    pub fn is_rrset(self) -> bool {
        matches!(self, Self::RrsetByName | Self::RawRrset)
    }

    /// Whether the presenter's minimal mode treats this as an RHS-style query
    /// (emit owner names only) as opposed to an LHS-style query (emit rdata).
    #[must_use]
    pub fn is_rhs_style(self) -> bool {
        matches!(self, Self::RdataByName | Self::RdataByIp | Self::RawName)
    }
}

/// High-level operation: determines the URL suffix and the presenter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    #[default]
    Lookup,
    Summarize,
}

impl Verb {
    #[must_use]
    pub fn url_segment(self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Summarize => "summarize",
        }
    }
}

/// Rrtype families that participate in the `ANY-DNSSEC` mutual-exclusion
/// rule.
const DNSSEC_FAMILY: &[&str] = &[
    "DS", "RRSIG", "NSEC", "DNSKEY", "CDNSKEY", "CDS", "TA", "NSEC3", "NSEC3PARAM", "DLV",
];

/// An abstract query: immutable after construction, independent of any
/// particular backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    mode: QueryMode,
    thing: String,
    rrtype: Option<String>,
    bailiwick: Option<String>,
    prefix_length: Option<u8>,
}

impl QueryDescriptor {
    pub fn new(mode: QueryMode, thing: impl Into<String>) -> Result<Self, DescriptorError> {
        let thing = thing.into();
        if thing.is_empty() {
            return Err(DescriptorError::EmptySubject);
        }
        if mode.is_raw() && !thing.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DescriptorError::InvalidHex(thing));
        }
        Ok(Self {
            mode,
            thing,
            rrtype: None,
            bailiwick: None,
            prefix_length: None,
        })
    }

    #[must_use]
    pub fn with_rrtype(mut self, rrtype: impl Into<String>) -> Self {
        self.rrtype = Some(rrtype.into());
        self
    }

    #[must_use]
    pub fn with_bailiwick(mut self, bailiwick: impl Into<String>) -> Self {
        self.bailiwick = Some(bailiwick.into());
        self
    }

    pub fn with_prefix_length(mut self, len: u8) -> Result<Self, DescriptorError> {
        if len == 0 || len > 128 {
            return Err(DescriptorError::InvalidPrefixLength(len));
        }
        self.prefix_length = Some(len);
        Ok(self)
    }

    #[must_use]
    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    #[must_use]
    pub fn thing(&self) -> &str {
        &self.thing
    }

    #[must_use]
    pub fn bailiwick(&self) -> Option<&str> {
        self.bailiwick.as_deref()
    }

    #[must_use]
    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    #[must_use]
    pub fn raw_rrtype(&self) -> Option<&str> {
        self.rrtype.as_deref()
    }

    /// Split and validate the comma-separated rrtype list. `max` is the per-backend maximum entry count.
    pub fn rrtypes(&self, max: usize) -> Result<Vec<String>, DescriptorError> {
        let Some(raw) = &self.rrtype else {
            return Ok(Vec::new());
        };

        let entries: Vec<String> = raw.split(',').map(str::to_ascii_uppercase).collect();
        if entries.len() > max {
            return Err(DescriptorError::TooManyRrtypes { max });
        }

        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.clone()) {
                return Err(DescriptorError::DuplicateRrtype(entry.clone()));
            }
        }

        let has_any = seen.contains("ANY");
        let has_any_dnssec = seen.contains("ANY-DNSSEC");

        if has_any && entries.len() > 1 {
            return Err(DescriptorError::AnyMixedWithSpecific);
        }
        if has_any_dnssec {
            if let Some(dnssec) = entries
            .iter()
            .find(|e| e.as_str() != "ANY-DNSSEC" && DNSSEC_FAMILY.contains(&e.as_str()))
            {
                return Err(DescriptorError::AnyDnssecMixedWithSpecific(dnssec.clone()));
            }
        }

        Ok(entries)
    }

    /// Whether a fan-out across multiple [`Fetch`]es (one per rrtype) applies.
    #[must_use]
    pub fn is_multitype(&self) -> bool {
        self.rrtype
        .as_ref()
        .is_some_and(|r| r.contains(','))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_subject() {
        assert_eq!(
            QueryDescriptor::new(QueryMode::RrsetByName, ""),
            Err(DescriptorError::EmptySubject)
        );
    }

    #[test]
    fn rejects_non_hex_raw_subject() {
        assert_eq!(
            QueryDescriptor::new(QueryMode::RawName, "not-hex!"),
            Err(DescriptorError::InvalidHex("not-hex!".to_string()))
        );
    }

    #[test]
    fn accepts_hex_raw_subject() {
        assert!(QueryDescriptor::new(QueryMode::RawRrset, "0377777703636f6d00").is_ok());
    }

    #[test]
    fn splits_multitype_rrtypes() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("A,AAAA");
        assert_eq!(d.rrtypes(10).unwrap(), vec!["A", "AAAA"]);
        assert!(d.is_multitype());
    }

    #[test]
    fn rejects_duplicate_rrtypes() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("A,A");
        assert_eq!(
            d.rrtypes(10),
            Err(DescriptorError::DuplicateRrtype("A".to_string()))
        );
    }

    #[test]
    fn rejects_any_mixed_with_specific() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("ANY,A");
        assert_eq!(d.rrtypes(10), Err(DescriptorError::AnyMixedWithSpecific));
    }

    #[test]
    fn rejects_any_dnssec_mixed_with_dnssec_family() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("ANY-DNSSEC,DS");
        assert_eq!(
            d.rrtypes(10),
            Err(DescriptorError::AnyDnssecMixedWithSpecific("DS".to_string()))
        );
    }

    #[test]
    fn allows_any_dnssec_alone() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("ANY-DNSSEC");
        assert_eq!(d.rrtypes(10).unwrap(), vec!["ANY-DNSSEC"]);
    }

    #[test]
    fn rejects_over_max_rrtypes() {
        let d = QueryDescriptor::new(QueryMode::RrsetByName, "example.com")
        .unwrap()
        .with_rrtype("A,AAAA,MX");
        assert_eq!(d.rrtypes(2), Err(DescriptorError::TooManyRrtypes { max: 2 }));
    }
}

