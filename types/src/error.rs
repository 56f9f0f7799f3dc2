use thiserror::Error;

/// Raised while validating a raw CLI/batch-line query shape into a [`crate::QueryDescriptor`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("empty query subject")]
    EmptySubject,
    #[error("raw-mode subject {0:?} is not valid hex")]
    InvalidHex(String),
    #[error("rrtype list exceeds backend maximum of {max} entries")]
    TooManyRrtypes { max: usize },
    #[error("rrtype list contains a duplicate entry {0:?}")]
    DuplicateRrtype(String),
    #[error("ANY cannot be combined with a specific rrtype")]
    AnyMixedWithSpecific,
    #[error("ANY-DNSSEC cannot be combined with DNSSEC-family rrtype {0:?}")]
    AnyDnssecMixedWithSpecific(String),
    #[error("prefix length {0} is out of range for an IP query")]
    InvalidPrefixLength(u8),
    #[error("subject {0:?} contains a qualifier this backend cannot encode")]
    UnsupportedQualifier(String),
    #[error("non-ASCII byte in subject {0:?}; pass the 8-bit-clean flag to allow it")]
    NonAscii(String),
}

/// Raised while validating a [`crate::QueryParams`] snapshot.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    #[error("`complete` time fencing requires after ({after}) <= before ({before})")]
    AfterNotBeforeBefore { after: u64, before: u64 },
}

/// A single NDJSON line (COF or SAF) failed to parse.
///
/// Never fatal to the enclosing stream: the caller logs this and keeps
/// reading subsequent lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("malformed JSON: {0}")]
    Json(String),
    #[error("field {field:?} has the wrong type (expected {expected})")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
}

