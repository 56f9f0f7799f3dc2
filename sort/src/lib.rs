//! Writer/sort stage: an external `sort -n -u` child used as a blocking
//! deduplication/ordering filter.
//!
//! The sort cannot emit anything until it sees EOF on stdin, so the engine
//! writes every accepted record to the child's stdin without risk of
//! deadlock, closes stdin once every [`Fetch`](dnsdbq_types) on the query
//! has finished, then drains stdout line by line.

mod child;
mod prefix;

pub use child::{SortChild, SortError};
pub use prefix::{sort_prefixed_line, strip_prefix};

use dnsdbq_types::SortKey;

/// How the writer's sort stage is configured (`-s`/`-S`/`-k`).
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
    pub descending: bool,
}

impl SortSpec {
    #[must_use]
    pub fn new(keys: Vec<SortKey>, descending: bool) -> Self {
        Self { keys, descending }
    }

    /// Build the `sort` argv: `-n -u` plus one `-kN,N` per requested key,
    /// plus `-r` if descending.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let mut args = vec!["-n".to_string(), "-u".to_string()];
        for key in &self.keys {
            let col = key.column();
            args.push(format!("-k{col},{col}"));
        }
        if self.descending {
            args.push("-r".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_has_numeric_unique_flags_first() {
        let spec = SortSpec::new(vec![SortKey::Count], false);
        assert_eq!(spec.argv(), vec!["-n", "-u", "-k4,4"]);
    }

    #[test]
    fn descending_appends_r_flag() {
        let spec = SortSpec::new(vec![SortKey::First], true);
        assert_eq!(spec.argv(), vec!["-n", "-u", "-k1,1", "-r"]);
    }

    #[test]
    fn multiple_keys_each_get_a_column() {
        let spec = SortSpec::new(vec![SortKey::First, SortKey::Count], false);
        assert_eq!(spec.argv(), vec!["-n", "-u", "-k1,1", "-k4,4"]);
    }
}

