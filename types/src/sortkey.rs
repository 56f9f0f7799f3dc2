/// One of the six fields the writer/sort stage prefixes onto a record before
/// handing it to the external `sort`:
/// `first last (last-first) count rrname rdata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    First,
    Last,
    Duration,
    Count,
    Name,
    Data,
}

impl SortKey {
    /// 1-based column position in the six-field sort prefix.
    #[must_use]
    pub fn column(self) -> u32 {
        match self {
            Self::First => 1,
            Self::Last => 2,
            Self::Duration => 3,
            Self::Count => 4,
            Self::Name => 5,
            Self::Data => 6,
        }
    }

    /// Total number of whitespace-separated prefix columns written before
    /// the original JSON line.
    pub const PREFIX_COLUMNS: usize = 6;

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            "duration" => Some(Self::Duration),
            "count" => Some(Self::Count),
            "name" => Some(Self::Name),
            "data" => Some(Self::Data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        assert_eq!(SortKey::parse("count"), Some(SortKey::Count));
        assert_eq!(SortKey::parse("bogus"), None);
    }

    #[test]
    fn columns_are_distinct_and_ordered() {
        let cols: Vec<u32> = [
            SortKey::First,
            SortKey::Last,
            SortKey::Duration,
            SortKey::Count,
            SortKey::Name,
            SortKey::Data,
        ]
        .iter()
        .map(|k| k.column())
        .collect();
        assert_eq!(cols, vec![1, 2, 3, 4, 5, 6]);
    }
}

