use chrono::{DateTime, Utc};

/// Per-invocation timestamp rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `YYYY-MM-DD HH:MM:SS` UTC.
    Unix,
    /// `YYYY-MM-DDTHH:MM:SSZ` (`DNSDB_TIME_FORMAT=iso`).
    Iso8601,
}

impl TimeFormat {
    #[must_use]
    pub fn render(self, epoch_secs: u64) -> String {
        let dt = DateTime::<Utc>::from_timestamp(epoch_secs as i64, 0).unwrap_or_default();
        match self {
            Self::Unix => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Iso8601 => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_unix_style() {
        assert_eq!(TimeFormat::Unix.render(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn renders_iso8601_style() {
        assert_eq!(TimeFormat::Iso8601.render(0), "1970-01-01T00:00:00Z");
    }
}

