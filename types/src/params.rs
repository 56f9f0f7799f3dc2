use crate::error::ParamsError;
use crate::fence::Fence;

/// Tunables common to all queries.
///
/// `-1` sentinels match the CLI surface's convention for "unset" on signed
/// limit fields; `after`/`before` use `0` for "unset" since they are
/// unsigned epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams {
    pub after: u64,
    pub before: u64,
    pub query_limit: i64,
    pub output_limit: i64,
    pub offset: i64,
    /// `-M`: server-side max-count passthrough.
    pub max_count: i64,
    pub complete: bool,
    pub gravel: bool,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            after: 0,
            before: 0,
            query_limit: -1,
            output_limit: -1,
            offset: -1,
            max_count: -1,
            complete: false,
            gravel: false,
        }
    }
}

impl QueryParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.complete
        && self.after > 0
        && self.before > 0
        && self.after > self.before
        {
            return Err(ParamsError::AfterNotBeforeBefore {
                after: self.after,
                before: self.before,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn fence(&self) -> Fence {
        Fence::decompose(self.after, self.before, self.complete)
    }

    #[must_use]
    pub fn has_query_limit(&self) -> bool {
        self.query_limit >= 0
    }

    #[must_use]
    pub fn has_output_limit(&self) -> bool {
        self.output_limit >= 0
    }

    #[must_use]
    pub fn has_offset(&self) -> bool {
        self.offset >= 0
    }

    #[must_use]
    pub fn has_max_count(&self) -> bool {
        self.max_count >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_unset_sentinels() {
        let p = QueryParams::default();
        assert!(!p.has_query_limit());
        assert!(!p.has_output_limit());
        assert!(!p.has_offset());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn complete_with_after_past_before_is_invalid() {
        let p = QueryParams {
            after: 200,
            before: 100,
            complete: true,
            ..QueryParams::default()
        };
        assert_eq!(
            p.validate(),
            Err(ParamsError::AfterNotBeforeBefore { after: 200, before: 100 })
        );
    }

    #[test]
    fn non_complete_does_not_enforce_ordering() {
        let p = QueryParams {
            after: 200,
            before: 100,
            complete: false,
            ..QueryParams::default()
        };
        assert!(p.validate().is_ok());
    }
}

