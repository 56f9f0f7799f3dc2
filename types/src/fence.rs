/// Four absolute-second time bounds derived from `(after, before, complete)`.
///
/// `0` means "unset" in every field, matching the wire convention used by
/// `QueryParams::after`/`before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fence {
    pub first_after: u64,
    pub first_before: u64,
    pub last_after: u64,
    pub last_before: u64,
}

impl Fence {
    /// Decompose `(after, before, complete)` into the four fence fields.
    #[must_use]
    pub fn decompose(after: u64, before: u64, complete: bool) -> Self {
        match (after > 0, before > 0, complete) {
            (false, false, _) => Self::default(),
            (true, false, true) => Self {
                first_after: after,
                ..Self::default()
            },
            (true, false, false) => Self {
                last_after: after,
                ..Self::default()
            },
            (false, true, true) => Self {
                last_before: before,
                ..Self::default()
            },
            (false, true, false) => Self {
                first_before: before,
                ..Self::default()
            },
            (true, true, true) => Self {
                first_after: after,
                last_before: before,
                ..Self::default()
            },
            (true, true, false) => Self {
                last_after: after,
                first_before: before,
                ..Self::default()
            },
        }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_when_unset() {
        assert!(Fence::decompose(0, 0, false).is_unset());
        assert!(Fence::decompose(0, 0, true).is_unset());
    }

    #[test]
    fn after_only_complete_sets_first_after() {
        let f = Fence::decompose(100, 0, true);
        assert_eq!(f, Fence { first_after: 100,..Fence::default() });
    }

    #[test]
    fn after_only_incomplete_sets_last_after() {
        let f = Fence::decompose(100, 0, false);
        assert_eq!(f, Fence { last_after: 100,..Fence::default() });
    }

    #[test]
    fn before_only_complete_sets_last_before() {
        let f = Fence::decompose(0, 200, true);
        assert_eq!(f, Fence { last_before: 200,..Fence::default() });
    }

    #[test]
    fn before_only_incomplete_sets_first_before() {
        let f = Fence::decompose(0, 200, false);
        assert_eq!(f, Fence { first_before: 200,..Fence::default() });
    }

    #[test]
    fn both_complete_sets_first_after_and_last_before() {
        let f = Fence::decompose(100, 200, true);
        assert_eq!(
            f,
            Fence {
                first_after: 100,
                last_before: 200,
                ..Fence::default()
            }
        );
    }

    #[test]
    fn both_incomplete_unifies_into_one_fetch() {
        let f = Fence::decompose(100, 200, false);
        assert_eq!(
            f,
            Fence {
                last_after: 100,
                first_before: 200,
                ..Fence::default()
            }
        );
    }
}

