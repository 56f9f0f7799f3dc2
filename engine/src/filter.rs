//! Receive-side time filtering.

use dnsdbq_types::{QueryParams, Tuple};

/// Prefer on-the-wire times; fall back to zone times when absent.
#[must_use]
pub fn effective_times(tuple: &Tuple) -> (u64, u64) {
    let first = if tuple.time_first > 0 { tuple.time_first } else { tuple.zone_first };
    let last = if tuple.time_last > 0 { tuple.time_last } else { tuple.zone_last };
    (first, last)
}

/// Whether a tuple survives the `after`/`before`/`complete` fence.
#[must_use]
pub fn keep(tuple: &Tuple, params: &QueryParams) -> bool {
    let (first, last) = effective_times(tuple);

    if params.after > 0 {
        let ok = if params.complete { first >= params.after } else { last >= params.after };
        if !ok {
            return false;
        }
    }
    if params.before > 0 {
        let ok = if params.complete { last <= params.before } else { first <= params.before };
        if !ok {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(first: u64, last: u64) -> Tuple {
        Tuple {
            time_first: first,
            time_last: last,
            ..Tuple::default()
        }
    }

    #[test]
    fn complete_rejects_tuple_starting_before_after() {
        let params = QueryParams { after: 100, complete: true,..QueryParams::default() };
        assert!(!keep(&tuple(50, 200), &params));
        assert!(keep(&tuple(100, 200), &params));
    }

    #[test]
    fn incomplete_uses_last_against_after() {
        let params = QueryParams { after: 100, complete: false,..QueryParams::default() };
        assert!(keep(&tuple(10, 150), &params));
        assert!(!keep(&tuple(10, 50), &params));
    }

    #[test]
    fn complete_rejects_tuple_ending_after_before() {
        let params = QueryParams { before: 200, complete: true,..QueryParams::default() };
        assert!(!keep(&tuple(50, 250), &params));
        assert!(keep(&tuple(50, 200), &params));
    }

    #[test]
    fn incomplete_uses_first_against_before() {
        let params = QueryParams { before: 200, complete: false,..QueryParams::default() };
        assert!(keep(&tuple(150, 300), &params));
        assert!(!keep(&tuple(250, 300), &params));
    }

    #[test]
    fn falls_back_to_zone_times_when_wire_times_absent() {
        let params = QueryParams { after: 100, complete: true,..QueryParams::default() };
        let mut t = tuple(0, 0);
        t.zone_first = 150;
        t.zone_last = 250;
        assert!(keep(&t, &params));
    }
}

