//! Writer / sort stage.
//!
//! Groups one or more queries into a single output channel, optionally piping
//! accepted records through an external `sort` child before presenting them.

use dnsdbq_present::Presenter;
use dnsdbq_sort::{SortChild, SortError, SortSpec, sort_prefixed_line, strip_prefix};
use dnsdbq_types::{Encap, Tuple, parse_record};

/// Owns the optional sort child, the presenter, and the output-limit counter
/// for one writer.
pub struct Writer {
    sort: Option<SortChild>,
    presenter: Presenter,
    output_limit: i64,
    accepted: i64,
}

impl Writer {
    pub fn new(presenter: Presenter, output_limit: i64, sort_spec: Option<SortSpec>) -> Result<Self, SortError> {
        let sort = match sort_spec {
            Some(spec) => Some(SortChild::spawn(&spec)?),
            None => None,
        };
        Ok(Self { sort, presenter, output_limit, accepted: 0 })
    }

    fn output_limit_reached(&self) -> bool {
        self.output_limit >= 0 && self.accepted >= self.output_limit
    }

    /// Accept one filtered tuple from the query engine. When sorting is enabled the outputLimit is enforced at
    /// [`Writer::finish`] instead, since the final rank is unknown until the
    /// whole set has been sorted.
    pub async fn dispatch(&mut self, tuple: Tuple) -> Result<(), SortError> {
        if let Some(sort) = &mut self.sort {
            return sort.feed_line(&sort_prefixed_line(&tuple)).await;
        }

        if self.output_limit_reached() {
            return Ok(());
        }
        self.accepted += 1;
        print!("{}", self.presenter.render(&tuple));
        Ok(())
    }

    /// Close the sort child's stdin (every `Fetch` on every `Query` this
    /// writer owns must have already finished), drain its sorted, deduped
    /// output, and redrive the presenter — enforcing `outputLimit` here when
    /// sorting.
    pub async fn finish(mut self) -> Result<(), SortError> {
        let Some(mut sort) = self.sort.take() else { return Ok(()) };
        sort.close_input();

        loop {
            let Some(line) = sort.drain_line().await? else { break };

            if self.output_limit_reached() {
                // Stop the child once to avoid SIGPIPE, then keep consuming
                // its remaining output so it can exit cleanly.
                sort.terminate_once();
                continue;
            }

            let Some(json) = strip_prefix(&line) else {
                tracing::warn!("sorted line missing the expected six-column prefix");
                continue;
            };

            match parse_record(json, Encap::Cof) {
                Ok(tuple) => {
                    self.accepted += 1;
                    print!("{}", self.presenter.render(&tuple));
                }
                Err(e) => tracing::warn!("failed to reparse sorted record: {e}"),
            }
        }

        sort.wait().await?;
        Ok(())
    }

    #[must_use]
    pub fn accepted_count(&self) -> i64 {
        self.accepted
    }
}

