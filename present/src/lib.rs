pub mod csv;
pub mod dedup;
pub mod json;
pub mod minimal;
pub mod text;
pub mod timefmt;

use dnsdbq_types::{QueryMode, Tuple, Verb};

pub use dedup::{Deduper, HashSetDeduper};
pub use json::{AsnEnricher, NoopEnricher};
pub use timefmt::TimeFormat;

/// The four output formats a [`Tuple`] can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Text,
    Json { datefix: bool },
    Csv,
    Minimal,
}

/// Per-run presenter state: time format, optional ASN enrichment, and the
/// deduper backing minimal mode. One instance is shared across every
/// [`Tuple`] the query engine dispatches.
pub struct Presenter {
    format: OutputFormat,
    time_format: TimeFormat,
    verb: Verb,
    mode: QueryMode,
    enricher: Option<Box<dyn AsnEnricher>>,
    deduper: Box<dyn Deduper>,
    csv_header_emitted: bool,
}

impl Presenter {
    #[must_use]
    pub fn new(format: OutputFormat, time_format: TimeFormat, verb: Verb, mode: QueryMode) -> Self {
        Self {
            format,
            time_format,
            verb,
            mode,
            enricher: None,
            deduper: Box::new(HashSetDeduper::default()),
            csv_header_emitted: false,
        }
    }

    #[must_use]
    pub fn with_enricher(mut self, enricher: Box<dyn AsnEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Render one [`Tuple`], prefixing a CSV header the first time csv output
    /// is produced.
    pub fn render(&mut self, tuple: &Tuple) -> String {
        match self.format {
            OutputFormat::Text => text::render(tuple, self.verb, self.time_format),
            OutputFormat::Json { datefix } => {
                json::render(tuple, datefix, self.enricher.as_deref())
            }
            OutputFormat::Csv => {
                let mut out = String::new();
                if !self.csv_header_emitted {
                    out.push_str(csv::header());
                    out.push('\n');
                    self.csv_header_emitted = true;
                }
                out.push_str(&csv::render(tuple, self.time_format));
                out
            }
            OutputFormat::Minimal => minimal::render(tuple, self.mode, self.deduper.as_mut()),
        }
    }
}
