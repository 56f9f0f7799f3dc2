//! The query-execution engine: concurrent HTTP fetch scheduling, line
//! demultiplexing, the SAF state machine, receive-side filtering, the
//! writer/sort stage, and the batch driver.

pub mod batch;
pub mod demux;
pub mod filter;
pub mod jsoninput;
pub mod query;
pub mod transport;
pub mod writer;

pub use batch::{Framing, run_batch};
pub use jsoninput::run_json_input;
pub use query::{FetchReport, QueryError, QueryOutcome, SafState, SharedWriter, run_query};
pub use transport::{TransportConfig, TransportError, build_client};
pub use writer::Writer;

