//! Core domain types for the pDNS query client.
//!
//! This crate contains pure domain types with no IO and no async: the
//! abstract query descriptor, its tunable parameters, the time fence derived
//! from them, and the parsed record ("tuple") that flows out of a query.
//! Everything here can be used from any layer of the client.

mod descriptor;
mod error;
mod fence;
mod params;
mod sortkey;
mod tuple;

pub use descriptor::{QueryDescriptor, QueryMode, Verb};
pub use error::{DescriptorError, ParamsError, RecordParseError};
pub use fence::Fence;
pub use params::QueryParams;
pub use sortkey::SortKey;
pub use tuple::{Encap, Rdata, SafCond, Tuple, parse_record};
