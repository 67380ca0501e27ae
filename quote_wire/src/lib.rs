//!
//! Binary quote records and the multicast transport that publishes them.
//!
//! This crate aggregates:
//! - `error` — unified error type `WireError` used across the workspace.
//! - `result` — handy `Result<T, WireError>` alias.
//! - `layout` — offsets, type codes and scaling shared by all record layouts.
//! - `record` — `QuoteUpdate` and the 70-byte tagged field record encoder.
//! - `legacy` — the 48-byte symbol/price/quantity/timestamp record.
//! - `format` — selection between the two layouts.
//! - `net` — multicast defaults and `TransportConfig`.
//! - `transport` — `MulticastTransport`, the socket the records are sent on.
#![warn(missing_docs)]
pub mod error;
pub mod format;
pub mod layout;
pub mod legacy;
pub mod net;
pub mod record;
pub mod result;
pub mod transport;

pub use error::WireError;
pub use format::{EncodedRecord, RecordFormat};
pub use net::TransportConfig;
pub use record::{QuoteUpdate, RECORD_LEN, WireRecord, encode};
pub use result::Result;
pub use transport::{DatagramSink, MulticastTransport};
