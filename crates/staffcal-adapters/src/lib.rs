//! Upstream booking shapes and their adapter into the scheduling core.
//!
//! The core deliberately knows a single canonical record type; this crate
//! owns the translation from the shapes actually observed on the wire.

pub mod upstream;

pub use upstream::{GroupBooking, IndividualBooking, UpstreamRecord, adapt_records};
