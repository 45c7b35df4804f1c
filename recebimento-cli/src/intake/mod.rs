//! Received-material intake recording
//!
//! Reference lookups, record assembly, the append-by-rewrite intake store,
//! filtering/aggregation and material labels.

pub mod assemble;
pub mod catalog;
pub mod label;
pub mod query;
pub mod session;
pub mod store;
pub mod types;

pub use assemble::new_control_token;
pub use query::{Aggregates, FilterOptions, RecordFilter};
pub use session::{BrowseResult, IntakeSession};
pub use types::*;
