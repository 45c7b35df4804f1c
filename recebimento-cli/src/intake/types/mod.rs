//! Core types for intake recording

mod error;
mod form;
mod record;
mod table;

pub use error::*;
pub use form::*;
pub use record::*;
pub use table::*;
