//! Input/output helpers.
//!
//! - holdings ingest from workbooks and CSV (`ingest`)
//! - full-diff exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
