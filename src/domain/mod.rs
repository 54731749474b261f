//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw per-date holdings (`Snapshot`, `HoldingWeight`, `RawWeight`)
//! - the joined, ranked diff (`DiffRow`, `RankedTable`)
//! - run settings and rendered output (`RunConfig`, `ReportFormat`, `Report`)

pub mod types;

pub use types::*;
