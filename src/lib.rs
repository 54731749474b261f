//! `etf-weight-report` library crate.
//!
//! The binary (`etf-report`) is a thin wrapper around this library so that:
//!
//! - the diff and the renderers are testable without network or SMTP
//! - sources and sinks can be swapped (download vs. local files, mail vs. stdout)

pub mod app;
pub mod cli;
pub mod data;
pub mod diff;
pub mod domain;
pub mod error;
pub mod io;
pub mod mail;
pub mod report;
