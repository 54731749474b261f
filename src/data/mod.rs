//! Snapshot sources.
//!
//! - `timeetf`: live download from the fund website
//! - [`FileSource`]: local files, for offline runs and replays

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::Snapshot;
use crate::error::Unavailable;
use crate::io::ingest::{read_csv, read_workbook};

pub mod timeetf;

pub use timeetf::TimeEtfClient;

/// Supplies the holdings snapshot for a calendar date.
///
/// Implementations report "no data" as [`Unavailable`]; they never panic or
/// abort the process on a missing file.
pub trait SnapshotSource {
    fn fetch(&self, date: NaiveDate) -> Result<Snapshot, Unavailable>;
}

/// Snapshots read from local CSV or workbook files, one file per date.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    files: HashMap<NaiveDate, PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, date: NaiveDate, path: impl Into<PathBuf>) -> Self {
        self.files.insert(date, path.into());
        self
    }
}

impl SnapshotSource for FileSource {
    fn fetch(&self, date: NaiveDate) -> Result<Snapshot, Unavailable> {
        let path = self.files.get(&date).ok_or(Unavailable::NotPublished)?;
        if is_csv(path) {
            return read_csv(date, path);
        }
        let bytes = std::fs::read(path)
            .map_err(|e| Unavailable::Fetch(format!("failed to read '{}': {e}", path.display())))?;
        read_workbook(date, &bytes)
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
