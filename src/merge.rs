//! Puzzle merging: window indices → dated puzzle records.
//!
//! For every index in the window, in ascending order, the merger looks up the
//! manifest id, fetches `<id>.<ext>` through a [`PuzzleSource`], decodes it,
//! and stamps it with `epoch + index` days.
//!
//! A missing puzzle file is not fatal. It is logged, recorded in
//! [`MergeResult::missing`], and the rest of the window is still published.
//! A file that exists but cannot be read or decoded aborts the merge.

use crate::dates::{self, DateError};
use crate::manifest::Manifest;
use crate::types::{DatedPuzzle, PuzzleRecord, RecordError};
use crate::window::DayRange;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("IO error reading puzzle '{id}': {source}")]
    Io { id: String, source: io::Error },
    #[error("Failed to decode puzzle '{id}': {source}")]
    Record { id: String, source: RecordError },
    #[error("Date error: {0}")]
    Date(#[from] DateError),
    #[error("Window index {index} is outside the manifest ({total} puzzles)")]
    IndexOutOfRange { index: usize, total: usize },
}

/// Where encoded puzzle records come from.
pub trait PuzzleSource {
    /// Raw bytes for the puzzle `id`, or `None` if no such record exists.
    fn fetch(&self, id: &str) -> io::Result<Option<Vec<u8>>>;

    /// Human-readable location of `id`, for log messages.
    fn describe(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Puzzle files stored as `<dir>/<id>.<extension>`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    extension: String,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{}", self.extension))
    }
}

impl PuzzleSource for DirSource {
    fn fetch(&self, id: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn describe(&self, id: &str) -> String {
        self.path_for(id).display().to_string()
    }
}

/// Outcome of merging one window.
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    /// Dated puzzles in ascending date order.
    pub puzzles: Vec<DatedPuzzle>,
    /// Ids in the window whose record was not found.
    pub missing: Vec<String>,
}

/// Load and date every puzzle in `range`, counting days from `epoch`.
pub fn merge_window(
    manifest: &Manifest,
    epoch: NaiveDate,
    range: DayRange,
    source: &dyn PuzzleSource,
) -> Result<MergeResult, MergeError> {
    let mut result = MergeResult::default();

    for index in range.indices() {
        let id = manifest
            .id_at(index)
            .ok_or(MergeError::IndexOutOfRange {
                index,
                total: manifest.puzzles.len(),
            })?;

        let fetched = source.fetch(id).map_err(|e| MergeError::Io {
            id: id.to_string(),
            source: e,
        })?;
        let bytes = match fetched {
            Some(bytes) => bytes,
            None => {
                tracing::warn!("Puzzle file not found: {}", source.describe(id));
                result.missing.push(id.to_string());
                continue;
            }
        };

        let record = PuzzleRecord::decode(&bytes).map_err(|e| MergeError::Record {
            id: id.to_string(),
            source: e,
        })?;
        let date = dates::date_for_index(epoch, index)?;
        tracing::debug!(id, index, date = %date, "merged puzzle");
        result.puzzles.push(DatedPuzzle::new(record, date));
    }

    Ok(result)
}
