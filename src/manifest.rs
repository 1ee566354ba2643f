//! Puzzle manifest loading.
//!
//! The manifest is a JSON file listing the daily catalog in publication order:
//!
//! ```json
//! {
//!   "epoch": "2024-01-01",
//!   "puzzles": [
//!     { "id": "p-0001", "difficulty": "easy" },
//!     { "id": "p-0002" }
//!   ]
//! }
//! ```
//!
//! Entry `n` is the puzzle for `epoch + n` days. Only `id` is read; any other
//! per-entry fields are kept in [`ManifestEntry::extra`] untouched.
//!
//! An empty catalog (`puzzles` missing, `null`, or `[]`) is valid whatever
//! `epoch` holds, so the epoch is only parsed on request via
//! [`Manifest::epoch`].

use crate::dates::{self, DateError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error reading manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error in manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Manifest has no epoch")]
    MissingEpoch,
    #[error("Manifest epoch must be a YYYY-MM-DD string, got {0}")]
    EpochType(serde_json::Value),
    #[error("Invalid manifest epoch: {0}")]
    Epoch(#[from] DateError),
}

/// The daily catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Day 0 of the catalog, unparsed.
    #[serde(rename = "epoch", default)]
    raw_epoch: Option<serde_json::Value>,
    /// Puzzles in day order. A missing or `null` key is an empty catalog.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub puzzles: Vec<ManifestEntry>,
}

/// One day's puzzle reference.
///
/// A missing `id` reads as empty. Such an entry resolves to no record and is
/// skipped like any other missing puzzle.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ManifestEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ManifestEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the `epoch` field.
    pub fn epoch(&self) -> Result<NaiveDate, ManifestError> {
        match &self.raw_epoch {
            None | Some(serde_json::Value::Null) => Err(ManifestError::MissingEpoch),
            Some(serde_json::Value::String(raw)) => Ok(dates::parse_iso_date(raw)?),
            Some(other) => Err(ManifestError::EpochType(other.clone())),
        }
    }

    /// Id of the puzzle scheduled at `index`, if the catalog is that long.
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.puzzles.get(index).map(|p| p.id.as_str())
    }
}

/// Read and parse the manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    Manifest::from_json(&content)
}
