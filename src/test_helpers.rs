//! Shared test utilities for the daily-rotate test suite.
//!
//! Provides an in-memory [`PuzzleSource`], record encoders, and a temp-dir
//! project builder that lays files out the way the stock config expects.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = Project::new("2024-01-01", 10);
//! project.remove_puzzle(3);
//! let outcome = project.rotate("2024-01-10").unwrap();
//! ```

use std::collections::HashMap;
use std::io;
use std::path::Path;
use tempfile::TempDir;

use crate::config::RotateConfig;
use crate::dates::parse_iso_date;
use crate::manifest::Manifest;
use crate::merge::PuzzleSource;
use crate::rotate::{RotateError, RotateOutcome, rotate};

// =========================================================================
// Records and manifests
// =========================================================================

/// Encode a small puzzle record `{ id, grid }` as MessagePack.
pub fn encode_record(id: &str) -> Vec<u8> {
    let value = rmpv::Value::Map(vec![
        (rmpv::Value::from("id"), rmpv::Value::from(id)),
        (rmpv::Value::from("grid"), rmpv::Value::from(format!("grid-{id}"))),
    ]);
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &value).unwrap();
    buf
}

/// Puzzle ids `p00`, `p01`, ... for a catalog of `count` entries.
pub fn puzzle_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("p{i:02}")).collect()
}

/// Manifest JSON text for an epoch and ordered ids.
pub fn manifest_json(epoch: &str, ids: &[&str]) -> String {
    let puzzles: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id }))
        .collect();
    serde_json::json!({ "epoch": epoch, "puzzles": puzzles }).to_string()
}

pub fn manifest_with_ids(epoch: &str, ids: &[&str]) -> Manifest {
    Manifest::from_json(&manifest_json(epoch, ids)).unwrap()
}

// =========================================================================
// In-memory puzzle source
// =========================================================================

#[derive(Default)]
pub struct MemorySource {
    records: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// A source holding a valid record for each id.
    pub fn with_records(ids: &[&str]) -> Self {
        let mut source = Self::default();
        for id in ids {
            source.insert(id, encode_record(id));
        }
        source
    }

    pub fn insert(&mut self, id: &str, bytes: Vec<u8>) {
        self.records.insert(id.to_string(), bytes);
    }
}

impl PuzzleSource for MemorySource {
    fn fetch(&self, id: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.records.get(id).cloned())
    }
}

// =========================================================================
// On-disk project fixture
// =========================================================================

/// A temp project directory in the stock layout.
pub struct Project {
    pub dir: TempDir,
    pub ids: Vec<String>,
}

impl Project {
    /// Write a manifest with `count` puzzles and one record file per puzzle.
    pub fn new(epoch: &str, count: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let ids = puzzle_ids(count);
        let layout = RotateConfig::default().layout(dir.path());

        std::fs::create_dir_all(&layout.puzzles_dir).unwrap();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        std::fs::write(&layout.manifest, manifest_json(epoch, &id_refs)).unwrap();
        for id in &ids {
            std::fs::write(layout.puzzle_source().path_for(id), encode_record(id)).unwrap();
        }

        Self { dir, ids }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the record file of the puzzle at `index`.
    pub fn remove_puzzle(&self, index: usize) {
        let layout = RotateConfig::default().layout(self.root());
        std::fs::remove_file(layout.puzzle_source().path_for(&self.ids[index])).unwrap();
    }

    /// Replace the manifest with raw JSON text.
    pub fn write_manifest(&self, json: &str) {
        let layout = RotateConfig::default().layout(self.root());
        std::fs::write(layout.manifest, json).unwrap();
    }

    pub fn output_path(&self) -> std::path::PathBuf {
        RotateConfig::default().layout(self.root()).output
    }

    /// Run the pipeline with the stock config as of `today`.
    pub fn rotate(&self, today: &str) -> Result<RotateOutcome, RotateError> {
        let layout = RotateConfig::default().layout(self.root());
        rotate(
            &RotateConfig::default(),
            &layout,
            parse_iso_date(today).unwrap(),
            &layout.puzzle_source(),
        )
    }
}
