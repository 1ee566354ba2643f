//! Records that flow from the puzzle files into the daily pack.
//!
//! Puzzle records are opaque: the pipeline never looks inside them beyond
//! requiring a MessagePack map. Field order is preserved end to end, so the
//! same inputs always encode to the same bytes.

use chrono::NaiveDate;
use rmpv::Value;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates;

/// Key of the human-readable date stamped onto each dated puzzle.
pub const DISPLAY_DATE_KEY: &str = "t";
/// Key of the ISO date stamped onto each dated puzzle.
pub const ISO_DATE_KEY: &str = "date";

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmpv::decode::Error),
    #[error("Puzzle record is not a map (found {0})")]
    NotAMap(&'static str),
}

/// A decoded puzzle file: an ordered list of key/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleRecord {
    fields: Vec<(Value, Value)>,
}

impl PuzzleRecord {
    pub fn new(fields: Vec<(Value, Value)>) -> Self {
        Self { fields }
    }

    /// Decode a MessagePack-encoded puzzle file.
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut reader = bytes;
        match rmpv::decode::read_value(&mut reader)? {
            Value::Map(fields) => Ok(Self { fields }),
            other => Err(RecordError::NotAMap(value_kind(&other))),
        }
    }

    pub fn fields(&self) -> &[(Value, Value)] {
        &self.fields
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::F32(_) | Value::F64(_) => "float",
        Value::String(_) => "string",
        Value::Binary(_) => "binary",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Ext(..) => "ext",
    }
}

/// A puzzle record stamped with its publication date.
///
/// Built from the record's fields minus any existing `t`/`date` keys, with
/// the two date fields appended last. A record that already carries `t` or
/// `date` therefore has that key moved to the end rather than overwritten in
/// place, so every pack ends each puzzle with `t, date` in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedPuzzle {
    fields: Vec<(Value, Value)>,
}

impl DatedPuzzle {
    pub fn new(record: PuzzleRecord, date: NaiveDate) -> Self {
        let mut fields: Vec<(Value, Value)> = record
            .fields
            .into_iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .collect();
        fields.push((
            Value::from(DISPLAY_DATE_KEY),
            Value::from(dates::display_date(date)),
        ));
        fields.push((Value::from(ISO_DATE_KEY), Value::from(dates::iso_date(date))));
        Self { fields }
    }

    pub fn fields(&self) -> &[(Value, Value)] {
        &self.fields
    }

    /// Look up a field by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// The `t` field, e.g. `Jan 4, 2024`.
    pub fn display_date(&self) -> Option<&str> {
        self.get(DISPLAY_DATE_KEY).and_then(Value::as_str)
    }

    /// The `date` field, e.g. `2024-01-04`.
    pub fn iso_date(&self) -> Option<&str> {
        self.get(ISO_DATE_KEY).and_then(Value::as_str)
    }
}

fn is_reserved_key(key: &Value) -> bool {
    matches!(key.as_str(), Some(DISPLAY_DATE_KEY) | Some(ISO_DATE_KEY))
}

impl Serialize for DatedPuzzle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DatedPuzzle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Map(fields) => Ok(Self { fields }),
            other => Err(de::Error::custom(format!(
                "dated puzzle must be a map, found {}",
                value_kind(&other)
            ))),
        }
    }
}

/// The output artifact: `{ id, title, puzzles }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPack {
    pub id: String,
    pub title: String,
    pub puzzles: Vec<DatedPuzzle>,
}

impl DailyPack {
    pub fn new(id: impl Into<String>, title: impl Into<String>, puzzles: Vec<DatedPuzzle>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            puzzles,
        }
    }

    /// A pack with no puzzles, written before the epoch.
    pub fn empty(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, Vec::new())
    }
}
