//! # daily-rotate
//!
//! Builds the rolling daily puzzle pack. The puzzle catalog is a manifest of
//! ids in publication order; this crate picks the puzzles for the last week
//! (ending today), stamps each with its date, and writes them as one
//! MessagePack file for the client to download.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! 1. Load     daily/manifest.json   →  Manifest        (epoch + ordered ids)
//! 2. Window   epoch, today, count   →  [start, current] (at most 7 days)
//! 3. Merge    daily/puzzles/<id>.pl8 → dated puzzles   (+ `t`, `date`)
//! 4. Write    DailyPack             →  daily.pl8       (atomic replace)
//! ```
//!
//! The window computation and date formatting are pure functions, and puzzle
//! records are read through the [`merge::PuzzleSource`] trait, so the
//! interesting logic is testable without touching the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `daily-rotate.toml` loading: stock defaults, sparse overrides, validation |
//! | [`manifest`] | JSON manifest parsing |
//! | [`window`] | Pure window arithmetic: days since epoch → index range |
//! | [`dates`] | Locale-free date formatting and day arithmetic |
//! | [`types`] | Puzzle records, dated puzzles, and the pack container |
//! | [`merge`] | Reads the window's records and stamps them with dates |
//! | [`pack`] | MessagePack encoding and atomic output |
//! | [`rotate`] | The pipeline, ending in `NoPuzzles`, `BeforeEpoch`, or `Written` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Partial Success Over All-or-Nothing
//!
//! A puzzle file missing from the window is logged and skipped; the rest of
//! the week still ships. Anything else that goes wrong (a malformed manifest,
//! a corrupt record, an unwritable output) aborts the run and leaves the
//! previous pack in place.
//!
//! ## Fixed Date Pattern
//!
//! Display dates are always `Mon D, YYYY` with English month names. The
//! format is spelled out in [`dates`] rather than taken from the host locale,
//! so every build machine produces identical packs.
//!
//! ## Opaque Records
//!
//! Puzzle records are never interpreted. They are decoded as ordered
//! MessagePack maps, the reserved `t`/`date` keys are replaced, and the rest
//! passes through unchanged, in the original field order.

pub mod config;
pub mod dates;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod pack;
pub mod rotate;
pub mod types;
pub mod window;

#[cfg(test)]
pub(crate) mod test_helpers;
