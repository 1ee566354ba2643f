//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Progress and warnings during
//! a run go through `tracing` instead; this module only renders results.
//!
//! # Output Format
//!
//! ## Rotate
//!
//! ```text
//! Window 004..010 (7 days)
//!     Jan 4, 2024  p03
//!     Jan 6, 2024  p05
//!     ...
//!     missing: p04
//! Wrote 6 puzzles → daily.pl8 (512 bytes)
//! ```
//!
//! Entity indices are 1-based day numbers (`index + 1`), zero-padded to
//! three digits.

use crate::dates;
use crate::rotate::{Plan, RotateOutcome};
use crate::types::{DailyPack, DatedPuzzle};
use crate::window::Window;

/// Format a 1-based day number as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn puzzle_id(puzzle: &DatedPuzzle) -> &str {
    puzzle
        .get("id")
        .and_then(rmpv::Value::as_str)
        .unwrap_or("(no id)")
}

// ============================================================================
// rotate
// ============================================================================

/// Format the result of a rotation run.
pub fn format_rotate_output(outcome: &RotateOutcome) -> Vec<String> {
    match outcome {
        RotateOutcome::NoPuzzles => vec!["No puzzles in manifest, nothing written".to_string()],
        RotateOutcome::BeforeEpoch { output, bytes } => vec![
            "Before epoch".to_string(),
            format!("Wrote empty pack → {} ({} bytes)", output.display(), bytes),
        ],
        RotateOutcome::Written(report) => {
            let mut lines = vec![format!(
                "Window {}..{} ({} days)",
                format_index(report.range.start + 1),
                format_index(report.range.current + 1),
                report.range.size()
            )];
            for puzzle in &report.pack.puzzles {
                lines.push(format!(
                    "    {}  {}",
                    puzzle.display_date().unwrap_or("?"),
                    puzzle_id(puzzle)
                ));
            }
            for id in &report.missing {
                lines.push(format!("    missing: {}", id));
            }
            lines.push(format!(
                "Wrote {} puzzles → {} ({} bytes)",
                report.pack.puzzles.len(),
                report.output.display(),
                report.bytes
            ));
            lines
        }
    }
}

pub fn print_rotate_output(outcome: &RotateOutcome) {
    for line in format_rotate_output(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// window
// ============================================================================

/// Format a computed window without reading any puzzle files.
pub fn format_plan(plan: &Plan) -> Vec<String> {
    let mut lines = match (plan.epoch, plan.days_since_epoch) {
        (Some(epoch), Some(days)) => vec![format!(
            "Epoch: {}, Today: {}, Days since epoch: {}",
            dates::iso_date(epoch),
            dates::iso_date(plan.today),
            days
        )],
        _ => vec![format!("Today: {}", dates::iso_date(plan.today))],
    };
    match plan.window {
        Window::NoPuzzles => lines.push("No puzzles in manifest".to_string()),
        Window::BeforeEpoch => lines.push("Before epoch: the pack would be empty".to_string()),
        Window::Range(range) => {
            lines.push(format!(
                "Window: puzzles[{}] to puzzles[{}] ({} of {} puzzles)",
                range.start,
                range.current,
                range.size(),
                plan.total
            ));
            for day in &plan.days {
                lines.push(format!(
                    "{} {} ({})  {}",
                    format_index(day.index + 1),
                    dates::display_date(day.date),
                    dates::iso_date(day.date),
                    day.id
                ));
            }
        }
    }
    lines
}

pub fn print_plan(plan: &Plan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Format the contents of an existing pack.
pub fn format_pack(pack: &DailyPack) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({}): {} puzzles",
        pack.title,
        pack.id,
        pack.puzzles.len()
    )];
    for (i, puzzle) in pack.puzzles.iter().enumerate() {
        lines.push(format!(
            "{} {}  {}",
            format_index(i + 1),
            puzzle.iso_date().unwrap_or("?"),
            puzzle_id(puzzle)
        ));
    }
    lines
}

pub fn print_pack(pack: &DailyPack) {
    for line in format_pack(pack) {
        println!("{}", line);
    }
}
