//! Rolling window computation.
//!
//! Maps "today" onto a contiguous range of manifest indices. Index 0 is the
//! epoch day, index `n` is `epoch + n` days.
//!
//! ```text
//! days since epoch:   0  1  2  3  4  5  6  7  8  9
//! manifest index:    [0][1][2][3][4][5][6][7][8][9]
//!                             └──── window on day 9 ────┘  (start 3, current 9)
//! ```
//!
//! - The window grows from one puzzle on the epoch day up to `max_window`.
//! - `current` is clamped to the last manifest entry, so once the catalog is
//!   exhausted the final puzzle stays "today" and the window stops moving.
//! - Before the epoch there is no window at all.
//!
//! Everything here is pure arithmetic; the caller decides what each
//! [`Window`] variant means for the output file.

use crate::dates;
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// Default number of puzzles exposed at once.
pub const MAX_WINDOW: usize = 7;

/// Inclusive range of manifest indices `[start, current]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: usize,
    pub current: usize,
}

impl DayRange {
    /// Number of days covered. Always at least one.
    pub fn size(&self) -> usize {
        self.current - self.start + 1
    }

    /// Indices in ascending (chronological) order.
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.current
    }
}

/// Outcome of the window computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The manifest lists no puzzles. Nothing should be written.
    NoPuzzles,
    /// Today precedes the epoch. An empty pack should be written.
    BeforeEpoch,
    /// Puzzles `start..=current` are live.
    Range(DayRange),
}

/// Compute the window from a day offset.
///
/// `max_window` must be at least 1; [`crate::config`] validation enforces it.
/// An empty catalog is reported before the epoch comparison.
pub fn compute_window(days_since_epoch: i64, total: usize, max_window: usize) -> Window {
    if total == 0 {
        return Window::NoPuzzles;
    }
    if days_since_epoch < 0 {
        return Window::BeforeEpoch;
    }

    let days = usize::try_from(days_since_epoch).unwrap_or(usize::MAX);
    let current = days.min(total - 1);
    let size = (current + 1).min(max_window.max(1));
    let start = (current + 1).saturating_sub(size);

    Window::Range(DayRange { start, current })
}

/// Compute the window for calendar dates.
pub fn window_for(epoch: NaiveDate, today: NaiveDate, total: usize, max_window: usize) -> Window {
    compute_window(dates::days_since_epoch(epoch, today), total, max_window)
}
