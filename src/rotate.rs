//! The rotation pipeline.
//!
//! ```text
//! manifest.json ──► window ──► merge puzzles/<id>.pl8 ──► daily.pl8
//! ```
//!
//! Every run ends in one of three states:
//!
//! | Outcome        | When                        | Output file         |
//! |----------------|-----------------------------|---------------------|
//! | `NoPuzzles`    | manifest lists no puzzles   | untouched           |
//! | `BeforeEpoch`  | today precedes the epoch    | empty pack          |
//! | `Written`      | otherwise                   | windowed pack       |
//!
//! Missing puzzle files inside the window are skipped with a warning. Any
//! other failure (unreadable manifest, undecodable record, unwritable output)
//! aborts the run before the output file is replaced.

use crate::config::{Layout, RotateConfig};
use crate::dates::{self, DateError};
use crate::manifest::{self, Manifest, ManifestError};
use crate::merge::{self, MergeError, PuzzleSource};
use crate::pack::{self, PackError};
use crate::types::DailyPack;
use crate::window::{self, DayRange, Window};
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
    #[error("Pack error: {0}")]
    Pack(#[from] PackError),
    #[error("Date error: {0}")]
    Date(#[from] DateError),
}

/// One day of a planned window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDay {
    pub index: usize,
    pub id: String,
    pub date: NaiveDate,
}

/// The window for a given day, computed from the manifest alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// `None` for an empty catalog, whose epoch is never read.
    pub epoch: Option<NaiveDate>,
    pub today: NaiveDate,
    pub days_since_epoch: Option<i64>,
    pub total: usize,
    pub window: Window,
    /// Days in the window, oldest first. Empty unless `window` is a range.
    pub days: Vec<PlannedDay>,
}

impl Plan {
    pub fn new(
        manifest: &Manifest,
        today: NaiveDate,
        max_window: usize,
    ) -> Result<Self, RotateError> {
        let total = manifest.puzzles.len();
        if total == 0 {
            return Ok(Self {
                epoch: None,
                today,
                days_since_epoch: None,
                total,
                window: Window::NoPuzzles,
                days: Vec::new(),
            });
        }

        let epoch = manifest.epoch()?;
        let days_since_epoch = dates::days_since_epoch(epoch, today);
        let window = window::compute_window(days_since_epoch, total, max_window);

        let days = match window {
            Window::Range(range) => range
                .indices()
                .map(|index| {
                    Ok(PlannedDay {
                        index,
                        id: manifest.puzzles[index].id.clone(),
                        date: dates::date_for_index(epoch, index)?,
                    })
                })
                .collect::<Result<Vec<_>, DateError>>()?,
            Window::NoPuzzles | Window::BeforeEpoch => Vec::new(),
        };

        Ok(Self {
            epoch: Some(epoch),
            today,
            days_since_epoch: Some(days_since_epoch),
            total,
            window,
            days,
        })
    }
}

/// Load the manifest and compute the window without reading puzzle files.
pub fn plan(
    config: &RotateConfig,
    layout: &Layout,
    today: NaiveDate,
) -> Result<Plan, RotateError> {
    let manifest = manifest::load_manifest(&layout.manifest)?;
    Plan::new(&manifest, today, config.pack.max_window)
}

/// Result of a rotation run.
#[derive(Debug, Clone)]
pub enum RotateOutcome {
    /// The manifest is empty; nothing was written.
    NoPuzzles,
    /// Today precedes the epoch; an empty pack was written.
    BeforeEpoch { output: PathBuf, bytes: usize },
    /// The windowed pack was written.
    Written(RotateReport),
}

#[derive(Debug, Clone)]
pub struct RotateReport {
    pub range: DayRange,
    pub pack: DailyPack,
    /// Ids in the window whose puzzle file was not found.
    pub missing: Vec<String>,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Run the full pipeline for `today`.
pub fn rotate(
    config: &RotateConfig,
    layout: &Layout,
    today: NaiveDate,
    source: &dyn PuzzleSource,
) -> Result<RotateOutcome, RotateError> {
    let manifest = manifest::load_manifest(&layout.manifest)?;

    if manifest.puzzles.is_empty() {
        tracing::info!("No puzzles in manifest, skipping rotation");
        return Ok(RotateOutcome::NoPuzzles);
    }

    let epoch = manifest.epoch()?;
    let days_since_epoch = dates::days_since_epoch(epoch, today);
    tracing::info!(
        "Epoch: {}, Today: {}, Days since epoch: {}",
        epoch,
        today,
        days_since_epoch
    );

    let range = match window::compute_window(
        days_since_epoch,
        manifest.puzzles.len(),
        config.pack.max_window,
    ) {
        Window::NoPuzzles => return Ok(RotateOutcome::NoPuzzles),
        Window::BeforeEpoch => {
            tracing::info!("Before epoch, generating empty daily pack");
            let empty = DailyPack::empty(&config.pack.id, &config.pack.title);
            let bytes = pack::write_pack(&layout.output, &empty)?;
            return Ok(RotateOutcome::BeforeEpoch {
                output: layout.output.clone(),
                bytes,
            });
        }
        Window::Range(range) => range,
    };

    tracing::info!(
        "Window: puzzles[{}] to puzzles[{}] ({} puzzles)",
        range.start,
        range.current,
        range.size()
    );

    let merged = merge::merge_window(&manifest, epoch, range, source)?;
    let daily = DailyPack::new(&config.pack.id, &config.pack.title, merged.puzzles);
    let bytes = pack::write_pack(&layout.output, &daily)?;

    tracing::info!(
        "Generated {} with {} puzzles",
        layout.output.display(),
        daily.puzzles.len()
    );

    Ok(RotateOutcome::Written(RotateReport {
        range,
        pack: daily,
        missing: merged.missing,
        output: layout.output.clone(),
        bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{Project, manifest_json, manifest_with_ids};
    use std::fs;

    fn written(outcome: RotateOutcome) -> RotateReport {
        match outcome {
            RotateOutcome::Written(report) => report,
            other => panic!("expected a written pack, got {other:?}"),
        }
    }

    fn iso_dates(pack: &DailyPack) -> Vec<String> {
        pack.puzzles
            .iter()
            .map(|p| p.iso_date().unwrap().to_string())
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        dates::parse_iso_date(s).unwrap()
    }

    // =========================================================================
    // End-to-end scenarios
    // =========================================================================

    #[test]
    fn before_epoch_writes_empty_pack() {
        let project = Project::new("2024-01-01", 10);

        let outcome = project.rotate("2023-12-31").unwrap();

        assert!(matches!(outcome, RotateOutcome::BeforeEpoch { .. }));
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(pack.id, "daily");
        assert_eq!(pack.title, "Daily Puzzles");
        assert!(pack.puzzles.is_empty());
    }

    #[test]
    fn epoch_day_publishes_first_puzzle() {
        let project = Project::new("2024-01-01", 10);

        let report = written(project.rotate("2024-01-01").unwrap());

        assert_eq!(report.range, DayRange { start: 0, current: 0 });
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(iso_dates(&pack), vec!["2024-01-01"]);
        assert_eq!(pack.puzzles[0].display_date(), Some("Jan 1, 2024"));
    }

    #[test]
    fn saturated_window_publishes_last_seven_days() {
        let project = Project::new("2024-01-01", 10);

        let report = written(project.rotate("2024-01-10").unwrap());

        assert_eq!(report.range, DayRange { start: 3, current: 9 });
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(
            iso_dates(&pack),
            vec![
                "2024-01-04",
                "2024-01-05",
                "2024-01-06",
                "2024-01-07",
                "2024-01-08",
                "2024-01-09",
                "2024-01-10",
            ]
        );
        let ids: Vec<&str> = pack
            .puzzles
            .iter()
            .map(|p| p.get("id").and_then(rmpv::Value::as_str).unwrap())
            .collect();
        assert_eq!(ids, vec!["p03", "p04", "p05", "p06", "p07", "p08", "p09"]);
    }

    #[test]
    fn exhausted_catalog_keeps_last_window() {
        let project = Project::new("2024-01-01", 5);

        let report = written(project.rotate("2024-01-10").unwrap());

        assert_eq!(report.range, DayRange { start: 0, current: 4 });
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(
            iso_dates(&pack),
            vec![
                "2024-01-01",
                "2024-01-02",
                "2024-01-03",
                "2024-01-04",
                "2024-01-05",
            ]
        );
    }

    #[test]
    fn missing_puzzle_file_is_skipped() {
        let project = Project::new("2024-01-01", 10);
        project.remove_puzzle(5);

        let report = written(project.rotate("2024-01-10").unwrap());

        assert_eq!(report.missing, vec!["p05".to_string()]);
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(pack.puzzles.len(), 6);
        assert_eq!(
            iso_dates(&pack),
            vec![
                "2024-01-04",
                "2024-01-05",
                "2024-01-07",
                "2024-01-08",
                "2024-01-09",
                "2024-01-10",
            ]
        );
    }

    #[test]
    fn empty_manifest_writes_nothing() {
        let project = Project::new("2024-01-01", 0);

        let outcome = project.rotate("2024-01-10").unwrap();

        assert!(matches!(outcome, RotateOutcome::NoPuzzles));
        assert!(!project.output_path().exists());
    }

    #[test]
    fn empty_manifest_leaves_previous_output_alone() {
        let project = Project::new("2024-01-01", 0);
        fs::write(project.output_path(), b"previous").unwrap();

        project.rotate("2024-01-10").unwrap();

        assert_eq!(fs::read(project.output_path()).unwrap(), b"previous");
    }

    #[test]
    fn null_puzzles_writes_nothing() {
        let project = Project::new("2024-01-01", 3);
        project.write_manifest(r#"{"epoch": "2024-01-01", "puzzles": null}"#);

        let outcome = project.rotate("2024-01-10").unwrap();

        assert!(matches!(outcome, RotateOutcome::NoPuzzles));
        assert!(!project.output_path().exists());
    }

    #[test]
    fn empty_catalog_ignores_missing_or_invalid_epoch() {
        let project = Project::new("2024-01-01", 0);

        for json in [r#"{"puzzles": []}"#, r#"{"epoch": "someday", "puzzles": []}"#, "{}"] {
            project.write_manifest(json);
            let outcome = project.rotate("2024-01-10").unwrap();
            assert!(matches!(outcome, RotateOutcome::NoPuzzles), "manifest {json}");
        }
        assert!(!project.output_path().exists());
    }

    #[test]
    fn catalog_without_epoch_aborts() {
        let project = Project::new("2024-01-01", 3);
        project.write_manifest(r#"{"puzzles": [{"id": "p00"}]}"#);

        let result = project.rotate("2024-01-10");

        assert!(matches!(
            result,
            Err(RotateError::Manifest(ManifestError::MissingEpoch))
        ));
        assert!(!project.output_path().exists());
    }

    #[test]
    fn empty_id_outside_window_is_ignored() {
        let project = Project::new("2024-01-01", 3);
        project.write_manifest(&manifest_json("2024-01-01", &["p00", "p01", "p02", ""]));

        let report = written(project.rotate("2024-01-02").unwrap());

        assert_eq!(report.range, DayRange { start: 0, current: 1 });
        assert!(report.missing.is_empty());
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(iso_dates(&pack), vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn empty_id_inside_window_is_skipped() {
        let project = Project::new("2024-01-01", 3);
        project.write_manifest(&manifest_json("2024-01-01", &["p00", "p01", "p02", ""]));

        let report = written(project.rotate("2024-01-04").unwrap());

        assert_eq!(report.range, DayRange { start: 0, current: 3 });
        assert_eq!(report.missing, vec![String::new()]);
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(
            iso_dates(&pack),
            vec!["2024-01-01", "2024-01-02", "2024-01-03"]
        );
    }

    #[test]
    fn all_files_missing_still_writes_empty_window() {
        let project = Project::new("2024-01-01", 10);
        for index in 3..10 {
            project.remove_puzzle(index);
        }

        let report = written(project.rotate("2024-01-10").unwrap());

        assert_eq!(report.range, DayRange { start: 3, current: 9 });
        assert_eq!(
            report.missing,
            vec!["p03", "p04", "p05", "p06", "p07", "p08", "p09"]
        );
        assert!(report.pack.puzzles.is_empty());
        let pack = pack::read_pack(&project.output_path()).unwrap();
        assert_eq!(pack.id, "daily");
        assert!(pack.puzzles.is_empty());
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let project = Project::new("2024-01-01", 10);

        project.rotate("2024-01-08").unwrap();
        let first = fs::read(project.output_path()).unwrap();
        project.rotate("2024-01-08").unwrap();
        let second = fs::read(project.output_path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_manifest_aborts() {
        let project = Project::new("2024-01-01", 3);
        let layout = RotateConfig::default().layout(project.root());
        fs::write(&layout.manifest, "{ not json").unwrap();

        let result = project.rotate("2024-01-02");

        assert!(matches!(result, Err(RotateError::Manifest(_))));
        assert!(!project.output_path().exists());
    }

    #[test]
    fn corrupt_puzzle_aborts_without_output() {
        let project = Project::new("2024-01-01", 3);
        let layout = RotateConfig::default().layout(project.root());
        fs::write(layout.puzzle_source().path_for("p01"), [0x81u8]).unwrap();

        let result = project.rotate("2024-01-03");

        assert!(matches!(result, Err(RotateError::Merge(_))));
        assert!(!project.output_path().exists());
    }

    #[test]
    fn custom_pack_identity_and_window() {
        let project = Project::new("2024-01-01", 10);
        let mut config = RotateConfig::default();
        config.pack.id = "weekly".to_string();
        config.pack.title = "Weekly Puzzles".to_string();
        config.pack.max_window = 3;
        let layout = config.layout(project.root());

        let report = written(
            rotate(&config, &layout, date("2024-01-10"), &layout.puzzle_source()).unwrap(),
        );

        assert_eq!(report.range, DayRange { start: 7, current: 9 });
        let pack = pack::read_pack(&layout.output).unwrap();
        assert_eq!(pack.id, "weekly");
        assert_eq!(pack.title, "Weekly Puzzles");
        assert_eq!(pack.puzzles.len(), 3);
    }

    // =========================================================================
    // Planning
    // =========================================================================

    #[test]
    fn plan_lists_days_with_ids_and_dates() {
        let manifest = manifest_with_ids("2024-01-01", &["a", "b", "c"]);

        let plan = Plan::new(&manifest, date("2024-01-02"), 7).unwrap();

        assert_eq!(plan.days_since_epoch, Some(1));
        assert_eq!(plan.window, Window::Range(DayRange { start: 0, current: 1 }));
        assert_eq!(
            plan.days,
            vec![
                PlannedDay {
                    index: 0,
                    id: "a".to_string(),
                    date: date("2024-01-01"),
                },
                PlannedDay {
                    index: 1,
                    id: "b".to_string(),
                    date: date("2024-01-02"),
                },
            ]
        );
    }

    #[test]
    fn plan_before_epoch_has_no_days() {
        let manifest = manifest_with_ids("2024-01-01", &["a"]);
        let plan = Plan::new(&manifest, date("2023-06-01"), 7).unwrap();
        assert_eq!(plan.window, Window::BeforeEpoch);
        assert!(plan.days.is_empty());
    }

    #[test]
    fn plan_for_empty_catalog_skips_epoch() {
        let manifest = Manifest::from_json(r#"{"puzzles": null}"#).unwrap();

        let plan = Plan::new(&manifest, date("2024-01-02"), 7).unwrap();

        assert_eq!(plan.window, Window::NoPuzzles);
        assert_eq!(plan.epoch, None);
        assert_eq!(plan.days_since_epoch, None);
    }

    #[test]
    fn plan_reads_manifest_from_layout() {
        let project = Project::new("2024-01-01", 4);
        let config = RotateConfig::default();
        let layout = config.layout(project.root());
        fs::write(&layout.manifest, manifest_json("2024-01-01", &["x", "y"])).unwrap();

        let plan = plan(&config, &layout, date("2024-03-01")).unwrap();

        assert_eq!(plan.total, 2);
        assert_eq!(plan.window, Window::Range(DayRange { start: 0, current: 1 }));
    }
}
