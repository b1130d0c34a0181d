//! Reports over finished workouts.
//!
//! Summaries for listing the history log, and a CSV export with one row per
//! completed set.

use crate::aggregate::{completed_sets, completion_percentage, total_sets, total_volume};
use crate::{Result, WorkoutSession};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::path::Path;

/// One line of the history listing
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySummary {
    pub id: String,
    pub name: String,
    pub completed_sets: u32,
    pub total_sets: u32,
    pub volume: f64,
    pub completion_percentage: u32,
    /// Taken from the `-<epoch millis>` suffix of the history id
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&WorkoutSession> for HistorySummary {
    fn from(session: &WorkoutSession) -> Self {
        Self {
            id: session.id.clone(),
            name: session.name.clone(),
            completed_sets: completed_sets(session),
            total_sets: total_sets(session),
            volume: total_volume(session),
            completion_percentage: completion_percentage(session),
            completed_at: completed_at(&session.id),
        }
    }
}

/// Summaries in history order (oldest first)
pub fn summarize_history(history: &[WorkoutSession]) -> Vec<HistorySummary> {
    history.iter().map(HistorySummary::from).collect()
}

/// Completion time encoded in a history id, if it has one
pub fn completed_at(history_id: &str) -> Option<DateTime<Utc>> {
    let (_, suffix) = history_id.rsplit_once('-')?;
    let millis: i64 = suffix.parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}

#[derive(Debug, serde::Serialize)]
struct SetRow<'a> {
    workout_id: &'a str,
    workout_name: &'a str,
    exercise: &'a str,
    set_index: usize,
    weight: f64,
    unit: &'a str,
    reps: u32,
}

/// Write every completed set in `history` to a CSV file
///
/// An existing file is replaced, so exporting twice never duplicates rows.
/// The file is synced to disk before returning. Returns the number of rows
/// written.
pub fn export_history_csv(history: &[WorkoutSession], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(csv_path)?;

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);

    let mut rows = 0;
    for workout in history {
        for exercise in &workout.exercises {
            for (set_index, set) in exercise.set_details.iter().enumerate() {
                if !set.is_completed {
                    continue;
                }
                writer.serialize(SetRow {
                    workout_id: &workout.id,
                    workout_name: &workout.name,
                    exercise: &exercise.name,
                    set_index,
                    weight: set.actual_weight,
                    unit: &exercise.weight_unit,
                    reps: set.reps,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", rows, csv_path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalog, materialize};

    fn finished_upper(millis: i64) -> WorkoutSession {
        let catalog = build_default_catalog();
        let mut session = materialize(catalog.get("workout-upper-body").unwrap());
        session.id = format!("workout-upper-body-{}", millis);
        session.exercises[0].set_details[0].is_completed = true;
        session.exercises[0].set_details[0].actual_weight = 145.0;
        session.exercises[2].set_details[1].is_completed = true;
        session
    }

    #[test]
    fn test_completed_at_parses_suffix() {
        assert_eq!(
            completed_at("workout-upper-body-1760000000000"),
            DateTime::from_timestamp_millis(1_760_000_000_000)
        );
        assert_eq!(completed_at("workout-upper-body"), None);
        assert_eq!(completed_at("plain"), None);
    }

    #[test]
    fn test_summary_fields() {
        let summary = HistorySummary::from(&finished_upper(1_760_000_000_000));
        assert_eq!(summary.name, "Upper Body Strength");
        assert_eq!(summary.completed_sets, 2);
        assert_eq!(summary.total_sets, 10);
        assert_eq!(summary.completion_percentage, 20);
        assert_eq!(summary.volume, 145.0 * 8.0);
        assert!(summary.completed_at.is_some());
    }

    #[test]
    fn test_export_writes_completed_sets_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("exports").join("history.csv");

        let rows = export_history_csv(&[finished_upper(1)], &csv_path).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "workout_id,workout_name,exercise,set_index,weight,unit,reps"
        );
        assert_eq!(
            lines[1],
            "workout-upper-body-1,Upper Body Strength,Bench Press,0,145.0,lbs,8"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_twice_replaces_previous_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");
        let history = [finished_upper(1), finished_upper(2)];

        export_history_csv(&history[..1], &csv_path).unwrap();
        export_history_csv(&history, &csv_path).unwrap();
        export_history_csv(&history, &csv_path).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[0][0], "workout-upper-body-1");
        assert_eq!(&records[2][0], "workout-upper-body-2");

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.matches("workout_id,").count(), 1);
    }

    #[test]
    fn test_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        assert_eq!(export_history_csv(&[], &csv_path).unwrap(), 0);
        assert!(csv_path.exists());
    }
}
