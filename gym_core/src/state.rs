//! Session store state and its persisted snapshot form.
//!
//! In memory, `active_workouts` is the single source of truth and the current
//! workout is a pointer into it. On disk, the snapshot keeps the embedded
//! `currentWorkout` layout so older snapshots still load.

use crate::types::null_as_default;
use crate::WorkoutSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the session store owns
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    pub(crate) current_workout_id: Option<String>,
    pub(crate) active_workouts: BTreeMap<String, WorkoutSession>,
    pub(crate) workout_history: Vec<WorkoutSession>,
    pub(crate) start_time: Option<DateTime<Utc>>,
}

impl StoreState {
    /// The session currently shown to the user
    pub fn current_workout(&self) -> Option<&WorkoutSession> {
        self.current_workout_id
            .as_deref()
            .and_then(|id| self.active_workouts.get(id))
    }

    pub fn current_workout_id(&self) -> Option<&str> {
        self.current_workout().map(|w| w.id.as_str())
    }

    /// Started-but-not-finished sessions, keyed by template id
    pub fn active_workouts(&self) -> &BTreeMap<String, WorkoutSession> {
        &self.active_workouts
    }

    /// Completed sessions, oldest first
    pub fn workout_history(&self) -> &[WorkoutSession] {
        &self.workout_history
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// True while a current workout is set
    pub fn is_active(&self) -> bool {
        self.current_workout().is_some()
    }

    /// Clear the run-state fields without touching any session
    pub(crate) fn clear_current(&mut self) {
        self.current_workout_id = None;
        self.start_time = None;
    }

    pub(crate) fn current_workout_mut(&mut self) -> Option<&mut WorkoutSession> {
        let id = self.current_workout_id.as_deref()?;
        self.active_workouts.get_mut(id)
    }
}

/// Wire form of [`StoreState`]
///
/// Every field defaults when absent or `null`, so snapshots written before a
/// field existed still load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub current_workout: Option<WorkoutSession>,
    #[serde(deserialize_with = "null_as_default")]
    pub active_workouts: BTreeMap<String, WorkoutSession>,
    #[serde(deserialize_with = "null_as_default")]
    pub workout_history: Vec<WorkoutSession>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
}

impl From<&StoreState> for Snapshot {
    fn from(state: &StoreState) -> Self {
        Snapshot {
            current_workout: state.current_workout().cloned(),
            active_workouts: state.active_workouts.clone(),
            workout_history: state.workout_history.clone(),
            start_time: state.start_time,
            is_active: state.is_active(),
        }
    }
}

impl From<Snapshot> for StoreState {
    fn from(snapshot: Snapshot) -> Self {
        let Snapshot {
            current_workout,
            mut active_workouts,
            workout_history,
            start_time,
            is_active: _,
        } = snapshot;

        let current_workout_id = current_workout.map(|current| {
            let id = current.id.clone();
            // Older snapshots could hold a current workout that was never
            // registered as active (a restored history entry)
            active_workouts.entry(id.clone()).or_insert(current);
            id
        });

        let start_time = current_workout_id.as_ref().and(start_time);

        StoreState {
            current_workout_id,
            active_workouts,
            workout_history,
            start_time,
        }
    }
}
