//! The workout session store.
//!
//! Holds the current session, every parked session keyed by template id,
//! and the finished-session history. All mutation goes through the
//! operations here; each one hands the full resulting state to the
//! persistence adapter before returning.
//!
//! Lookups that miss (no current workout, unknown exercise, set index out
//! of range, unknown history id) are silent no-ops reported as
//! [`Outcome::NoTarget`].

use crate::clock::{to_millis_precision, Clock, SystemClock};
use crate::persistence::Persistence;
use crate::state::{Snapshot, StoreState};
use crate::{
    materialize, materialize_session, Outcome, SetUpdate, WorkoutSession, WorkoutTemplate,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub struct SessionStore {
    state: StoreState,
    persistence: Persistence,
    clock: Box<dyn Clock>,
}

impl SessionStore {
    /// Open the store, hydrating from persistence
    pub fn open(persistence: Persistence) -> Self {
        Self::with_clock(persistence, SystemClock)
    }

    /// Open the store with a custom time source
    pub fn with_clock(persistence: Persistence, clock: impl Clock + 'static) -> Self {
        let mut store = Self {
            state: StoreState::default(),
            persistence,
            clock: Box::new(clock),
        };
        store.hydrate();
        store
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn current_workout(&self) -> Option<&WorkoutSession> {
        self.state.current_workout()
    }

    pub fn active_workouts(&self) -> &BTreeMap<String, WorkoutSession> {
        self.state.active_workouts()
    }

    pub fn workout_history(&self) -> &[WorkoutSession] {
        self.state.workout_history()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.state.start_time()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// The state in its persisted wire form
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Start or resume the session for `template`
    ///
    /// A template already in `active_workouts` resumes with its progress;
    /// otherwise a fresh session is materialized. Any other active session
    /// stays parked.
    pub fn start(&mut self, template: &WorkoutTemplate) -> Outcome {
        if self.state.active_workouts.contains_key(&template.id) {
            tracing::info!("Resuming workout '{}'", template.id);
        } else {
            tracing::info!("Starting workout '{}'", template.id);
            self.state
                .active_workouts
                .insert(template.id.clone(), materialize(template));
        }

        self.state.current_workout_id = Some(template.id.clone());
        self.state.start_time = Some(self.now());
        self.persist();
        Outcome::Applied
    }

    /// Flip `is_completed` on one set of the current workout
    pub fn toggle_set_completion(&mut self, exercise_id: &str, set_index: usize) -> Outcome {
        self.mutate_set(exercise_id, set_index, |set| {
            set.is_completed = !set.is_completed;
        })
    }

    /// Set the actual weight lifted; no range validation happens here
    pub fn update_set_weight(&mut self, exercise_id: &str, set_index: usize, weight: f64) -> Outcome {
        self.mutate_set(exercise_id, set_index, |set| {
            set.actual_weight = weight;
        })
    }

    /// Merge-patch the mutable fields of one set
    pub fn update_set(&mut self, exercise_id: &str, set_index: usize, update: &SetUpdate) -> Outcome {
        self.mutate_set(exercise_id, set_index, |set| set.apply(update))
    }

    /// Move the current workout into history
    ///
    /// The history copy gets id `<id>-<epoch millis>`, bumped by a
    /// millisecond while it would collide with an existing entry.
    pub fn complete_workout(&mut self) -> Outcome {
        let Some(id) = self.state.current_workout_id.clone() else {
            return Outcome::NoTarget;
        };
        let Some(mut finished) = self.state.active_workouts.remove(&id) else {
            self.state.clear_current();
            return Outcome::NoTarget;
        };

        let mut millis = self.now().timestamp_millis();
        let mut history_id = format!("{}-{}", id, millis);
        while self.state.workout_history.iter().any(|w| w.id == history_id) {
            millis += 1;
            history_id = format!("{}-{}", id, millis);
        }

        finished.id = history_id;
        tracing::info!("Completed workout '{}' as '{}'", id, finished.id);
        self.state.workout_history.push(finished);
        self.state.clear_current();
        self.persist();
        Outcome::Applied
    }

    /// Abandon the current workout without recording it
    pub fn cancel_workout(&mut self) -> Outcome {
        let Some(id) = self.state.current_workout_id.take() else {
            return Outcome::NoTarget;
        };

        self.state.active_workouts.remove(&id);
        self.state.clear_current();
        tracing::info!("Cancelled workout '{}'", id);
        self.persist();
        Outcome::Applied
    }

    /// Discard a parked (or current) session without switching to it
    pub fn reset_workout(&mut self, template_id: &str) -> Outcome {
        if self.state.active_workouts.remove(template_id).is_none() {
            return Outcome::NoTarget;
        }

        if self.state.current_workout_id.as_deref() == Some(template_id) {
            self.state.clear_current();
        }

        tracing::info!("Reset workout '{}'", template_id);
        self.persist();
        Outcome::Applied
    }

    /// Make a past session current again with a fresh start time
    ///
    /// The restored copy is registered in `active_workouts` under its
    /// history id, replacing any earlier restore of the same entry.
    pub fn restore_workout(&mut self, history_id: &str) -> Outcome {
        let Some(past) = self
            .state
            .workout_history
            .iter()
            .find(|w| w.id == history_id)
        else {
            return Outcome::NoTarget;
        };

        let restored = materialize_session(past);
        self.state
            .active_workouts
            .insert(restored.id.clone(), restored);
        self.state.current_workout_id = Some(history_id.to_string());
        self.state.start_time = Some(self.now());

        tracing::info!("Restored workout '{}' from history", history_id);
        self.persist();
        Outcome::Applied
    }

    /// Empty the history log
    pub fn clear_history(&mut self) -> Outcome {
        let cleared = self.state.workout_history.len();
        self.state.workout_history.clear();
        tracing::info!("Cleared {} history entries", cleared);
        self.persist();
        Outcome::Applied
    }

    /// Replace in-memory state with whatever persistence holds
    pub fn hydrate(&mut self) {
        self.persistence.flush();
        self.state = self.persistence.load();
    }

    // ------------------------------------------------------------------
    // Persistence plumbing
    // ------------------------------------------------------------------

    /// Write any coalesced snapshot now
    pub fn flush(&mut self) {
        self.persistence.flush();
    }

    /// Write a coalesced snapshot once its window has passed
    pub fn flush_if_due(&mut self) {
        self.persistence.flush_if_due();
    }

    fn mutate_set<F>(&mut self, exercise_id: &str, set_index: usize, f: F) -> Outcome
    where
        F: FnOnce(&mut crate::SetRecord),
    {
        let Some(set) = self
            .state
            .current_workout_mut()
            .and_then(|w| w.set_mut(exercise_id, set_index))
        else {
            tracing::debug!(
                "No set {} on exercise '{}' in the current workout",
                set_index,
                exercise_id
            );
            return Outcome::NoTarget;
        };

        f(set);
        self.persist();
        Outcome::Applied
    }

    fn persist(&mut self) {
        self.persistence.save(&self.state);
    }

    fn now(&self) -> DateTime<Utc> {
        to_millis_precision(self.clock.now())
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.persistence.flush();
    }
}
