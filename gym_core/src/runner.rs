//! Drives a session: store transitions, rest timing and feedback together.
//!
//! The store stays unaware of timers and feedback. The runner inspects each
//! transition it requests and fires whatever follows from it.

use crate::aggregate::{completed_sets, is_exercise_complete};
use crate::feedback::{FeedbackDispatcher, FeedbackEvent};
use crate::store::SessionStore;
use crate::ticker::TimerDeck;
use crate::timer::TimerEvent;
use crate::{Outcome, WorkoutTemplate};
use std::time::Duration;

pub struct WorkoutRunner {
    store: SessionStore,
    timers: TimerDeck,
    feedback: FeedbackDispatcher,
}

impl WorkoutRunner {
    pub fn new(store: SessionStore, timers: TimerDeck, feedback: FeedbackDispatcher) -> Self {
        Self {
            store,
            timers,
            feedback,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    pub fn timers(&self) -> &TimerDeck {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerDeck {
        &mut self.timers
    }

    /// Start or resume a workout and restart the elapsed clock
    pub fn start(&mut self, template: &WorkoutTemplate) -> Outcome {
        let outcome = self.store.start(template);
        self.timers.cancel_rest();
        self.timers.start_elapsed();
        outcome
    }

    /// Bring a finished workout back as the current one
    pub fn restore(&mut self, history_id: &str) -> Outcome {
        let outcome = self.store.restore_workout(history_id);
        if outcome.is_applied() {
            self.timers.cancel_rest();
            self.timers.start_elapsed();
        }
        outcome
    }

    /// Toggle a set, starting or cancelling the rest countdown to match
    pub fn toggle_set(&mut self, exercise_id: &str, set_index: usize) -> Outcome {
        let was_completed = match self
            .store
            .current_workout()
            .and_then(|w| w.set(exercise_id, set_index))
        {
            Some(set) => set.is_completed,
            None => return Outcome::NoTarget,
        };

        let outcome = self.store.toggle_set_completion(exercise_id, set_index);
        if !outcome.is_applied() {
            return outcome;
        }

        if was_completed {
            self.timers.cancel_rest();
            return outcome;
        }

        let Some(exercise) = self
            .store
            .current_workout()
            .and_then(|w| w.exercise(exercise_id))
        else {
            return outcome;
        };
        let rest_seconds = exercise.rest_seconds;
        let exercise_done = is_exercise_complete(exercise);

        self.timers.start_rest(rest_seconds);
        self.feedback.dispatch(FeedbackEvent::SetCompleted);
        if exercise_done {
            self.feedback.dispatch(FeedbackEvent::ExerciseCompleted);
        }
        outcome
    }

    pub fn update_weight(&mut self, exercise_id: &str, set_index: usize, weight: f64) -> Outcome {
        self.store.update_set_weight(exercise_id, set_index, weight)
    }

    /// Finish the current workout, celebrating first
    pub fn finish(&mut self) -> Outcome {
        let Some(current) = self.store.current_workout() else {
            return Outcome::NoTarget;
        };
        let completed = completed_sets(current);

        self.feedback.dispatch(FeedbackEvent::WorkoutFinished {
            completed_sets: completed,
        });
        let outcome = self.store.complete_workout();
        self.timers.cancel_rest();
        self.timers.reset_elapsed();
        outcome
    }

    /// Abandon the current workout and stop both timers
    pub fn cancel(&mut self) -> Outcome {
        let outcome = self.store.cancel_workout();
        self.timers.cancel_rest();
        self.timers.reset_elapsed();
        outcome
    }

    /// Apply pending ticks and fire feedback for them
    pub fn pump(&mut self) -> Vec<TimerEvent> {
        let events = self.timers.pump();
        self.after_ticks(&events);
        events
    }

    /// Block up to `timeout` for ticks, then handle them like [`pump`](Self::pump)
    pub fn wait(&mut self, timeout: Duration) -> Vec<TimerEvent> {
        let events = self.timers.wait(timeout);
        self.after_ticks(&events);
        events
    }

    fn after_ticks(&mut self, events: &[TimerEvent]) {
        for event in events {
            if *event == TimerEvent::RestExpired {
                self.feedback.dispatch(FeedbackEvent::RestExpired);
            }
        }
        self.store.flush_if_due();
    }
}
