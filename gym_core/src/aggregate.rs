//! Pure derivations over a workout session.

use crate::{ExerciseSession, WorkoutSession};

/// Prescribed set count across all exercises
pub fn total_sets(workout: &WorkoutSession) -> u32 {
    workout.exercises.iter().map(|ex| ex.sets).sum()
}

/// Completed set count across all exercises
pub fn completed_sets(workout: &WorkoutSession) -> u32 {
    workout
        .exercises
        .iter()
        .map(exercise_completed_count)
        .sum()
}

/// Sum of `actual_weight * reps` over completed sets only
pub fn total_volume(workout: &WorkoutSession) -> f64 {
    workout
        .exercises
        .iter()
        .flat_map(|ex| ex.set_details.iter())
        .filter(|set| set.is_completed)
        .map(|set| set.actual_weight * f64::from(set.reps))
        .sum()
}

/// Rounded percentage of sets completed; 0 for a session with no sets
pub fn completion_percentage(workout: &WorkoutSession) -> u32 {
    let total = total_sets(workout);
    if total == 0 {
        return 0;
    }
    let completed = completed_sets(workout);
    (f64::from(completed) * 100.0 / f64::from(total)).round() as u32
}

/// True when every set of the exercise is completed
pub fn is_exercise_complete(exercise: &ExerciseSession) -> bool {
    exercise.set_details.iter().all(|set| set.is_completed)
}

pub fn exercise_completed_count(exercise: &ExerciseSession) -> u32 {
    exercise
        .set_details
        .iter()
        .filter(|set| set.is_completed)
        .count() as u32
}

pub fn is_workout_complete(workout: &WorkoutSession) -> bool {
    workout.exercises.iter().all(is_exercise_complete)
}

/// Render seconds as `m:ss`
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
