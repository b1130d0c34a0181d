//! Expansion of workout templates into per-set tracking records.

use crate::{ExerciseSession, SetRecord, WorkoutSession, WorkoutTemplate};

/// Expand a template into a fresh session
///
/// Every exercise gets exactly `sets` records seeded from its prescription.
pub fn materialize(template: &WorkoutTemplate) -> WorkoutSession {
    materialize_session(&WorkoutSession::from(template))
}

/// Re-materialize an existing session
///
/// Exercises with well-formed `set_details` pass through untouched, so
/// `materialize_session(&materialize(t)) == materialize(t)`. Exercises with
/// no records are expanded; a record list whose length drifted from `sets`
/// is truncated or padded so `set_details.len() == sets` holds again.
pub fn materialize_session(session: &WorkoutSession) -> WorkoutSession {
    WorkoutSession {
        id: session.id.clone(),
        name: session.name.clone(),
        description: session.description.clone(),
        exercises: session.exercises.iter().map(materialize_exercise).collect(),
    }
}

fn materialize_exercise(exercise: &ExerciseSession) -> ExerciseSession {
    let wanted = exercise.sets as usize;
    let mut out = exercise.clone();

    if out.set_details.len() == wanted {
        return out;
    }

    if !out.set_details.is_empty() {
        tracing::debug!(
            "Exercise '{}' has {} set records for {} sets, reconciling",
            exercise.id,
            out.set_details.len(),
            wanted
        );
    }

    out.set_details.truncate(wanted);
    let existing = out.set_details.len();
    out.set_details
        .extend((existing..wanted).map(|index| fresh_set(exercise, index)));
    out
}

fn fresh_set(exercise: &ExerciseSession, index: usize) -> SetRecord {
    SetRecord {
        id: format!("{}-set-{}", exercise.id, index),
        prescribed_weight: exercise.weight,
        actual_weight: exercise.weight,
        reps: exercise.reps,
        is_completed: false,
    }
}
