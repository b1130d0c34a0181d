//! Default catalog of workout templates.
//!
//! The built-in plans the session engine can start. Templates are never
//! mutated once defined.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds a fresh copy of the default catalog
///
/// **Note**: prefer `get_default_catalog()` outside of tests.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn exercise(
    id: &str,
    name: &str,
    sets: u32,
    reps: u32,
    weight: f64,
    weight_unit: &str,
    rest_seconds: u32,
) -> ExerciseTemplate {
    ExerciseTemplate {
        id: id.into(),
        name: name.into(),
        sets,
        reps,
        weight,
        weight_unit: weight_unit.into(),
        rest_seconds,
    }
}

fn build_default_catalog_internal() -> Catalog {
    let upper_body = WorkoutTemplate {
        id: "workout-upper-body".into(),
        name: "Upper Body Strength".into(),
        description: "Focus on chest, shoulders, and triceps".into(),
        exercises: vec![
            exercise("upper-ex-1", "Bench Press", 4, 8, 135.0, "lbs", 90),
            exercise("upper-ex-2", "Overhead Press", 3, 10, 65.0, "lbs", 60),
            exercise("upper-ex-3", "Tricep Dips", 3, 12, 0.0, "bodyweight", 45),
        ],
    };

    let lower_body = WorkoutTemplate {
        id: "workout-lower-body".into(),
        name: "Lower Body Strength".into(),
        description: "Focus on glutes, quads, and hamstrings".into(),
        exercises: vec![
            exercise("lower-ex-1", "Squats", 4, 10, 185.0, "lbs", 120),
            exercise("lower-ex-2", "Romanian Deadlifts", 3, 12, 135.0, "lbs", 90),
            exercise("lower-ex-3", "Leg Press", 3, 15, 270.0, "lbs", 90),
            exercise("lower-ex-4", "Lunges", 3, 12, 0.0, "bodyweight", 60),
        ],
    };

    Catalog {
        workouts: vec![upper_body, lower_body],
    }
}

impl Catalog {
    /// Find a template by id
    pub fn get(&self, template_id: &str) -> Option<&WorkoutTemplate> {
        self.workouts.iter().find(|w| w.id == template_id)
    }

    /// Validate catalog integrity
    ///
    /// Returns a list of validation errors (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut workout_ids = HashSet::new();
        let mut exercise_ids = HashSet::new();

        for workout in &self.workouts {
            if !workout_ids.insert(workout.id.as_str()) {
                errors.push(format!("Duplicate workout id '{}'", workout.id));
            }
            if workout.exercises.is_empty() {
                errors.push(format!("Workout '{}' has no exercises", workout.id));
            }

            for ex in &workout.exercises {
                // Set ids derive from exercise ids, so these must be unique catalog-wide
                if !exercise_ids.insert(ex.id.as_str()) {
                    errors.push(format!(
                        "Workout '{}': duplicate exercise id '{}'",
                        workout.id, ex.id
                    ));
                }
                if ex.sets == 0 {
                    errors.push(format!(
                        "Workout '{}': exercise '{}' prescribes zero sets",
                        workout.id, ex.id
                    ));
                }
                if ex.weight < 0.0 {
                    errors.push(format!(
                        "Workout '{}': exercise '{}' has negative weight {}",
                        workout.id, ex.id, ex.weight
                    ));
                }
            }
        }

        errors
    }
}
