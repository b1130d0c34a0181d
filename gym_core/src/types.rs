//! Core domain types for Gym Buddy.
//!
//! - Templates: immutable workout definitions from the catalog
//! - Sessions: materialized, mutable copies tracking per-set progress
//! - Outcome: what a store operation did
//!
//! Field names serialize in camelCase so persisted snapshots keep the
//! `currentWorkout` / `setDetails` layout.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Template Types
// ============================================================================

/// A prescribed exercise inside a workout template
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub weight_unit: String,
    pub rest_seconds: u32,
}

/// An immutable workout definition
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exercises: Vec<ExerciseTemplate>,
}

/// The static set of templates a user can start
#[derive(Clone, Debug)]
pub struct Catalog {
    pub workouts: Vec<WorkoutTemplate>,
}

// ============================================================================
// Session Types
// ============================================================================

/// Tracking record for a single set
///
/// Missing fields load as their defaults so one damaged record cannot take
/// the rest of a snapshot down with it.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SetRecord {
    pub id: String,
    #[serde(serialize_with = "finite_weight", deserialize_with = "null_as_default")]
    pub prescribed_weight: f64,
    #[serde(serialize_with = "finite_weight", deserialize_with = "null_as_default")]
    pub actual_weight: f64,
    pub reps: u32,
    pub is_completed: bool,
}

/// Merge-patch for the mutable fields of a [`SetRecord`]
///
/// `None` leaves the field as it is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetUpdate {
    pub actual_weight: Option<f64>,
    pub reps: Option<u32>,
    pub is_completed: Option<bool>,
}

impl SetUpdate {
    pub fn reps(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actual_weight.is_none() && self.reps.is_none() && self.is_completed.is_none()
    }
}

impl SetRecord {
    /// Apply a merge-patch in place
    pub fn apply(&mut self, update: &SetUpdate) {
        if let Some(weight) = update.actual_weight {
            self.actual_weight = weight;
        }
        if let Some(reps) = update.reps {
            self.reps = reps;
        }
        if let Some(done) = update.is_completed {
            self.is_completed = done;
        }
    }
}

/// An exercise inside a running session
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseSession {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(serialize_with = "finite_weight", deserialize_with = "null_as_default")]
    pub weight: f64,
    pub weight_unit: String,
    pub rest_seconds: u32,
    pub set_details: Vec<SetRecord>,
}

impl ExerciseSession {
    /// Borrow the set at `set_index`, if it exists
    pub fn set(&self, set_index: usize) -> Option<&SetRecord> {
        self.set_details.get(set_index)
    }
}

impl From<&ExerciseTemplate> for ExerciseSession {
    fn from(template: &ExerciseTemplate) -> Self {
        ExerciseSession {
            id: template.id.clone(),
            name: template.name.clone(),
            sets: template.sets,
            reps: template.reps,
            weight: template.weight,
            weight_unit: template.weight_unit.clone(),
            rest_seconds: template.rest_seconds,
            set_details: Vec::new(),
        }
    }
}

/// A materialized workout tracking actual per-set progress
///
/// While active, `id` is the template id. History entries carry
/// `<template id>-<completion epoch millis>`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutSession {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exercises: Vec<ExerciseSession>,
}

impl WorkoutSession {
    /// Look up an exercise by id
    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseSession> {
        self.exercises.iter().find(|ex| ex.id == exercise_id)
    }

    /// Look up a set by exercise id and index
    pub fn set(&self, exercise_id: &str, set_index: usize) -> Option<&SetRecord> {
        self.exercise(exercise_id).and_then(|ex| ex.set(set_index))
    }

    pub(crate) fn set_mut(&mut self, exercise_id: &str, set_index: usize) -> Option<&mut SetRecord> {
        self.exercises
            .iter_mut()
            .find(|ex| ex.id == exercise_id)
            .and_then(|ex| ex.set_details.get_mut(set_index))
    }
}

impl From<&WorkoutTemplate> for WorkoutSession {
    fn from(template: &WorkoutTemplate) -> Self {
        WorkoutSession {
            id: template.id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            exercises: template.exercises.iter().map(ExerciseSession::from).collect(),
        }
    }
}

// ============================================================================
// Wire Helpers
// ============================================================================

/// JSON has no NaN or infinity; write 0 instead of `null`
fn finite_weight<S: Serializer>(weight: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let weight = if weight.is_finite() { *weight } else { 0.0 };
    serializer.serialize_f64(weight)
}

/// Treat an explicit `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Operation Results
// ============================================================================

/// What a store operation did
///
/// Missing targets are never errors; this only lets a caller tell a stale id
/// apart from an applied change when it cares to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and was handed to persistence
    Applied,
    /// No current workout, unknown id, or set index out of range
    NoTarget,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
