#![forbid(unsafe_code)]

//! Core domain model and session engine for Gym Buddy.
//!
//! This crate provides:
//! - Workout templates, the default catalog and session materialization
//! - The session store (start/resume, set updates, completion, history)
//! - Snapshot persistence over a key-value backend
//! - Elapsed and rest timers with live tick sources
//! - Feedback dispatch, preferences and history reports

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod materialize;
pub mod aggregate;
pub mod storage;
pub mod state;
pub mod persistence;
pub mod clock;
pub mod store;
pub mod timer;
pub mod ticker;
pub mod feedback;
pub mod runner;
pub mod prefs;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use materialize::{materialize, materialize_session};
pub use aggregate::{
    completed_sets, completion_percentage, exercise_completed_count, format_clock,
    is_exercise_complete, is_workout_complete, total_sets, total_volume,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use state::{Snapshot, StoreState};
pub use persistence::{Persistence, WritePolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use store::SessionStore;
pub use timer::{ElapsedTimer, RestTimer, TimerEvent};
pub use ticker::{TickSource, TimerDeck};
pub use feedback::{FeedbackDispatcher, FeedbackEvent, FeedbackSink, LogSink, Notification, SoundCue};
pub use runner::WorkoutRunner;
pub use prefs::{AppPreferences, Theme, ViewKind};
pub use history::{export_history_csv, summarize_history, HistorySummary};
