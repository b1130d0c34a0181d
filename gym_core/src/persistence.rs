//! Persistence adapter for the session store.
//!
//! Saves are best-effort: failures are logged and the in-memory state stays
//! authoritative. Loads never fail; a missing, unreadable or corrupt
//! snapshot yields the default state.

use crate::state::{Snapshot, StoreState};
use crate::storage::KeyValueStore;
use std::time::{Duration, Instant};

/// Storage key for the serialized session store
pub const SNAPSHOT_KEY: &str = "gym-buddy-redux-state";
/// Storage key for the last selected view
pub const VIEW_KEY: &str = "gym-buddy-current-view";
/// Storage key for the theme preference
pub const THEME_KEY: &str = "gym-buddy-theme";

/// When snapshots reach storage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritePolicy {
    /// Every save writes the full snapshot before returning
    Immediate,
    /// At most one write per window; saves inside the window leave a pending
    /// snapshot for `flush` / `flush_if_due`
    Coalesce { window: Duration },
}

impl WritePolicy {
    /// `0` means immediate
    pub fn from_millis(coalesce_ms: u64) -> Self {
        if coalesce_ms == 0 {
            WritePolicy::Immediate
        } else {
            WritePolicy::Coalesce {
                window: Duration::from_millis(coalesce_ms),
            }
        }
    }
}

pub struct Persistence {
    backend: Box<dyn KeyValueStore>,
    policy: WritePolicy,
    last_write: Option<Instant>,
    pending: Option<String>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            policy: WritePolicy::Immediate,
            last_write: None,
            pending: None,
        }
    }

    pub fn with_policy(mut self, policy: WritePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the stored state, falling back to defaults
    pub fn load(&self) -> StoreState {
        let raw = match self.backend.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("No saved workout state found, starting fresh");
                return StoreState::default();
            }
            Err(e) => {
                tracing::warn!("Unable to read workout state: {}. Using defaults.", e);
                return StoreState::default();
            }
        };

        match serde_json::from_str::<Snapshot>(&raw) {
            Ok(snapshot) => {
                let state = StoreState::from(snapshot);
                tracing::debug!(
                    "Loaded workout state: {} active, {} in history",
                    state.active_workouts().len(),
                    state.workout_history().len()
                );
                state
            }
            Err(e) => {
                tracing::warn!("Failed to parse workout state: {}. Using defaults.", e);
                StoreState::default()
            }
        }
    }

    /// Save the full state according to the write policy
    pub fn save(&mut self, state: &StoreState) {
        let contents = match serde_json::to_string(&Snapshot::from(state)) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!("Failed to serialize workout state: {}", e);
                return;
            }
        };

        match self.policy {
            WritePolicy::Immediate => self.write(contents),
            WritePolicy::Coalesce { window } => {
                let recently_written = self
                    .last_write
                    .map(|at| at.elapsed() < window)
                    .unwrap_or(false);

                if recently_written {
                    tracing::trace!("Coalescing workout state write");
                    self.pending = Some(contents);
                } else {
                    self.write(contents);
                }
            }
        }
    }

    /// True if a coalesced snapshot has not reached storage yet
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Write the pending snapshot, if any
    pub fn flush(&mut self) {
        if let Some(contents) = self.pending.take() {
            self.write(contents);
        }
    }

    /// Write the pending snapshot once its coalescing window has passed
    pub fn flush_if_due(&mut self) {
        let due = match (self.policy, self.last_write) {
            (WritePolicy::Coalesce { window }, Some(at)) => at.elapsed() >= window,
            _ => true,
        };
        if due {
            self.flush();
        }
    }

    fn write(&mut self, contents: String) {
        self.pending = None;
        self.last_write = Some(Instant::now());
        match self.backend.set(SNAPSHOT_KEY, &contents) {
            Ok(()) => tracing::debug!("Saved workout state ({} bytes)", contents.len()),
            Err(e) => tracing::warn!("Error saving workout state: {}", e),
        }
    }
}
