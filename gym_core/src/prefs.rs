//! Small UI preferences stored next to the session snapshot.

use crate::persistence::{THEME_KEY, VIEW_KEY};
use crate::storage::KeyValueStore;
use crate::Result;
use std::fmt;

/// Which screen the app opens on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewKind {
    #[default]
    Activity,
    Plan,
    Workout,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Activity => "activity",
            ViewKind::Plan => "plan",
            ViewKind::Workout => "workout",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "activity" => Some(ViewKind::Activity),
            "plan" => Some(ViewKind::Plan),
            "workout" => Some(ViewKind::Workout),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppPreferences {
    pub view: ViewKind,
    pub theme: Theme,
}

impl AppPreferences {
    /// Read both preferences; unreadable or unknown values use defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let view = read(store, VIEW_KEY)
            .and_then(|raw| ViewKind::parse(&raw))
            .unwrap_or_default();
        let theme = read(store, THEME_KEY)
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default();
        Self { view, theme }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        store.set(VIEW_KEY, self.view.as_str())?;
        store.set(THEME_KEY, self.theme.as_str())?;
        Ok(())
    }
}

fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to read preference '{}': {}", key, e);
            None
        }
    }
}
