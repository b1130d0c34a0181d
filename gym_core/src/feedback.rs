//! Haptic, audio and notification feedback.
//!
//! The session core only reports *what happened* as a [`FeedbackEvent`].
//! [`FeedbackDispatcher`] maps each event onto a [`FeedbackSink`] using
//! fixed vibration patterns and cues. Sink failures are logged and never
//! reach the caller.

use crate::config::FeedbackConfig;
use crate::Result;

/// Vibration pattern for a completed set (ms on/off)
pub const SHORT: &[u32] = &[100];
/// Vibration pattern for an expired rest period
pub const MEDIUM: &[u32] = &[200, 100, 200];
/// Vibration pattern for a finished exercise or workout
pub const CELEBRATION: &[u32] = &[100, 50, 100, 50, 100, 50, 200];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Beep,
    Success,
}

/// A user-visible notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Notifications sharing a tag replace each other
    pub tag: String,
    pub vibrate: Vec<u32>,
}

/// Something the lifter should feel or hear about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackEvent {
    SetCompleted,
    ExerciseCompleted,
    RestExpired,
    WorkoutFinished { completed_sets: u32 },
}

/// Output device for feedback
pub trait FeedbackSink {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<()>;
    fn play_sound(&mut self, cue: SoundCue) -> Result<()>;
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

/// Sink that only writes to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<()> {
        tracing::debug!("vibrate {:?}", pattern);
        Ok(())
    }

    fn play_sound(&mut self, cue: SoundCue) -> Result<()> {
        tracing::debug!("sound {:?}", cue);
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        tracing::info!(tag = %notification.tag, "{}: {}", notification.title, notification.body);
        Ok(())
    }
}

pub struct FeedbackDispatcher {
    sink: Box<dyn FeedbackSink>,
    config: FeedbackConfig,
}

impl FeedbackDispatcher {
    pub fn new(sink: impl FeedbackSink + 'static, config: FeedbackConfig) -> Self {
        Self {
            sink: Box::new(sink),
            config,
        }
    }

    /// Dispatcher that logs everything with all channels on
    pub fn logging() -> Self {
        Self::new(LogSink, FeedbackConfig::default())
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn dispatch(&mut self, event: FeedbackEvent) {
        tracing::debug!("Feedback for {:?}", event);
        match event {
            FeedbackEvent::SetCompleted => {
                self.vibrate(SHORT);
                self.sound(SoundCue::Beep);
            }
            FeedbackEvent::ExerciseCompleted => {
                self.vibrate(CELEBRATION);
            }
            FeedbackEvent::RestExpired => {
                self.vibrate(MEDIUM);
                self.sound(SoundCue::Beep);
                self.notify(Notification {
                    title: "Rest Time Over!".into(),
                    body: "Time to get back to work!".into(),
                    tag: "rest-timer".into(),
                    vibrate: MEDIUM.to_vec(),
                });
            }
            FeedbackEvent::WorkoutFinished { completed_sets } => {
                self.vibrate(CELEBRATION);
                self.sound(SoundCue::Success);
                self.notify(Notification {
                    title: "Workout Complete!".into(),
                    body: format!("Great job! You completed {} sets today!", completed_sets),
                    tag: "workout-complete".into(),
                    vibrate: CELEBRATION.to_vec(),
                });
            }
        }
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        if !self.config.vibration {
            return;
        }
        if let Err(e) = self.sink.vibrate(pattern) {
            tracing::warn!("Vibration failed: {}", e);
        }
    }

    fn sound(&mut self, cue: SoundCue) {
        if !self.config.sound {
            return;
        }
        if let Err(e) = self.sink.play_sound(cue) {
            tracing::warn!("Sound {:?} failed: {}", cue, e);
        }
    }

    fn notify(&mut self, notification: Notification) {
        if !self.config.notifications {
            return;
        }
        if let Err(e) = self.sink.notify(&notification) {
            tracing::warn!("Notification '{}' failed: {}", notification.tag, e);
        }
    }
}
