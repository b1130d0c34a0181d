//! Elapsed and rest timers.
//!
//! Both timers are plain state machines advanced one unit per `tick()`. They
//! know nothing about feedback: a tick returns a [`TimerEvent`] and whoever
//! drives the timer decides what to do with it. Live tick sources live in
//! [`crate::ticker`].

/// What a tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// The elapsed timer advanced
    ElapsedTick { elapsed: u64 },
    /// The rest countdown advanced and is still running
    RestTick { remaining: u32 },
    /// The rest countdown reached zero; emitted once per rest period
    RestExpired,
}

/// Count-up workout clock
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElapsedTimer {
    elapsed: u64,
    running: bool,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset to zero and run
    pub fn start(&mut self) {
        self.elapsed = 0;
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Zero and stop
    pub fn reset(&mut self) {
        self.elapsed = 0;
        self.running = false;
    }

    /// Flip running/paused, keeping the count
    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.elapsed += 1;
        Some(TimerEvent::ElapsedTick {
            elapsed: self.elapsed,
        })
    }
}

/// Countdown between sets
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestTimer {
    time_left: u32,
    resting: bool,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    /// Begin a countdown of `seconds`
    ///
    /// Restarting while resting replaces the countdown. Zero seconds leaves
    /// the timer idle and never expires.
    pub fn start_rest(&mut self, seconds: u32) {
        self.time_left = seconds;
        self.resting = seconds > 0;
    }

    pub fn cancel_rest(&mut self) {
        self.time_left = 0;
        self.resting = false;
    }

    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.resting {
            return None;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.resting = false;
            Some(TimerEvent::RestExpired)
        } else {
            Some(TimerEvent::RestTick {
                remaining: self.time_left,
            })
        }
    }
}
