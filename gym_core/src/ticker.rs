//! Live tick sources for the timers.
//!
//! A [`Ticker`] is a background thread that sends a message on a channel
//! every interval until it is dropped. [`TimerDeck`] owns the elapsed and
//! rest timers and keeps at most one ticker per timer, re-syncing them
//! after every timer transition. Ticker threads never touch timer state;
//! ticks are applied on the owner's thread when it drains the channel.

use crate::timer::{ElapsedTimer, RestTimer, TimerEvent};
use crate::{Error, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Which timer a tick belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickSource {
    Elapsed,
    Rest,
}

/// A tick message; `generation` identifies the ticker that sent it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub source: TickSource,
    pub generation: u64,
}

/// Background tick source, stopped and joined on drop
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(tick: Tick, interval: Duration, tx: Sender<Tick>) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name(format!("ticker-{:?}-{}", tick.source, tick.generation).to_lowercase())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(tick).is_err() {
                            break;
                        }
                    }
                    // Stop requested or owner gone
                    _ => break,
                }
            })
            .map_err(|e| Error::Other(format!("failed to spawn ticker thread: {}", e)))?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The pair of session timers plus their tick sources
pub struct TimerDeck {
    elapsed: ElapsedTimer,
    rest: RestTimer,
    interval: Duration,
    tx: Sender<Tick>,
    rx: Receiver<Tick>,
    generation: u64,
    elapsed_source: Option<(u64, Ticker)>,
    rest_source: Option<(u64, Ticker)>,
}

impl TimerDeck {
    pub fn new(interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            elapsed: ElapsedTimer::new(),
            rest: RestTimer::new(),
            interval,
            tx,
            rx,
            generation: 0,
            elapsed_source: None,
            rest_source: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn elapsed(&self) -> &ElapsedTimer {
        &self.elapsed
    }

    pub fn rest(&self) -> &RestTimer {
        &self.rest
    }

    /// Number of ticker threads currently alive
    pub fn live_sources(&self) -> usize {
        usize::from(self.elapsed_source.is_some()) + usize::from(self.rest_source.is_some())
    }

    // ------------------------------------------------------------------
    // Elapsed timer
    // ------------------------------------------------------------------

    pub fn start_elapsed(&mut self) {
        self.elapsed.start();
        self.sync(TickSource::Elapsed, true);
    }

    pub fn pause_elapsed(&mut self) {
        self.elapsed.pause();
        self.sync(TickSource::Elapsed, false);
    }

    pub fn resume_elapsed(&mut self) {
        self.elapsed.resume();
        self.sync(TickSource::Elapsed, false);
    }

    pub fn reset_elapsed(&mut self) {
        self.elapsed.reset();
        self.sync(TickSource::Elapsed, false);
    }

    pub fn toggle_elapsed(&mut self) {
        self.elapsed.toggle();
        self.sync(TickSource::Elapsed, false);
    }

    // ------------------------------------------------------------------
    // Rest timer
    // ------------------------------------------------------------------

    pub fn start_rest(&mut self, seconds: u32) {
        self.rest.start_rest(seconds);
        self.sync(TickSource::Rest, true);
    }

    pub fn cancel_rest(&mut self) {
        self.rest.cancel_rest();
        self.sync(TickSource::Rest, false);
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Advance one timer by one unit without a live source
    pub fn tick(&mut self, source: TickSource) -> Option<TimerEvent> {
        let event = match source {
            TickSource::Elapsed => self.elapsed.tick(),
            TickSource::Rest => self.rest.tick(),
        };
        if event == Some(TimerEvent::RestExpired) {
            self.sync(TickSource::Rest, false);
        }
        event
    }

    /// Apply every tick that has arrived so far
    pub fn pump(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(tick) = self.rx.try_recv() {
            events.extend(self.apply(tick));
        }
        events
    }

    /// Block up to `timeout` for the next tick, then drain the rest
    pub fn wait(&mut self, timeout: Duration) -> Vec<TimerEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();

        while events.is_empty() && self.live_sources() > 0 {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(tick) => events.extend(self.apply(tick)),
                Err(_) => break,
            }
        }

        events.extend(self.pump());
        events
    }

    fn apply(&mut self, tick: Tick) -> Option<TimerEvent> {
        let live = match tick.source {
            TickSource::Elapsed => &self.elapsed_source,
            TickSource::Rest => &self.rest_source,
        };
        // Ticks still queued from a torn-down source are dropped
        if live.as_ref().map(|(generation, _)| *generation) != Some(tick.generation) {
            return None;
        }
        self.tick(tick.source)
    }

    /// Make the live source for `source` match its timer's run state
    ///
    /// `restart` tears down a running source and spawns a fresh one, so a
    /// re-entered running state never stacks two sources.
    fn sync(&mut self, source: TickSource, restart: bool) {
        let running = match source {
            TickSource::Elapsed => self.elapsed.is_running(),
            TickSource::Rest => self.rest.is_resting(),
        };
        let has_source = match source {
            TickSource::Elapsed => self.elapsed_source.is_some(),
            TickSource::Rest => self.rest_source.is_some(),
        };

        if !running || restart {
            // Dropping joins the thread
            match source {
                TickSource::Elapsed => self.elapsed_source = None,
                TickSource::Rest => self.rest_source = None,
            }
        }

        if running && (restart || !has_source) {
            self.generation += 1;
            let tick = Tick {
                source,
                generation: self.generation,
            };
            match Ticker::spawn(tick, self.interval, self.tx.clone()) {
                Ok(ticker) => {
                    let slot = match source {
                        TickSource::Elapsed => &mut self.elapsed_source,
                        TickSource::Rest => &mut self.rest_source,
                    };
                    *slot = Some((tick.generation, ticker));
                }
                Err(e) => tracing::warn!("Timer {:?} has no tick source: {}", source, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: Duration = Duration::from_millis(5);

    fn wait_for(deck: &mut TimerDeck, wanted: TimerEvent) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if deck.wait(Duration::from_millis(100)).contains(&wanted) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_sources_follow_run_state() {
        let mut deck = TimerDeck::new(Duration::from_secs(3600));
        assert_eq!(deck.live_sources(), 0);

        deck.start_elapsed();
        assert_eq!(deck.live_sources(), 1);

        deck.start_rest(60);
        assert_eq!(deck.live_sources(), 2);

        deck.pause_elapsed();
        deck.cancel_rest();
        assert_eq!(deck.live_sources(), 0);

        deck.toggle_elapsed();
        assert_eq!(deck.live_sources(), 1);
        deck.reset_elapsed();
        assert_eq!(deck.live_sources(), 0);
    }

    #[test]
    fn test_restart_never_stacks_sources() {
        let mut deck = TimerDeck::new(Duration::from_secs(3600));
        for _ in 0..5 {
            deck.start_elapsed();
            deck.start_rest(30);
            deck.resume_elapsed();
        }
        assert_eq!(deck.live_sources(), 2);
    }

    #[test]
    fn test_manual_rest_expiry_releases_source() {
        let mut deck = TimerDeck::new(Duration::from_secs(3600));
        deck.start_rest(2);
        assert_eq!(deck.tick(TickSource::Rest), Some(TimerEvent::RestTick { remaining: 1 }));
        assert_eq!(deck.tick(TickSource::Rest), Some(TimerEvent::RestExpired));
        assert_eq!(deck.live_sources(), 0);
        assert_eq!(deck.tick(TickSource::Rest), None);
    }

    #[test]
    fn test_live_rest_countdown_expires_once() {
        let mut deck = TimerDeck::new(FAST);
        deck.start_rest(3);

        assert!(wait_for(&mut deck, TimerEvent::RestExpired));
        assert!(!deck.rest().is_resting());
        assert_eq!(deck.live_sources(), 0);

        std::thread::sleep(FAST * 4);
        assert!(deck.pump().is_empty());
    }

    #[test]
    fn test_live_elapsed_advances_and_pause_stops_it() {
        let mut deck = TimerDeck::new(FAST);
        deck.start_elapsed();
        assert!(wait_for(&mut deck, TimerEvent::ElapsedTick { elapsed: 2 }));

        deck.pause_elapsed();
        let frozen = deck.elapsed().elapsed();
        std::thread::sleep(FAST * 4);
        deck.pump();
        assert_eq!(deck.elapsed().elapsed(), frozen);
    }

    #[test]
    fn test_stale_ticks_are_dropped() {
        let mut deck = TimerDeck::new(FAST);
        deck.start_rest(1000);
        std::thread::sleep(FAST * 40);

        // Restart without draining: queued ticks belong to the old source
        deck.start_rest(1000);
        deck.pump();
        assert!(
            deck.rest().time_left() > 990,
            "stale ticks applied: {} left",
            deck.rest().time_left()
        );
    }
}
