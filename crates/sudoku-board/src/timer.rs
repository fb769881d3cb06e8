//! Session stopwatch and the deadline queue that drives animation ticks.

use std::time::{Duration, Instant};

const SECOND: Duration = Duration::from_secs(1);

/// Whole seconds since the last (re)start, advanced by a recurring 1 s tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTimer {
    elapsed_secs: u32,
    /// Deadline of the next one-second tick while running
    next_tick: Option<Instant>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from zero. Starting a running timer restarts it.
    pub fn start(&mut self, now: Instant) {
        self.elapsed_secs = 0;
        self.next_tick = Some(now + SECOND);
    }

    /// Stop counting; stopping a stopped timer is a no-op
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    /// Back to 0 and stopped
    pub fn reset(&mut self) {
        self.elapsed_secs = 0;
        self.next_tick = None;
    }

    /// Count every whole second that has passed up to `now`
    pub fn advance(&mut self, now: Instant) {
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            self.next_tick = Some(deadline + SECOND);
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format_time(self.elapsed_secs)
    }
}

/// Format seconds as `MM:SS`
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Pending timer callbacks, fired in deadline order.
///
/// Nothing is ever removed except by firing: a callback that has been
/// superseded still fires and is expected to recognise itself as stale.
#[derive(Debug, Clone)]
pub struct TickQueue<T> {
    // Kept sorted by deadline; insertion order breaks ties
    pending: Vec<(Instant, T)>,
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<T> TickQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, item: T) {
        let index = self.pending.partition_point(|(at, _)| *at <= deadline);
        self.pending.insert(index, (deadline, item));
    }

    /// Remove and return the earliest item due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        match self.pending.first() {
            Some((deadline, _)) if *deadline <= now => Some(self.pending.remove(0).1),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|(deadline, _)| *deadline)
    }
}
