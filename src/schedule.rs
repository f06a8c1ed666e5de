//! Single-slot deferred action, polled by clock ticks.
//!
//! The engine never owns a timer thread. Scheduling stores a due instant and
//! the next `poll` at or past that instant hands the action back exactly once.
//! Only one action can be pending: scheduling replaces whatever was pending,
//! and a [`CancelHandle`] only cancels the action it was issued for.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelHandle {
    generation: u64,
}

#[derive(Debug)]
struct Pending<A> {
    action: A,
    due: Instant,
    generation: u64,
}

#[derive(Debug)]
pub struct Scheduler<A> {
    pending: Option<Pending<A>>,
    generation: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }
}

impl<A: Copy> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay` after `now`, dropping any pending one.
    pub fn after(&mut self, now: Instant, delay: Duration, action: A) -> CancelHandle {
        self.generation += 1;
        self.pending = Some(Pending {
            action,
            due: now + delay,
            generation: self.generation,
        });
        CancelHandle {
            generation: self.generation,
        }
    }

    /// Cancel the action `handle` was issued for. Stale handles are ignored.
    pub fn cancel(&mut self, handle: CancelHandle) -> bool {
        match &self.pending {
            Some(p) if p.generation == handle.generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Time left before the pending action fires, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due().map(|due| due.saturating_duration_since(now))
    }

    /// Take the pending action if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match &self.pending {
            Some(p) if now >= p.due => self.pending.take().map(|p| p.action),
            _ => None,
        }
    }
}
