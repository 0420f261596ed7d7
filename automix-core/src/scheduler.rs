//! Fixed-tick scheduling for the automation engine
//!
//! One scheduler owns every cadence so a frame always applies ticks in the
//! same order: automation (assigns targets), then easing (consumes them),
//! then waveform scroll.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Upper bound on ticks of one cadence replayed in a single frame
pub const MAX_CATCH_UP_TICKS: u32 = 250;

/// Source of elapsed milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock, zero at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for tests and offline rendering
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::Relaxed);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

/// A periodic tick with its next due time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period_ms: u64,
    next_due_ms: u64,
}

impl Cadence {
    /// First tick is due immediately at `start_ms`
    pub fn new(period_ms: u64, start_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: start_ms,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Count ticks due at `now_ms`, at most `max`
    ///
    /// When more than `max` are due the backlog is dropped and the next tick
    /// is rescheduled one period after `now_ms`.
    pub fn take_due(&mut self, now_ms: u64, max: u32) -> u32 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let due = (now_ms - self.next_due_ms) / self.period_ms + 1;
        if due > max as u64 {
            self.next_due_ms = now_ms + self.period_ms;
            return max;
        }
        self.next_due_ms += due * self.period_ms;
        due as u32
    }

    /// Restart so the next tick is due at `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms;
    }
}

/// Ticks due in one frame, per cadence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueTicks {
    pub automation: u32,
    pub easing: u32,
    pub scroll: u32,
}

impl DueTicks {
    pub fn is_empty(&self) -> bool {
        self.automation == 0 && self.easing == 0 && self.scroll == 0
    }
}

/// The three cadences of the engine
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    automation: Cadence,
    easing: Cadence,
    scroll: Cadence,
}

impl TickScheduler {
    pub fn new(automation_ms: u64, easing_ms: u64, scroll_ms: u64, start_ms: u64) -> Self {
        Self {
            automation: Cadence::new(automation_ms, start_ms),
            easing: Cadence::new(easing_ms, start_ms),
            scroll: Cadence::new(scroll_ms, start_ms),
        }
    }

    /// Collect ticks due at `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> DueTicks {
        DueTicks {
            automation: self.automation.take_due(now_ms, MAX_CATCH_UP_TICKS),
            easing: self.easing.take_due(now_ms, MAX_CATCH_UP_TICKS),
            scroll: self.scroll.take_due(now_ms, MAX_CATCH_UP_TICKS),
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.automation.reset(now_ms);
        self.easing.reset(now_ms);
        self.scroll.reset(now_ms);
    }

    pub fn scroll_period_ms(&self) -> u64 {
        self.scroll.period_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_immediate() {
        let mut c = Cadence::new(50, 0);
        assert_eq!(c.take_due(0, 10), 1);
        assert_eq!(c.take_due(49, 10), 0);
        assert_eq!(c.take_due(50, 10), 1);
    }

    #[test]
    fn test_multiple_due() {
        let mut c = Cadence::new(50, 0);
        assert_eq!(c.take_due(120, 10), 3); // 0, 50, 100
        assert_eq!(c.take_due(149, 10), 0);
        assert_eq!(c.take_due(150, 10), 1);
    }

    #[test]
    fn test_backlog_capped() {
        let mut c = Cadence::new(10, 0);
        assert_eq!(c.take_due(100_000, 5), 5);
        // Rescheduled relative to now, not replaying the backlog
        assert_eq!(c.take_due(100_005, 5), 0);
        assert_eq!(c.take_due(100_010, 5), 1);
    }

    #[test]
    fn test_zero_period_treated_as_one() {
        let mut c = Cadence::new(0, 0);
        assert_eq!(c.period_ms(), 1);
        assert_eq!(c.take_due(3, 10), 4);
    }

    #[test]
    fn test_scheduler_cadences_independent() {
        let mut s = TickScheduler::new(1000, 50, 30, 0);
        let due = s.advance(0);
        assert_eq!(
            due,
            DueTicks {
                automation: 1,
                easing: 1,
                scroll: 1
            }
        );
        let due = s.advance(100);
        assert_eq!(due.automation, 0);
        assert_eq!(due.easing, 2);
        assert_eq!(due.scroll, 3);
        assert!(s.advance(100).is_empty());
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(10);
        clock.advance(5);
        assert_eq!(clock.now_ms(), 15);
        clock.set(100);
        assert_eq!(clock.now_ms(), 100);
    }
}
