use embassy_time::{Duration, Instant};

use super::{DebounceState, DebouncerTrait};
use crate::DEBOUNCE_THRESHOLD;
use crate::line::Line;

/// Tracks the debounce state of a single line.
#[derive(Copy, Clone, Debug, PartialEq)]
enum DebounceCounter {
    /// The line is stable.
    Idle,
    /// The line level differs from the registered one since the given instant.
    Debouncing(Instant),
}

/// Time-based debouncer: a level change is accepted once it has been stable for the threshold.
pub struct DefaultDebouncer {
    counters: [DebounceCounter; 2],
    threshold: Duration,
}

impl Default for DefaultDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultDebouncer {
    pub fn new() -> Self {
        Self::with_threshold(Duration::from_millis(DEBOUNCE_THRESHOLD as u64))
    }

    pub fn with_threshold(threshold: Duration) -> Self {
        DefaultDebouncer {
            counters: [DebounceCounter::Idle; 2],
            threshold,
        }
    }
}

impl DebouncerTrait for DefaultDebouncer {
    fn detect_change_with_debounce(
        &mut self,
        line: Line,
        active: bool,
        registered: bool,
        now: Instant,
    ) -> DebounceState {
        let counter = &mut self.counters[line.index()];

        // Level matches the registered state, nothing to debounce
        if registered == active {
            *counter = DebounceCounter::Idle;
            return DebounceState::Ignored;
        }

        match *counter {
            DebounceCounter::Idle if self.threshold == Duration::from_ticks(0) => DebounceState::Debounced,
            DebounceCounter::Idle => {
                *counter = DebounceCounter::Debouncing(now);
                DebounceState::InProgress
            }
            DebounceCounter::Debouncing(start) => {
                if now.saturating_duration_since(start) >= self.threshold {
                    *counter = DebounceCounter::Idle;
                    DebounceState::Debounced
                } else {
                    DebounceState::InProgress
                }
            }
        }
    }
}
