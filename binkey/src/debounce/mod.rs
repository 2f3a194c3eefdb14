use embassy_time::Instant;

use crate::line::Line;

pub mod default_debouncer;

pub trait DebouncerTrait {
    /// Feed the raw `active` level of `line` sampled at `now`, `registered` is the last debounced level
    fn detect_change_with_debounce(&mut self, line: Line, active: bool, registered: bool, now: Instant)
    -> DebounceState;
}

/// Debounce state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DebounceState {
    Debounced,
    InProgress,
    Ignored,
}
