//! Default values of the binkey configuration
//!
//! Timing must satisfy `PULSE < GAP < START_WINDOW < INACTIVITY_TIMEOUT`,
//! and one pulse period (`PULSE + GAP`) has to fit in the start window.

// ============================================================================
// Link timing
// ============================================================================

/// Active time of one bit pulse in milliseconds
pub const PULSE_MS: u64 = 20;

/// Idle time after each pulse in milliseconds
pub const GAP_MS: u64 = 25;

/// Maximum time between the two edges of the start symbol in milliseconds
pub const START_WINDOW_MS: u64 = 50;

/// Inactivity time after which a partially received byte is dropped, in milliseconds
pub const INACTIVITY_TIMEOUT_MS: u64 = 2000;

/// Default debounce time in milliseconds
pub const DEBOUNCE_TIME_MS: u16 = 5;

/// Interval between two line samples in microseconds
pub const POLL_INTERVAL_US: u64 = 500;

// ============================================================================
// Channels
// ============================================================================

/// Default edge channel size
pub const EDGE_CHANNEL_SIZE: usize = 16;

/// Default report channel size
pub const REPORT_CHANNEL_SIZE: usize = 16;

/// Largest accepted channel size
pub const CHANNEL_SIZE_LIMIT: usize = 256;
