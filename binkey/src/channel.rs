//! Exposed channels which can be used to share data across tasks

use embassy_sync::channel::Channel;

use crate::hid::Report;
use crate::line::EdgeEvent;
use crate::{EDGE_CHANNEL_SIZE, REPORT_CHANNEL_SIZE, RawMutex};

/// Channel for debounced line edges, from the line sampler to the receiver
pub static EDGE_CHANNEL: Channel<RawMutex, EdgeEvent, EDGE_CHANNEL_SIZE> = Channel::new();
/// Channel for keyboard reports, from the report sink to the hid writer
pub static KEYBOARD_REPORT_CHANNEL: Channel<RawMutex, Report, REPORT_CHANNEL_SIZE> = Channel::new();
