//! # binkey
//!
//! Receiver and transmitter of a two-wire, bit-serial keyboard link.
//!
//! The transmitter pulses one of two lines per bit, the receiver debounces the lines,
//! reassembles bytes with a start-symbol-synchronized framing protocol and maps every byte
//! to keyboard actions which are reported to the host as a USB HID keyboard.
//!
//! ```text
//! LineSampler -> EDGE_CHANNEL -> Receiver { FrameDecoder -> ActionDispatcher } -> HidSink
//! ```
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod debounce;
pub mod decoder;
pub mod dispatcher;
pub mod encoder;
pub mod hid;
pub mod line;
pub mod receiver;
pub mod sampler;
pub mod usb;

pub use binkey_types as types;
pub use config::BinkeyConfig;
pub use decoder::{DecoderState, FrameDecoder};
pub use dispatcher::{ActionDispatcher, Dispatch};
pub use embassy_futures;
pub use encoder::{Transmitter, encode};
pub use hid::{HidCommand, HidSink, ReportSink};
pub use line::{EdgeEvent, Line};
pub use receiver::{Receiver, run_binkey};
pub use sampler::LineSampler;

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Mutex used for all channels of binkey
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
