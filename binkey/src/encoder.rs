//! Transmit side of the link.

use binkey_types::protocol::{PRINTABLE, ProtocolByte};
use embassy_time::Timer;
use embedded_hal::digital::{Error, ErrorKind, OutputPin};

use crate::config::{BinkeyConfig, TimingConfig, TimingError};
use crate::line::Line;

/// Lines to pulse for `byte`, MSB first, optionally preceded by the ZERO, ONE start symbol.
pub fn encode(byte: u8, start_symbol: bool) -> impl Iterator<Item = Line> {
    let start: &'static [Line] = if start_symbol { &[Line::Zero, Line::One] } else { &[] };
    start
        .iter()
        .copied()
        .chain((0..8).rev().map(move |i| Line::from_bit(byte & (1 << i) != 0)))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitError {
    /// Failed to drive a line
    Pin(ErrorKind),
    /// The protocol byte has no wire value
    InvalidProtocolByte,
}

/// Drives the two bit lines, a line is active while high.
pub struct Transmitter<O: OutputPin> {
    pins: [O; 2],
    timing: TimingConfig,
    start_symbol: bool,
}

impl<O: OutputPin> Transmitter<O> {
    /// Create a transmitter, fails if the receiver couldn't frame bytes sent with the timing of `config`.
    pub fn new(zero_pin: O, one_pin: O, config: &BinkeyConfig) -> Result<Self, TimingError> {
        config.validate()?;
        Ok(Self {
            pins: [zero_pin, one_pin],
            timing: config.timing,
            start_symbol: config.protocol.start_symbol,
        })
    }

    async fn pulse(&mut self, line: Line) -> Result<(), TransmitError> {
        let pin = &mut self.pins[line.index()];
        pin.set_high().map_err(|e| TransmitError::Pin(e.kind()))?;
        Timer::after(self.timing.pulse).await;
        pin.set_low().map_err(|e| TransmitError::Pin(e.kind()))?;
        Timer::after(self.timing.gap).await;
        Ok(())
    }

    pub async fn send_byte(&mut self, byte: u8) -> Result<(), TransmitError> {
        debug!("Sending 0x{:02X}", byte);
        for line in encode(byte, self.start_symbol) {
            self.pulse(line).await?;
        }
        Ok(())
    }

    pub async fn send(&mut self, byte: ProtocolByte) -> Result<(), TransmitError> {
        let byte = byte.to_byte().ok_or(TransmitError::InvalidProtocolByte)?;
        self.send_byte(byte).await
    }

    /// Send the printable ascii chars of `text`, other chars are skipped.
    ///
    /// Returns the number of bytes sent.
    pub async fn send_str(&mut self, text: &str) -> Result<usize, TransmitError> {
        let mut sent = 0;
        for byte in text.bytes() {
            if !PRINTABLE.contains(&byte) {
                debug!("Skipped non-printable byte 0x{:02X}", byte);
                continue;
            }
            self.send_byte(byte).await?;
            sent += 1;
        }
        Ok(sent)
    }
}
