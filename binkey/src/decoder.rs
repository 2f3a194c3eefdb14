//! Frame decoder of the link.
//!
//! Turns debounced line edges into bytes. With the start symbol enabled every byte is
//! framed as `ZERO, ONE, b7, .., b0`; without it the decoder accumulates bits forever and
//! relies on the inactivity timeout to resynchronize.
//!
//! All timeouts are strict: an edge which arrives exactly at the limit is still accepted.

use embassy_time::{Duration, Instant};

use crate::config::BinkeyConfig;
use crate::line::Line;

/// State of the [`FrameDecoder`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// Waiting for the ZERO half of the start symbol
    AwaitingStart0,
    /// ZERO received, waiting for the ONE half within the start window
    AwaitingStart1,
    /// Accumulating data bits
    Receiving,
}

pub struct FrameDecoder {
    state: DecoderState,
    start_symbol: bool,
    start_window: Duration,
    inactivity_timeout: Duration,
    /// Received bits, MSB first
    bits: u8,
    bit_count: u8,
    /// Entry time of `AwaitingStart1`, or time of the last edge in `Receiving`
    last_edge: Option<Instant>,
}

impl FrameDecoder {
    pub fn new(config: &BinkeyConfig) -> Self {
        let mut decoder = Self {
            state: DecoderState::AwaitingStart0,
            start_symbol: config.protocol.start_symbol,
            start_window: config.timing.start_window,
            inactivity_timeout: config.timing.inactivity_timeout,
            bits: 0,
            bit_count: 0,
            last_edge: None,
        };
        decoder.reset();
        decoder
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Number of bits of the byte being received
    pub fn buffered_bits(&self) -> u8 {
        self.bit_count
    }

    fn idle_state(&self) -> DecoderState {
        if self.start_symbol {
            DecoderState::AwaitingStart0
        } else {
            DecoderState::Receiving
        }
    }

    /// Drop any partial byte or start symbol and go back to idle
    pub fn reset(&mut self) {
        self.state = self.idle_state();
        self.bits = 0;
        self.bit_count = 0;
        self.last_edge = None;
    }

    /// Process one polling step: timeouts are checked first, then the optional edge.
    pub fn tick(&mut self, now: Instant, edge: Option<Line>) -> Option<u8> {
        self.poll_timeout(now);
        edge.and_then(|line| self.on_edge(line, now))
    }

    /// Check the timeouts of the current state at `now`. Returns `true` if the decoder went back to idle.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.next_deadline() else {
            return false;
        };
        if now < deadline {
            return false;
        }

        match self.state {
            DecoderState::AwaitingStart1 => {
                debug!("Start symbol timed out, waiting for a new start symbol");
            }
            _ if self.bit_count == 0 => {
                debug!("No data after start symbol, waiting for a new start symbol");
            }
            _ => {
                warn!("Framing timeout, dropping {} buffered bits", self.bit_count);
            }
        }
        self.reset();
        true
    }

    /// Process an edge of `line` at `at`, returns the byte if it's the last bit of one.
    ///
    /// This doesn't check timeouts, see [`FrameDecoder::tick`].
    pub fn on_edge(&mut self, line: Line, at: Instant) -> Option<u8> {
        match self.state {
            DecoderState::AwaitingStart0 => {
                if line == Line::Zero {
                    self.state = DecoderState::AwaitingStart1;
                    self.last_edge = Some(at);
                } else {
                    trace!("Ignored ONE edge outside of a frame");
                }
                None
            }
            DecoderState::AwaitingStart1 => {
                match line {
                    // A repeated ZERO restarts the start window
                    Line::Zero => self.last_edge = Some(at),
                    Line::One => {
                        self.state = DecoderState::Receiving;
                        self.bits = 0;
                        self.bit_count = 0;
                        self.last_edge = Some(at);
                    }
                }
                None
            }
            DecoderState::Receiving => {
                self.bits = (self.bits << 1) | line.bit();
                self.bit_count += 1;
                self.last_edge = Some(at);
                if self.bit_count < 8 {
                    return None;
                }
                let byte = self.bits;
                self.reset();
                info!("Complete byte: 0x{:02X}", byte);
                Some(byte)
            }
        }
    }

    /// First instant at which the current state times out, `None` if the state never times out
    pub fn next_deadline(&self) -> Option<Instant> {
        let last = self.last_edge?;
        let limit = match self.state {
            DecoderState::AwaitingStart0 => return None,
            DecoderState::AwaitingStart1 => self.start_window,
            // An empty buffer without start symbol is the idle state
            DecoderState::Receiving if !self.start_symbol && self.bit_count == 0 => return None,
            DecoderState::Receiving => self.inactivity_timeout,
        };
        Some(last + limit + Duration::from_ticks(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    fn decoder(start_symbol: bool) -> FrameDecoder {
        let mut config = BinkeyConfig::default();
        config.protocol.start_symbol = start_symbol;
        FrameDecoder::new(&config)
    }

    /// Feed `lines` 45ms apart starting at `t`, returns the emitted bytes and the time of the last edge
    fn feed(decoder: &mut FrameDecoder, t: u64, lines: &[Line]) -> (heapless::Vec<u8, 8>, u64) {
        let mut bytes = heapless::Vec::new();
        let mut now = t;
        for (i, line) in lines.iter().enumerate() {
            now = t + i as u64 * 45;
            if let Some(b) = decoder.tick(ms(now), Some(*line)) {
                bytes.push(b).unwrap();
            }
        }
        (bytes, now)
    }

    fn frame(byte: u8) -> [Line; 10] {
        let mut lines = [Line::Zero; 10];
        lines[1] = Line::One;
        for i in 0..8 {
            lines[2 + i] = Line::from_bit(byte & (0x80 >> i) != 0);
        }
        lines
    }

    #[test]
    fn test_decode_0x55() {
        let mut decoder = decoder(true);
        let (bytes, _) = feed(&mut decoder, 0, &frame(0x55));
        assert_eq!(bytes.as_slice(), &[0x55]);
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
        assert_eq!(decoder.buffered_bits(), 0);
    }

    #[test]
    fn test_back_to_back_bytes() {
        let mut decoder = decoder(true);
        let mut lines: heapless::Vec<Line, 20> = heapless::Vec::new();
        lines.extend_from_slice(&frame(0xA5)).unwrap();
        lines.extend_from_slice(&frame(0x00)).unwrap();
        let (bytes, _) = feed(&mut decoder, 1000, &lines);
        assert_eq!(bytes.as_slice(), &[0xA5, 0x00]);
    }

    #[test]
    fn test_one_ignored_while_awaiting_start() {
        let mut decoder = decoder(true);
        assert_eq!(decoder.tick(ms(0), Some(Line::One)), None);
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
        assert_eq!(decoder.next_deadline(), None);
    }

    #[test]
    fn test_start_window_boundary() {
        let mut decoder = decoder(true);
        decoder.tick(ms(100), Some(Line::Zero));
        assert_eq!(decoder.state(), DecoderState::AwaitingStart1);
        decoder.tick(ms(150), Some(Line::One));
        assert_eq!(decoder.state(), DecoderState::Receiving);

        let mut decoder = self::decoder(true);
        decoder.tick(ms(100), Some(Line::Zero));
        decoder.tick(ms(150) + Duration::from_ticks(1), Some(Line::One));
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
    }

    #[test]
    fn test_zero_restarts_start_window() {
        let mut decoder = decoder(true);
        decoder.tick(ms(0), Some(Line::Zero));
        decoder.tick(ms(40), Some(Line::Zero));
        decoder.tick(ms(85), Some(Line::One));
        assert_eq!(decoder.state(), DecoderState::Receiving);
    }

    #[test]
    fn test_start_timeout_without_edge() {
        let mut decoder = decoder(true);
        decoder.tick(ms(0), Some(Line::Zero));
        assert!(!decoder.poll_timeout(ms(50)));
        assert!(decoder.poll_timeout(ms(51)));
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
    }

    #[test]
    fn test_inactivity_clears_partial_byte() {
        let mut decoder = decoder(true);
        let (bytes, last) = feed(&mut decoder, 0, &[Line::Zero, Line::One, Line::One, Line::Zero, Line::One]);
        assert!(bytes.is_empty());
        assert_eq!(decoder.buffered_bits(), 3);

        assert_eq!(decoder.tick(ms(last + 2000), None), None);
        assert_eq!(decoder.buffered_bits(), 3);
        assert_eq!(decoder.tick(ms(last + 2001), None), None);
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
        assert_eq!(decoder.buffered_bits(), 0);
    }

    #[test]
    fn test_bit_before_timeout_resets_inactivity_clock() {
        let mut decoder = decoder(true);
        let (_, last) = feed(&mut decoder, 0, &[Line::Zero, Line::One, Line::One, Line::Zero, Line::One]);
        let fourth = last + 1999;
        decoder.tick(ms(fourth), Some(Line::Zero));
        assert_eq!(decoder.buffered_bits(), 4);
        decoder.tick(ms(fourth + 2000), Some(Line::One));
        assert_eq!(decoder.buffered_bits(), 5);
        assert_eq!(decoder.state(), DecoderState::Receiving);
    }

    #[test]
    fn test_late_bit_starts_nothing() {
        let mut decoder = decoder(true);
        let (_, last) = feed(&mut decoder, 0, &[Line::Zero, Line::One, Line::One]);
        // The timed out partial byte is dropped before the edge is processed, a late ONE is ignored
        assert_eq!(decoder.tick(ms(last + 3000), Some(Line::One)), None);
        assert_eq!(decoder.state(), DecoderState::AwaitingStart0);
        assert_eq!(decoder.buffered_bits(), 0);
    }

    #[test]
    fn test_next_deadline() {
        let mut decoder = decoder(true);
        decoder.tick(ms(10), Some(Line::Zero));
        assert_eq!(decoder.next_deadline(), Some(ms(60) + Duration::from_ticks(1)));
        decoder.tick(ms(20), Some(Line::One));
        assert_eq!(decoder.next_deadline(), Some(ms(2020) + Duration::from_ticks(1)));
        decoder.reset();
        assert_eq!(decoder.next_deadline(), None);
    }

    #[test]
    fn test_without_start_symbol() {
        let mut decoder = decoder(false);
        assert_eq!(decoder.state(), DecoderState::Receiving);
        assert_eq!(decoder.next_deadline(), None);

        let lines = &frame(0xC3)[2..];
        let (bytes, last) = feed(&mut decoder, 0, lines);
        assert_eq!(bytes.as_slice(), &[0xC3]);
        assert_eq!(decoder.state(), DecoderState::Receiving);
        assert_eq!(decoder.next_deadline(), None);

        // A partial byte is cleared by the inactivity timeout
        let (_, last) = feed(&mut decoder, last + 45, &lines[..5]);
        assert_eq!(decoder.buffered_bits(), 5);
        assert!(decoder.poll_timeout(ms(last + 2001)));
        assert_eq!(decoder.state(), DecoderState::Receiving);
        assert_eq!(decoder.buffered_bits(), 0);

        let (bytes, _) = feed(&mut decoder, last + 3000, lines);
        assert_eq!(bytes.as_slice(), &[0xC3]);
    }
}
