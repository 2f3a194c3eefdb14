#![allow(dead_code)]

use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};
use std::sync::{Mutex, MutexGuard};

use binkey::encoder::encode;
use binkey::hid::{HidCommand, HidError, HidSink};
use binkey::types::keycode::HidKeyCode;
use binkey::{EdgeEvent, Line};
use embassy_time::{Duration, Instant, MockDriver};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Time between two edges sent by the transmitter with the default timing
pub const EDGE_PERIOD_MS: u64 = 45;

/// Step of the mock clock while the future under test is pending
const CLOCK_STEP: Duration = Duration::from_micros(100);

/// Tests which use the mock clock or the global channels must hold this lock
static SERIAL: Mutex<()> = Mutex::new(());

pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Block on `fut`, advancing the mock clock whenever it's pending
pub fn test_block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(output) = fut.as_mut().poll(&mut cx) {
            return output;
        }
        MockDriver::get().advance(CLOCK_STEP);
    }
}

/// Edge events of `bytes` sent back to back from `start`
pub fn link_edges(bytes: &[u8], start_symbol: bool, start: Instant) -> Vec<EdgeEvent> {
    let mut at = start;
    let mut edges = Vec::new();
    for byte in bytes {
        for line in encode(*byte, start_symbol) {
            edges.push(EdgeEvent::new(line, at));
            at += Duration::from_millis(EDGE_PERIOD_MS);
        }
    }
    edges
}

/// Lines of `bytes` sent back to back
pub fn link_lines(bytes: &[u8]) -> Vec<Line> {
    bytes.iter().flat_map(|b| encode(*b, true)).collect()
}

/// [`HidSink`] which records every command
#[derive(Default)]
pub struct RecordingSink {
    pub commands: Vec<HidCommand>,
}

impl RecordingSink {
    /// Chars typed by the recorded commands, uppercase if shift was held
    pub fn typed(&self) -> String {
        let mut shift = false;
        let mut typed = String::new();
        for command in &self.commands {
            match command {
                HidCommand::Press(HidKeyCode::LShift) => shift = true,
                HidCommand::Release(HidKeyCode::LShift) => shift = false,
                HidCommand::Press(k) if k.is_letter() => {
                    let c = (b'a' + (*k as u8 - HidKeyCode::A as u8)) as char;
                    typed.push(if shift { c.to_ascii_uppercase() } else { c });
                }
                HidCommand::Press(HidKeyCode::Space) => typed.push(' '),
                _ => {}
            }
        }
        typed
    }
}

impl HidSink for RecordingSink {
    async fn press(&mut self, key: HidKeyCode) -> Result<(), HidError> {
        self.commands.push(HidCommand::Press(key));
        Ok(())
    }

    async fn release(&mut self, key: HidKeyCode) -> Result<(), HidError> {
        self.commands.push(HidCommand::Release(key));
        Ok(())
    }

    async fn release_all(&mut self) -> Result<(), HidError> {
        self.commands.push(HidCommand::ReleaseAll);
        Ok(())
    }
}
