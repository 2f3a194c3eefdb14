pub mod common;

use core::convert::Infallible;

use binkey::channel::{EDGE_CHANNEL, KEYBOARD_REPORT_CHANNEL};
use binkey::encoder::encode;
use binkey::hid::{HidError, HidReporter, Report, ReportSink};
use binkey::sampler::LineSampler;
use binkey::types::modifier::LSHIFT;
use binkey::usb::descriptor::KeyboardReport;
use binkey::{BinkeyConfig, DecoderState, EdgeEvent, Line, Receiver, run_binkey};
use embassy_futures::select::select;
use embassy_futures::join::join;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::{ErrorType, InputPin};

use crate::common::{EDGE_PERIOD_MS, RecordingSink, serial, test_block_on};

async fn send_lines(lines: impl Iterator<Item = Line>) {
    for line in lines {
        EDGE_CHANNEL.send(EdgeEvent::new(line, Instant::now())).await;
        Timer::after_millis(EDGE_PERIOD_MS).await;
    }
}

#[test]
fn test_receiver_task() {
    let _guard = serial();
    EDGE_CHANNEL.clear();
    let mut receiver = Receiver::new(&BinkeyConfig::default()).unwrap();
    let mut sink = RecordingSink::default();

    test_block_on(async {
        select(receiver.run(&mut sink), async {
            send_lines(b"Ok".iter().flat_map(|b| encode(*b, true))).await;
            // Let the receiver drain the channel
            Timer::after_millis(10).await;
        })
        .await;
    });
    assert_eq!(sink.typed(), "Ok");
}

#[test]
fn test_receiver_task_wakes_on_timeout() {
    let _guard = serial();
    EDGE_CHANNEL.clear();
    let mut receiver = Receiver::new(&BinkeyConfig::default()).unwrap();
    let mut sink = RecordingSink::default();

    test_block_on(async {
        select(receiver.run(&mut sink), async {
            // Start symbol and 3 bits, then silence
            send_lines(encode(b'q', true).take(5)).await;
            Timer::after_millis(2500).await;
        })
        .await;
    });
    // No edge arrived, the timer expired the partial byte
    assert_eq!(receiver.decoder().state(), DecoderState::AwaitingStart0);
    assert_eq!(receiver.decoder().buffered_bits(), 0);
    assert!(sink.commands.is_empty());
}

/// Collects keyboard reports instead of writing them to USB
#[derive(Default)]
struct CollectingReporter {
    reports: Vec<KeyboardReport>,
}

impl HidReporter for CollectingReporter {
    type ReportType = Report;

    async fn get_report(&mut self) -> Self::ReportType {
        KEYBOARD_REPORT_CHANNEL.receive().await
    }

    async fn write_report(&mut self, report: Self::ReportType) -> Result<usize, HidError> {
        match report {
            Report::KeyboardReport(r) => self.reports.push(r),
        }
        Ok(8)
    }
}

#[test]
fn test_reports_of_shifted_letter() {
    let _guard = serial();
    EDGE_CHANNEL.clear();
    KEYBOARD_REPORT_CHANNEL.clear();
    let mut receiver = Receiver::new(&BinkeyConfig::default()).unwrap();
    let mut sink = ReportSink::new();
    let mut reporter = CollectingReporter::default();

    test_block_on(async {
        select(join(receiver.run(&mut sink), reporter.run_reporter()), async {
            send_lines(encode(b'U', true)).await;
            Timer::after_millis(10).await;
        })
        .await;
    });

    let u = 0x18;
    let shift = LSHIFT.into_bits();
    let reports: Vec<(u8, [u8; 6])> = reporter.reports.iter().map(|r| (r.modifier, r.keycodes)).collect();
    assert_eq!(
        reports,
        vec![
            (shift, [0; 6]),
            (shift, [u, 0, 0, 0, 0, 0]),
            (shift, [0; 6]),
            (0, [0; 6]),
        ]
    );
}

/// Input pin which is low during the scheduled pulses
struct ScheduledPin {
    pulses: Vec<Instant>,
    pulse: Duration,
}

impl ErrorType for ScheduledPin {
    type Error = Infallible;
}

impl InputPin for ScheduledPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let now = Instant::now();
        Ok(self.pulses.iter().any(|start| *start <= now && now < *start + self.pulse))
    }
}

#[test]
fn test_link_end_to_end() {
    let _guard = serial();
    EDGE_CHANNEL.clear();
    let config = BinkeyConfig::default();
    let text = b"Rust is fun";

    // Schedule the pulses of the transmitter from now on
    let start = Instant::now() + Duration::from_millis(10);
    let mut pins = [Vec::new(), Vec::new()];
    for (i, line) in text.iter().flat_map(|b| encode(*b, true)).enumerate() {
        pins[line.index()].push(start + Duration::from_millis(i as u64 * EDGE_PERIOD_MS));
    }
    let edges = pins[0].len() + pins[1].len();
    let [zero, one] = pins.map(|pulses| ScheduledPin {
        pulses,
        pulse: config.timing.pulse,
    });

    let mut sampler = LineSampler::new(zero, one, &config);
    let mut receiver = Receiver::new(&config).unwrap();
    let mut sink = RecordingSink::default();
    test_block_on(async {
        select(
            run_binkey(&mut sampler, &mut receiver, &mut sink),
            Timer::after_millis(edges as u64 * EDGE_PERIOD_MS + 100),
        )
        .await;
    });
    assert_eq!(sink.typed(), "Rust is fun");
}
