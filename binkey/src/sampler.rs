use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::InputPin;
use heapless::Vec;

use crate::channel::EDGE_CHANNEL;
use crate::config::BinkeyConfig;
use crate::debounce::default_debouncer::DefaultDebouncer;
use crate::debounce::{DebounceState, DebouncerTrait};
use crate::line::{EdgeEvent, Line};

/// Polls the two bit lines and reports debounced activations.
pub struct LineSampler<In: InputPin, D: DebouncerTrait = DefaultDebouncer> {
    /// Input pins of the ZERO and ONE lines
    pins: [In; 2],
    /// Debouncer
    debouncer: D,
    /// Debounced level of the lines
    active: [bool; 2],
    /// Pin active level
    low_active: bool,
    poll_interval: Duration,
}

impl<In: InputPin> LineSampler<In, DefaultDebouncer> {
    /// Create a sampler of active-low lines, the pins should have pull-ups.
    pub fn new(zero_pin: In, one_pin: In, config: &BinkeyConfig) -> Self {
        Self::with_debouncer(zero_pin, one_pin, DefaultDebouncer::new(), true, config)
    }
}

impl<In: InputPin, D: DebouncerTrait> LineSampler<In, D> {
    /// Create a sampler, the lines are read once so a line held active at startup isn't reported.
    pub fn with_debouncer(zero_pin: In, one_pin: In, debouncer: D, low_active: bool, config: &BinkeyConfig) -> Self {
        let mut sampler = Self {
            pins: [zero_pin, one_pin],
            debouncer,
            active: [false; 2],
            low_active,
            poll_interval: config.timing.poll_interval,
        };
        for line in [Line::Zero, Line::One] {
            sampler.active[line.index()] = sampler.read(line);
            if sampler.active[line.index()] {
                warn!("Line {:?} is active at startup", line);
            }
        }
        sampler
    }

    /// Level of `line`, a pin which can't be read is inactive
    fn read(&mut self, line: Line) -> bool {
        let pin = &mut self.pins[line.index()];
        if self.low_active {
            pin.is_low().ok().unwrap_or_default()
        } else {
            pin.is_high().ok().unwrap_or_default()
        }
    }

    /// Sample both lines at `now`.
    ///
    /// Returns the lines which became active, ZERO first if both did.
    pub fn poll(&mut self, now: Instant) -> Vec<EdgeEvent, 2> {
        let mut edges = Vec::new();
        for line in [Line::Zero, Line::One] {
            let pin_active = self.read(line);
            let registered = self.active[line.index()];
            if let DebounceState::Debounced =
                self.debouncer
                    .detect_change_with_debounce(line, pin_active, registered, now)
            {
                self.active[line.index()] = pin_active;
                if pin_active {
                    trace!("Line {:?} activated", line);
                    // Capacity is the number of lines
                    let _ = edges.push(EdgeEvent::new(line, now));
                }
            }
        }
        edges
    }

    /// Sample the lines forever, sending the edges to [`EDGE_CHANNEL`]
    pub async fn run(&mut self) -> ! {
        loop {
            for edge in self.poll(Instant::now()) {
                EDGE_CHANNEL.send(edge).await;
            }
            Timer::after(self.poll_interval).await;
        }
    }
}
