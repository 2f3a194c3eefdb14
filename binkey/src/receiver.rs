//! Receive side of the link: frame decoder and action dispatcher behind one owner.

use embassy_futures::join::join;
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use embedded_hal::digital::InputPin;

use crate::channel::EDGE_CHANNEL;
use crate::config::{BinkeyConfig, TimingError};
use crate::debounce::DebouncerTrait;
use crate::decoder::FrameDecoder;
use crate::dispatcher::{ActionDispatcher, Dispatch, KeyboardLayout, UsLayout};
use crate::hid::HidSink;
use crate::line::{EdgeEvent, Line};
use crate::sampler::LineSampler;

pub struct Receiver<L: KeyboardLayout = UsLayout> {
    decoder: FrameDecoder,
    dispatcher: ActionDispatcher<L>,
}

impl Receiver<UsLayout> {
    pub fn new(config: &BinkeyConfig) -> Result<Self, TimingError> {
        Self::with_dispatcher(config, ActionDispatcher::new(config))
    }
}

impl<L: KeyboardLayout> Receiver<L> {
    /// Create a receiver, fails if the timing of `config` can't frame a byte.
    pub fn with_dispatcher(config: &BinkeyConfig, dispatcher: ActionDispatcher<L>) -> Result<Self, TimingError> {
        config.validate()?;
        Ok(Self {
            decoder: FrameDecoder::new(config),
            dispatcher,
        })
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<L> {
        &self.dispatcher
    }

    /// Process one polling step, returns the dispatched commands if a byte was completed.
    ///
    /// A decoder reset requested by the byte is applied before returning.
    pub fn tick(&mut self, now: Instant, edge: Option<Line>) -> Option<Dispatch> {
        let byte = self.decoder.tick(now, edge)?;
        let dispatch = self.dispatcher.dispatch(byte);
        if dispatch.reset_requested {
            self.decoder.reset();
        }
        Some(dispatch)
    }

    pub fn on_edge(&mut self, edge: EdgeEvent) -> Option<Dispatch> {
        self.tick(edge.at, Some(edge.line))
    }

    /// Execute the commands in order. A failed command is logged and doesn't stop the others.
    pub async fn execute(&self, dispatch: &Dispatch, sink: &mut impl HidSink) {
        for command in dispatch.commands.iter() {
            if let Err(e) = sink.execute(*command).await {
                error!("Failed to execute {:?}: {:?}", command, e);
            }
        }
    }

    /// Receive edges from [`EDGE_CHANNEL`] forever, waking up on decoder timeouts.
    pub async fn run(&mut self, sink: &mut impl HidSink) -> ! {
        loop {
            let dispatch = match self.decoder.next_deadline() {
                Some(deadline) => match select(EDGE_CHANNEL.receive(), Timer::at(deadline)).await {
                    Either::First(edge) => self.on_edge(edge),
                    Either::Second(_) => self.tick(Instant::now(), None),
                },
                None => {
                    let edge = EDGE_CHANNEL.receive().await;
                    self.on_edge(edge)
                }
            };
            if let Some(dispatch) = dispatch {
                self.execute(&dispatch, sink).await;
            }
        }
    }
}

/// Run the line sampler and the receiver
pub async fn run_binkey<In: InputPin, D: DebouncerTrait, L: KeyboardLayout>(
    sampler: &mut LineSampler<In, D>,
    receiver: &mut Receiver<L>,
    sink: &mut impl HidSink,
) {
    info!("binkey receiver started");
    join(sampler.run(), receiver.run(sink)).await;
}
