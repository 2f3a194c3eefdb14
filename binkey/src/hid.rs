//! Traits and types for HID output.

use core::future::Future;

use binkey_types::keycode::HidKeyCode;
use binkey_types::modifier::HidModifiers;
use embassy_futures::yield_now;
use embassy_usb::driver::EndpointError;
use usbd_hid::descriptor::{AsInputReport, BufferOverflow};

use crate::channel::KEYBOARD_REPORT_CHANNEL;
use crate::usb::descriptor::KeyboardReport;

/// A keyboard action produced by the dispatcher
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidCommand {
    Press(HidKeyCode),
    Release(HidKeyCode),
    /// Release every held key and modifier
    ReleaseAll,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Normal keyboard hid report
    KeyboardReport(KeyboardReport),
}

impl AsInputReport for Report {
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, BufferOverflow> {
        match self {
            Report::KeyboardReport(report) => report.serialize(buffer),
        }
    }
}

#[derive(PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    UsbEndpointError(EndpointError),
    /// All 6 keycode slots of the report are in use
    BufferOverflow,
}

/// Executor of keyboard commands, e.g. a USB keyboard or a test recorder.
pub trait HidSink {
    fn press(&mut self, key: HidKeyCode) -> impl Future<Output = Result<(), HidError>>;

    fn release(&mut self, key: HidKeyCode) -> impl Future<Output = Result<(), HidError>>;

    fn release_all(&mut self) -> impl Future<Output = Result<(), HidError>>;

    fn execute(&mut self, command: HidCommand) -> impl Future<Output = Result<(), HidError>> {
        async move {
            match command {
                HidCommand::Press(key) => self.press(key).await,
                HidCommand::Release(key) => self.release(key).await,
                HidCommand::ReleaseAll => self.release_all().await,
            }
        }
    }
}

/// HidReporter trait is used for reporting HID messages to the host.
pub trait HidReporter {
    /// The report type that the reporter receives.
    type ReportType: AsInputReport;

    /// Get the report to be sent to the host
    fn get_report(&mut self) -> impl Future<Output = Self::ReportType>;

    /// Write report to the host, return the number of bytes written if success.
    fn write_report(&mut self, report: Self::ReportType) -> impl Future<Output = Result<usize, HidError>>;

    /// Run the reporter task.
    fn run_reporter(&mut self) -> impl Future<Output = ()> {
        async {
            loop {
                let report = self.get_report().await;
                if let Err(e) = self.write_report(report).await {
                    error!("Failed to send report: {:?}", e);
                }
            }
        }
    }
}

/// [`HidSink`] which keeps the keyboard state and sends a boot keyboard report to
/// [`KEYBOARD_REPORT_CHANNEL`] after every change.
#[derive(Default)]
pub struct ReportSink {
    held_modifiers: HidModifiers,
    held_keycodes: [HidKeyCode; 6],
}

impl ReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held_modifiers(&self) -> HidModifiers {
        self.held_modifiers
    }

    pub fn held_keycodes(&self) -> &[HidKeyCode; 6] {
        &self.held_keycodes
    }

    /// Report of the current state
    pub fn report(&self) -> KeyboardReport {
        KeyboardReport {
            modifier: self.held_modifiers.into_bits(),
            reserved: 0,
            leds: 0,
            keycodes: self.held_keycodes.map(|k| k as u8),
        }
    }

    async fn send_keyboard_report(&self) {
        KEYBOARD_REPORT_CHANNEL.sender().send(Report::KeyboardReport(self.report())).await;
        // Yield once after sending the report to channel
        yield_now().await;
    }

    fn register_keycode(&mut self, key: HidKeyCode) -> Result<(), HidError> {
        if key.is_modifier() {
            self.held_modifiers |= key.to_hid_modifiers();
            return Ok(());
        }
        if self.held_keycodes.contains(&key) {
            return Ok(());
        }
        match self.held_keycodes.iter().position(|&k| k == HidKeyCode::No) {
            Some(index) => {
                self.held_keycodes[index] = key;
                Ok(())
            }
            None => Err(HidError::BufferOverflow),
        }
    }

    fn unregister_keycode(&mut self, key: HidKeyCode) {
        if key.is_modifier() {
            self.held_modifiers &= !key.to_hid_modifiers();
        } else if let Some(index) = self.held_keycodes.iter().position(|&k| k == key) {
            self.held_keycodes[index] = HidKeyCode::No;
        }
    }
}

impl HidSink for ReportSink {
    async fn press(&mut self, key: HidKeyCode) -> Result<(), HidError> {
        self.register_keycode(key)?;
        self.send_keyboard_report().await;
        Ok(())
    }

    async fn release(&mut self, key: HidKeyCode) -> Result<(), HidError> {
        self.unregister_keycode(key);
        self.send_keyboard_report().await;
        Ok(())
    }

    async fn release_all(&mut self) -> Result<(), HidError> {
        self.held_modifiers = HidModifiers::new();
        self.held_keycodes = [HidKeyCode::No; 6];
        self.send_keyboard_report().await;
        Ok(())
    }
}
