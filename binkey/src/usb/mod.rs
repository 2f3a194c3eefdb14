use embassy_usb::class::hid::HidWriter;
use embassy_usb::driver::Driver;

use crate::channel::KEYBOARD_REPORT_CHANNEL;
use crate::hid::{HidError, HidReporter, Report};

pub mod descriptor;

/// Writes the reports of [`KEYBOARD_REPORT_CHANNEL`] to a USB boot keyboard interface.
///
/// The interface is created by the caller with [`descriptor::KeyboardReport`] as report descriptor.
pub struct UsbKeyboardWriter<'a, 'd, D: Driver<'d>> {
    keyboard_writer: &'a mut HidWriter<'d, D, 8>,
}

impl<'a, 'd, D: Driver<'d>> UsbKeyboardWriter<'a, 'd, D> {
    pub fn new(keyboard_writer: &'a mut HidWriter<'d, D, 8>) -> Self {
        Self { keyboard_writer }
    }
}

impl<'d, D: Driver<'d>> HidReporter for UsbKeyboardWriter<'_, 'd, D> {
    type ReportType = Report;

    async fn get_report(&mut self) -> Self::ReportType {
        KEYBOARD_REPORT_CHANNEL.receive().await
    }

    async fn write_report(&mut self, report: Self::ReportType) -> Result<usize, HidError> {
        match report {
            Report::KeyboardReport(keyboard_report) => {
                self.keyboard_writer
                    .write_serialize(&keyboard_report)
                    .await
                    .map_err(HidError::UsbEndpointError)?;
                Ok(8)
            }
        }
    }
}
