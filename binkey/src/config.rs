//! Runtime configuration of the link.
//!
//! The defaults come from `binkey.toml` (see the `BINKEY_TOML_PATH` env var read by
//! `build.rs`), every field can still be overridden in code.

use binkey_types::keycode::HidKeyCode;
use binkey_types::modifier::HidModifiers;
use embassy_time::Duration;

use crate::{
    FN_LAYER, FN_MODIFIER_BITS, GAP_MS, INACTIVITY_TIMEOUT_MS, POLL_INTERVAL_US, PULSE_MS, START_SYMBOL,
    START_WINDOW_MS, TOGGLE_MODIFIERS,
};

/// The config struct for binkey.
#[derive(Clone, Debug, Default)]
pub struct BinkeyConfig {
    pub timing: TimingConfig,
    pub protocol: ProtocolConfig,
}

impl BinkeyConfig {
    /// Check the timing contract under the configured framing
    pub fn validate(&self) -> Result<(), TimingError> {
        self.timing.validate(self.protocol.start_symbol).inspect_err(|e| {
            error!("Invalid link timing: {:?}", e);
        })
    }
}

/// Timing of the link, shared by the transmitter and the receiver
#[derive(Clone, Copy, Debug)]
pub struct TimingConfig {
    /// Active time of one bit pulse
    pub pulse: Duration,
    /// Idle time after each pulse
    pub gap: Duration,
    /// The ONE edge of the start symbol must follow the ZERO edge within this window
    pub start_window: Duration,
    /// Silence after which a partially received byte is dropped
    pub inactivity_timeout: Duration,
    /// Line sampling interval
    pub poll_interval: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pulse: Duration::from_millis(PULSE_MS),
            gap: Duration::from_millis(GAP_MS),
            start_window: Duration::from_millis(START_WINDOW_MS),
            inactivity_timeout: Duration::from_millis(INACTIVITY_TIMEOUT_MS),
            poll_interval: Duration::from_micros(POLL_INTERVAL_US),
        }
    }
}

/// Timing constraints violated by a [`TimingConfig`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// The pulse duration is zero
    ZeroPulse,
    /// `pulse < gap < start_window < inactivity_timeout` does not hold
    Ordering,
    /// One pulse period doesn't fit in the start window
    StartWindowTooShort,
}

impl TimingConfig {
    /// Time between two consecutive edges sent by the transmitter
    pub fn period(&self) -> Duration {
        self.pulse + self.gap
    }

    /// Check the timing contract of the link
    pub fn validate(&self, start_symbol: bool) -> Result<(), TimingError> {
        if self.pulse == Duration::from_ticks(0) {
            return Err(TimingError::ZeroPulse);
        }
        if !(self.pulse < self.gap && self.gap < self.start_window && self.start_window < self.inactivity_timeout) {
            return Err(TimingError::Ordering);
        }
        if start_symbol && self.period() > self.start_window {
            return Err(TimingError::StartWindowTooShort);
        }
        Ok(())
    }
}

/// How the modifier bytes `0x80..=0x8F` are interpreted
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModifierMode {
    /// `0x80..=0x87` press and latch, `0x88..=0x8F` release
    #[default]
    PressRelease,
    /// `0x80..=0x87` flip the latch, `0x88..=0x8F` are unmapped
    Toggle,
}

/// Secondary binding of a function key while the Fn layer is active
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FnBinding {
    pub modifiers: HidModifiers,
    pub key: HidKeyCode,
}

/// Fn layer bindings of F1..F12, index `0` is F1
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FnBindings {
    bindings: [FnBinding; 12],
}

impl FnBindings {
    /// Bind every function key to `modifiers` + the same function key
    pub fn with_modifiers(modifiers: HidModifiers) -> Self {
        let mut bindings = [FnBinding {
            modifiers,
            key: HidKeyCode::F1,
        }; 12];
        for (i, b) in bindings.iter_mut().enumerate() {
            b.key = HidKeyCode::function_key(i as u8).unwrap_or(HidKeyCode::No);
        }
        Self { bindings }
    }

    /// Binding of the function key at `index`, `0` is F1
    pub fn get(&self, index: u8) -> Option<&FnBinding> {
        self.bindings.get(index as usize)
    }

    /// Rebind the function key at `index`. Returns `false` if the index is out of range.
    pub fn set(&mut self, index: u8, binding: FnBinding) -> bool {
        match self.bindings.get_mut(index as usize) {
            Some(b) => {
                *b = binding;
                true
            }
            None => false,
        }
    }
}

impl Default for FnBindings {
    fn default() -> Self {
        Self::with_modifiers(HidModifiers::from_bits(FN_MODIFIER_BITS))
    }
}

/// Protocol variant flags
#[derive(Clone, Debug)]
pub struct ProtocolConfig {
    /// Every byte is preceded by a ZERO, ONE start symbol
    pub start_symbol: bool,
    pub modifier_mode: ModifierMode,
    /// Enable the Fn layer bytes `0xB1`/`0xB2`
    pub fn_layer: bool,
    pub fn_bindings: FnBindings,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            start_symbol: START_SYMBOL,
            modifier_mode: if TOGGLE_MODIFIERS {
                ModifierMode::Toggle
            } else {
                ModifierMode::PressRelease
            },
            fn_layer: FN_LAYER,
            fn_bindings: FnBindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use binkey_types::modifier::{LALT, LCTRL};

    use super::*;

    #[test]
    fn test_default_timing_is_valid() {
        let timing = TimingConfig::default();
        assert_eq!(timing.validate(true), Ok(()));
        assert_eq!(timing.start_window, Duration::from_millis(50));
        assert_eq!(timing.inactivity_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_timing_violations() {
        let mut timing = TimingConfig::default();
        timing.gap = timing.pulse;
        assert_eq!(timing.validate(true), Err(TimingError::Ordering));

        let mut timing = TimingConfig::default();
        timing.pulse = Duration::from_millis(35);
        timing.gap = Duration::from_millis(40);
        assert_eq!(timing.validate(true), Err(TimingError::StartWindowTooShort));
        assert_eq!(timing.validate(false), Ok(()));

        let mut timing = TimingConfig::default();
        timing.pulse = Duration::from_ticks(0);
        assert_eq!(timing.validate(true), Err(TimingError::ZeroPulse));
    }

    #[test]
    fn test_fn_bindings_default_to_ctrl() {
        let bindings = FnBindings::default();
        assert_eq!(
            bindings.get(0),
            Some(&FnBinding {
                modifiers: LCTRL,
                key: HidKeyCode::F1
            })
        );
        assert_eq!(bindings.get(11).map(|b| b.key), Some(HidKeyCode::F12));
        assert!(bindings.get(12).is_none());
    }

    #[test]
    fn test_fn_bindings_override() {
        let mut bindings = FnBindings::default();
        let alt_f4 = FnBinding {
            modifiers: LALT,
            key: HidKeyCode::F4,
        };
        assert!(bindings.set(3, alt_f4));
        assert!(!bindings.set(12, alt_f4));
        assert_eq!(bindings.get(3), Some(&alt_f4));
    }
}
