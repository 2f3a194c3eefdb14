use std::path::Path;

use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

pub mod defaults;
pub mod error;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use validation::validate_config;

/// Timing of the two-wire link
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkTomlConfig {
    /// Active time of one bit pulse (ms)
    #[serde_inline_default(defaults::PULSE_MS)]
    pub pulse_ms: u64,
    /// Idle time after each pulse (ms)
    #[serde_inline_default(defaults::GAP_MS)]
    pub gap_ms: u64,
    /// Window for the second edge of the start symbol (ms)
    #[serde_inline_default(defaults::START_WINDOW_MS)]
    pub start_window_ms: u64,
    /// Partial bytes are dropped after this much silence (ms)
    #[serde_inline_default(defaults::INACTIVITY_TIMEOUT_MS)]
    pub inactivity_timeout_ms: u64,
    /// Debounce time of the bit lines (ms)
    #[serde_inline_default(defaults::DEBOUNCE_TIME_MS)]
    pub debounce_time: u16,
    /// Line sampling interval (us)
    #[serde_inline_default(defaults::POLL_INTERVAL_US)]
    pub poll_interval_us: u64,
}

/// This separate Default impl is needed when `[link]` section is not set in binkey.toml
impl Default for LinkTomlConfig {
    fn default() -> Self {
        Self {
            pulse_ms: defaults::PULSE_MS,
            gap_ms: defaults::GAP_MS,
            start_window_ms: defaults::START_WINDOW_MS,
            inactivity_timeout_ms: defaults::INACTIVITY_TIMEOUT_MS,
            debounce_time: defaults::DEBOUNCE_TIME_MS,
            poll_interval_us: defaults::POLL_INTERVAL_US,
        }
    }
}

/// How modifier bytes are interpreted
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModifierModeToml {
    /// `0x80..=0x87` press, `0x88..=0x8F` release
    #[default]
    PressRelease,
    /// `0x80..=0x87` flip the modifier
    Toggle,
}

/// Modifier used by the default Fn layer binding of function keys
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FnModifierToml {
    #[default]
    Ctrl,
    Shift,
    Alt,
    Gui,
}

/// Protocol variant flags
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolTomlConfig {
    /// Every byte is preceded by the ZERO, ONE start symbol
    #[serde_inline_default(true)]
    pub start_symbol: bool,
    #[serde(default)]
    pub modifier_mode: ModifierModeToml,
    /// Enable the Fn layer bytes
    #[serde_inline_default(true)]
    pub fn_layer: bool,
    #[serde(default)]
    pub fn_modifier: FnModifierToml,
}

impl Default for ProtocolTomlConfig {
    fn default() -> Self {
        Self {
            start_symbol: true,
            modifier_mode: ModifierModeToml::default(),
            fn_layer: true,
            fn_modifier: FnModifierToml::default(),
        }
    }
}

/// Buffer sizes
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinkeyConstantsConfig {
    /// Edge channel size, between the line sampler and the receiver
    #[serde_inline_default(defaults::EDGE_CHANNEL_SIZE)]
    pub edge_channel_size: usize,
    /// Report channel size, between the receiver and the hid writer
    #[serde_inline_default(defaults::REPORT_CHANNEL_SIZE)]
    pub report_channel_size: usize,
}

impl Default for BinkeyConstantsConfig {
    fn default() -> Self {
        Self {
            edge_channel_size: defaults::EDGE_CHANNEL_SIZE,
            report_channel_size: defaults::REPORT_CHANNEL_SIZE,
        }
    }
}

/// Contents of `binkey.toml`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinkeyTomlConfig {
    #[serde(default)]
    pub link: LinkTomlConfig,
    #[serde(default)]
    pub protocol: ProtocolTomlConfig,
    #[serde(default)]
    pub constants: BinkeyConstantsConfig,
}

impl BinkeyTomlConfig {
    /// Parse and validate a config from toml text. `origin` only names the source in errors.
    pub fn from_toml_str(s: &str, origin: &str) -> ConfigResult<Self> {
        let config: BinkeyTomlConfig = toml::from_str(s).map_err(|e| ConfigError::TomlParse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&s, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BinkeyTomlConfig::from_toml_str("", "empty").unwrap();
        assert_eq!(config.link.pulse_ms, defaults::PULSE_MS);
        assert_eq!(config.link.inactivity_timeout_ms, 2000);
        assert!(config.protocol.start_symbol);
        assert_eq!(config.protocol.modifier_mode, ModifierModeToml::PressRelease);
        assert_eq!(config.protocol.fn_modifier, FnModifierToml::Ctrl);
        assert_eq!(config.constants.edge_channel_size, defaults::EDGE_CHANNEL_SIZE);
    }

    #[test]
    fn test_partial_sections() {
        let config = BinkeyTomlConfig::from_toml_str(
            r#"
            [link]
            pulse_ms = 10
            gap_ms = 15

            [protocol]
            start_symbol = false
            modifier_mode = "toggle"
            fn_modifier = "alt"
            "#,
            "partial",
        )
        .unwrap();
        assert_eq!(config.link.pulse_ms, 10);
        assert_eq!(config.link.gap_ms, 15);
        assert_eq!(config.link.start_window_ms, defaults::START_WINDOW_MS);
        assert!(!config.protocol.start_symbol);
        assert!(config.protocol.fn_layer);
        assert_eq!(config.protocol.modifier_mode, ModifierModeToml::Toggle);
        assert_eq!(config.protocol.fn_modifier, FnModifierToml::Alt);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = BinkeyTomlConfig::from_toml_str("[link]\nspeed = 3\n", "typo").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = BinkeyTomlConfig::load("/nonexistent/binkey.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
