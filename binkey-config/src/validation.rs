//! Centralized validation for binkey configuration

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::{BinkeyConstantsConfig, BinkeyTomlConfig, LinkTomlConfig};

/// Validates the entire configuration
pub fn validate_config(config: &BinkeyTomlConfig) -> ConfigResult<()> {
    validate_link_section(&config.link, config.protocol.start_symbol)?;
    validate_constants(&config.constants)?;
    Ok(())
}

/// Validates the [link] section
fn validate_link_section(link: &LinkTomlConfig, start_symbol: bool) -> ConfigResult<()> {
    if link.pulse_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field: "link.pulse_ms".to_string(),
            value: link.pulse_ms.to_string(),
            expected: "a non-zero duration".to_string(),
        });
    }

    if !(link.pulse_ms < link.gap_ms
        && link.gap_ms < link.start_window_ms
        && link.start_window_ms < link.inactivity_timeout_ms)
    {
        return Err(ConfigError::Validation {
            field: "link".to_string(),
            message: format!(
                "timing must satisfy pulse_ms < gap_ms < start_window_ms < inactivity_timeout_ms, got {} < {} < {} < {}",
                link.pulse_ms, link.gap_ms, link.start_window_ms, link.inactivity_timeout_ms
            ),
        });
    }

    // The receiver sees one edge per pulse period, so the start symbol needs a full period inside the window
    if start_symbol && link.pulse_ms + link.gap_ms > link.start_window_ms {
        return Err(ConfigError::Validation {
            field: "link.start_window_ms".to_string(),
            message: format!(
                "pulse_ms + gap_ms ({}) exceeds start_window_ms ({}), the start symbol can never complete",
                link.pulse_ms + link.gap_ms,
                link.start_window_ms
            ),
        });
    }

    if u64::from(link.debounce_time) >= link.pulse_ms {
        return Err(ConfigError::InvalidValue {
            field: "link.debounce_time".to_string(),
            value: link.debounce_time.to_string(),
            expected: format!("less than pulse_ms ({})", link.pulse_ms),
        });
    }

    Ok(())
}

/// Validates the [constants] section
fn validate_constants(constants: &BinkeyConstantsConfig) -> ConfigResult<()> {
    for (field, value) in [
        ("constants.edge_channel_size", constants.edge_channel_size),
        ("constants.report_channel_size", constants.report_channel_size),
    ] {
        if value == 0 || value > defaults::CHANNEL_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                expected: format!("1 to {}", defaults::CHANNEL_SIZE_LIMIT),
            });
        }
    }
    Ok(())
}
