//! Validation of a parsed device configuration
//!
//! Values the drivers clamp or default themselves (cpi, zero intervals, zero divisor) are
//! accepted as written.

use std::collections::HashSet;

use crate::DeviceTomlConfig;
use crate::error::{ConfigError, ConfigResult};

const RESOLUTIONS: [u8; 4] = [8, 10, 12, 14];

/// Validates the entire device configuration
pub fn validate_config(config: &DeviceTomlConfig) -> ConfigResult<()> {
    validate_names(config)?;
    for (i, joystick) in config.joystick.iter().enumerate() {
        let field = |name: &str| format!("joystick[{}].{}", i, name);

        if joystick.channel_x == joystick.channel_y {
            return Err(ConfigError::Validation {
                field: field("channel_y"),
                message: format!("X and Y axes both use channel {}", joystick.channel_x),
            });
        }
        if !RESOLUTIONS.contains(&joystick.resolution_bits) {
            return Err(ConfigError::InvalidValue {
                field: field("resolution_bits"),
                value: joystick.resolution_bits.to_string(),
                expected: "one of 8, 10, 12, 14".to_string(),
            });
        }
        if !joystick.oversampling.is_power_of_two() {
            return Err(ConfigError::InvalidValue {
                field: field("oversampling"),
                value: joystick.oversampling.to_string(),
                expected: "a power of two from 1 to 128".to_string(),
            });
        }
    }
    Ok(())
}

/// Every device needs a distinct, non-empty name
fn validate_names(config: &DeviceTomlConfig) -> ConfigResult<()> {
    let names = config
        .optical
        .iter()
        .map(|o| ("optical", &o.name))
        .chain(config.joystick.iter().map(|j| ("joystick", &j.name)));

    let mut seen = HashSet::new();
    for (kind, name) in names {
        if name.is_empty() {
            return Err(ConfigError::Validation {
                field: format!("{}.name", kind),
                message: "Device name must not be empty".to_string(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::Validation {
                field: format!("{}.name", kind),
                message: format!("Duplicate device name '{}'", name),
            });
        }
    }
    Ok(())
}
