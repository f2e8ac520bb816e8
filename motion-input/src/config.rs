//! Per-instance device configuration
//!
//! Out-of-range values are never an error: they are clamped or replaced by the documented default
//! when the driver reads them.

use embassy_time::Duration;

use crate::input_device::adc::ChannelConfig;
use crate::input_device::conditioning::ConditioningParameters;

/// Default poll interval of the optical sensor in milliseconds
pub const OPTICAL_POLL_INTERVAL_MS: u16 = 4;
/// Default CPI of the optical sensor
pub const OPTICAL_CPI: u16 = 500;
/// Default poll interval of the joystick in milliseconds
pub const JOYSTICK_POLL_INTERVAL_MS: u16 = 10;
/// Default joystick deadzone in raw converter counts
pub const JOYSTICK_DEADZONE: u16 = 100;
/// Default joystick scale divisor
pub const JOYSTICK_SCALE_DIVISOR: u16 = 128;

/// Replace an unset (zero) interval with `default_ms`
pub(crate) fn poll_interval_or_default(interval_ms: u16, default_ms: u16) -> Duration {
    if interval_ms == 0 {
        warn!("Poll interval of 0 ms, using {} ms", default_ms);
        Duration::from_millis(default_ms as u64)
    } else {
        Duration::from_millis(interval_ms as u64)
    }
}

/// Optical sensor configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpticalSensorConfig {
    /// Interval between two poll cycles, 0 means default
    pub poll_interval_ms: u16,
    /// Target resolution, clamped into the range the sensor supports
    pub cpi: u16,
}

impl Default for OpticalSensorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: OPTICAL_POLL_INTERVAL_MS,
            cpi: OPTICAL_CPI,
        }
    }
}

impl OpticalSensorConfig {
    pub fn poll_interval(&self) -> Duration {
        poll_interval_or_default(self.poll_interval_ms, OPTICAL_POLL_INTERVAL_MS)
    }
}

/// Analog joystick configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickConfig {
    /// Interval between two poll cycles, 0 means default
    pub poll_interval_ms: u16,
    pub conditioning: ConditioningParameters,
    pub x_channel: ChannelConfig,
    pub y_channel: ChannelConfig,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: JOYSTICK_POLL_INTERVAL_MS,
            conditioning: ConditioningParameters::default(),
            x_channel: ChannelConfig::new(0),
            y_channel: ChannelConfig::new(1),
        }
    }
}

impl JoystickConfig {
    pub fn poll_interval(&self) -> Duration {
        poll_interval_or_default(self.poll_interval_ms, JOYSTICK_POLL_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let optical = OpticalSensorConfig::default();
        assert_eq!(optical.cpi, 500);
        assert_eq!(optical.poll_interval(), Duration::from_millis(4));

        let joystick = JoystickConfig::default();
        assert_eq!(joystick.poll_interval(), Duration::from_millis(10));
        assert_eq!(joystick.conditioning.deadzone, 100);
        assert_eq!(joystick.conditioning.scale_divisor, 128);
        assert!(!joystick.conditioning.invert_x);
        assert!(!joystick.conditioning.invert_y);
    }

    #[test]
    fn test_zero_interval_falls_back_to_default() {
        let optical = OpticalSensorConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(optical.poll_interval(), Duration::from_millis(4));

        let joystick = JoystickConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(joystick.poll_interval(), Duration::from_millis(10));

        let joystick = JoystickConfig {
            poll_interval_ms: 25,
            ..Default::default()
        };
        assert_eq!(joystick.poll_interval(), Duration::from_millis(25));
    }
}
