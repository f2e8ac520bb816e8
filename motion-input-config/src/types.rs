// Device configuration types, as written in the TOML file

use motion_input::config::{JoystickConfig, OpticalSensorConfig};
use motion_input::input_device::adc::{ChannelConfig, Gain, Reference};
use motion_input::input_device::conditioning::ConditioningParameters;
use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

/// All devices of one board
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceTomlConfig {
    #[serde(default)]
    pub optical: Vec<OpticalToml>,
    #[serde(default)]
    pub joystick: Vec<JoystickToml>,
}

/// PMW3360 optical sensor
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpticalToml {
    /// Name of the sensor, unique among all devices
    pub name: String,
    /// Poll interval (ms), 0 selects the default
    #[serde_inline_default(motion_input::config::OPTICAL_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u16,
    /// Resolution, clamped to 100-12000 by the driver
    #[serde_inline_default(motion_input::config::OPTICAL_CPI)]
    pub cpi: u16,
}

/// Converter gain, written as the ratio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum GainToml {
    #[serde(rename = "1/6")]
    OneSixth,
    #[serde(rename = "1/5")]
    OneFifth,
    #[serde(rename = "1/4")]
    OneQuarter,
    #[serde(rename = "1/3")]
    OneThird,
    #[serde(rename = "1/2")]
    OneHalf,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "4")]
    Four,
}

impl From<GainToml> for Gain {
    fn from(gain: GainToml) -> Self {
        match gain {
            GainToml::OneSixth => Gain::Gain1_6,
            GainToml::OneFifth => Gain::Gain1_5,
            GainToml::OneQuarter => Gain::Gain1_4,
            GainToml::OneThird => Gain::Gain1_3,
            GainToml::OneHalf => Gain::Gain1_2,
            GainToml::One => Gain::Gain1,
            GainToml::Two => Gain::Gain2,
            GainToml::Four => Gain::Gain4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceToml {
    Internal,
    #[serde(rename = "vdd/4")]
    VddQuarter,
}

impl From<ReferenceToml> for Reference {
    fn from(reference: ReferenceToml) -> Self {
        match reference {
            ReferenceToml::Internal => Reference::Internal,
            ReferenceToml::VddQuarter => Reference::Vdd1_4,
        }
    }
}

/// Two-axis analog joystick
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoystickToml {
    /// Name of the joystick, unique among all devices
    pub name: String,
    /// Analog input of the X axis
    #[serde_inline_default(0)]
    pub channel_x: u8,
    /// Analog input of the Y axis
    #[serde_inline_default(1)]
    pub channel_y: u8,
    /// Poll interval (ms), 0 selects the default
    #[serde_inline_default(motion_input::config::JOYSTICK_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u16,
    /// Rest band around the calibrated center, in raw counts
    #[serde_inline_default(motion_input::config::JOYSTICK_DEADZONE)]
    pub deadzone: u16,
    /// Divisor of the offset past the deadzone, 0 behaves like 1
    #[serde_inline_default(motion_input::config::JOYSTICK_SCALE_DIVISOR)]
    pub scale_divisor: u16,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default)]
    pub invert_y: bool,
    #[serde_inline_default(GainToml::OneSixth)]
    pub gain: GainToml,
    #[serde_inline_default(ReferenceToml::Internal)]
    pub reference: ReferenceToml,
    #[serde_inline_default(40)]
    pub acquisition_time_us: u16,
    #[serde_inline_default(12)]
    pub resolution_bits: u8,
    #[serde_inline_default(4)]
    pub oversampling: u8,
}

impl From<&OpticalToml> for OpticalSensorConfig {
    fn from(optical: &OpticalToml) -> Self {
        OpticalSensorConfig {
            poll_interval_ms: optical.poll_interval_ms,
            cpi: optical.cpi,
        }
    }
}

impl JoystickToml {
    fn channel_config(&self, channel: u8) -> ChannelConfig {
        ChannelConfig {
            channel,
            gain: self.gain.into(),
            reference: self.reference.into(),
            acquisition_time_us: self.acquisition_time_us,
            resolution_bits: self.resolution_bits,
            oversampling: self.oversampling,
            calibrate: true,
        }
    }
}

impl From<&JoystickToml> for JoystickConfig {
    fn from(joystick: &JoystickToml) -> Self {
        JoystickConfig {
            poll_interval_ms: joystick.poll_interval_ms,
            conditioning: ConditioningParameters {
                deadzone: joystick.deadzone,
                scale_divisor: joystick.scale_divisor,
                invert_x: joystick.invert_x,
                invert_y: joystick.invert_y,
            },
            x_channel: joystick.channel_config(joystick.channel_x),
            y_channel: joystick.channel_config(joystick.channel_y),
        }
    }
}
