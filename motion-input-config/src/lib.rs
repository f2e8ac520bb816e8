//! TOML configuration of motion-input devices
//!
//! ```toml
//! [[optical]]
//! name = "trackball"
//! cpi = 1600
//!
//! [[joystick]]
//! name = "thumbstick"
//! channel_x = 2
//! channel_y = 3
//! invert_y = true
//! ```
//!
//! Each `[[optical]]` or `[[joystick]]` entry describes one independent device instance.

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
use motion_input::config::{JoystickConfig, OpticalSensorConfig};
pub use types::*;

impl DeviceTomlConfig {
    /// Driver configuration of every optical sensor, with its name
    pub fn optical_configs(&self) -> impl Iterator<Item = (&str, OpticalSensorConfig)> {
        self.optical.iter().map(|o| (o.name.as_str(), OpticalSensorConfig::from(o)))
    }

    /// Driver configuration of every joystick, with its name
    pub fn joystick_configs(&self) -> impl Iterator<Item = (&str, JoystickConfig)> {
        self.joystick.iter().map(|j| (j.name.as_str(), JoystickConfig::from(j)))
    }
}
