// Configuration loading

use std::path::Path;

use crate::DeviceTomlConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::validation::validate_config;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Read, parse and validate a device configuration file
    ///
    /// ```no_run
    /// use motion_input_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::load("devices.toml").unwrap();
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<DeviceTomlConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate configuration text, `origin` only appears in errors
    pub fn parse(content: &str, origin: &str) -> ConfigResult<DeviceTomlConfig> {
        let config: DeviceTomlConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })?;
        validate_config(&config)?;
        Ok(config)
    }
}
