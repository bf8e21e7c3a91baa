//! Runtime configuration: device names, paths and classifier thresholds.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classify::{Classifier, Thresholds};
use crate::error::{Error, Result};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "MODESWITCH_CONFIG";

/// Controller configuration. Every field has a default matching a stock
/// convertible with an HID accelerometer and `acpid` running.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub acpid_socket: PathBuf,
    pub tablet_module: String,
    pub tablet_source: String,
    /// ACPI state value that means "folded into tablet".
    pub tablet_state: String,
    /// IIO device name of the accelerometer.
    pub accel_name: String,
    pub sysfs_root: PathBuf,
    pub dev_root: PathBuf,
    pub x_channel: String,
    pub y_channel: String,
    /// Ring buffer length in scans.
    pub buffer_capacity: usize,
    /// Trigger to attach; derived from the device when unset.
    pub trigger: Option<String>,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acpid_socket: PathBuf::from("/var/run/acpid.socket"),
            tablet_module: "video/tabletmode".to_string(),
            tablet_source: "TBLT".to_string(),
            tablet_state: "00000001".to_string(),
            accel_name: "accel_3d".to_string(),
            sysfs_root: PathBuf::from("/sys/bus/iio/devices"),
            dev_root: PathBuf::from("/dev"),
            x_channel: "in_accel_x".to_string(),
            y_channel: "in_accel_y".to_string(),
            buffer_capacity: 16,
            trigger: None,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Load a TOML file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &contents)
    }

    /// Load the file named by `MODESWITCH_CONFIG`, or use defaults.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.buffer_capacity == 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "buffer_capacity must be at least 1".to_string(),
            });
        }
        if config.thresholds.dead_zone < 0 || config.thresholds.tilt < 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "thresholds must be non-negative".to_string(),
            });
        }
        Ok(config)
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.thresholds, &self.x_channel, &self.y_channel)
    }
}
