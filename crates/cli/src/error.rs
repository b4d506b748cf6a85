//! Error types for xbox360ctl

use thiserror::Error;
use xbox360_driver::DriverError;

#[derive(Error, Debug)]
pub enum CliError {
    #[cfg(feature = "hidapi")]
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Invalid hex input: {0}")]
    InvalidHex(String),

    #[error("Invalid capture file: {0}")]
    InvalidCapture(String),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            #[cfg(feature = "hidapi")]
            Self::DeviceNotFound(_) => 2,
            Self::InvalidHex(_) | Self::InvalidCapture(_) | Self::JsonError(_) => 3,
            Self::YamlError(_) | Self::Driver(DriverError::InvalidConfig(_)) => 4,
            Self::Driver(e) if e.is_fatal() => 5,
            Self::Driver(_) | Self::IoError(_) => 1,
        }
    }
}
