//! Driver error types.

use gamepad_hid_common::HidCommonError;
use std::fmt;

/// Capabilities the wired controller does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    TriggerRumble,
    RgbLed,
    Effects,
    Sensors,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TriggerRumble => "trigger rumble",
            Self::RgbLed => "RGB LED",
            Self::Effects => "custom effects",
            Self::Sensors => "sensors",
        };
        f.write_str(name)
    }
}

/// How far a failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The caller asked for something the device cannot do.
    Info,
    /// One command was lost; the device is still usable.
    Warning,
    /// The device instance is gone and must be reopened.
    Critical,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A transport read failed. Terminal for this controller instance.
    #[error("Device disconnected")]
    Disconnected,

    #[error("Operation not supported by Xbox 360 controller: {feature}")]
    Unsupported { feature: Feature },

    #[error("Player indicator update failed: {reason}")]
    IndicatorUpdateFailed { reason: String },

    #[error("Rumble command rejected: {reason}")]
    RumbleRejected { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HID error: {0}")]
    Hid(#[from] HidCommonError),
}

impl DriverError {
    pub fn unsupported(feature: Feature) -> Self {
        Self::Unsupported { feature }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Disconnected => ErrorSeverity::Critical,
            Self::Hid(HidCommonError::Disconnected) => ErrorSeverity::Critical,
            Self::Unsupported { .. } | Self::InvalidConfig(_) => ErrorSeverity::Info,
            Self::IndicatorUpdateFailed { .. } | Self::RumbleRejected { .. } | Self::Hid(_) => {
                ErrorSeverity::Warning
            }
        }
    }

    /// `true` when the controller must be dropped and the device reopened.
    pub fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

pub type DriverResult<T> = Result<T, DriverError>;
