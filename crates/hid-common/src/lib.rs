//! Common HID plumbing for gamepad protocol implementations
//!
//! This crate provides the transport seam consumed by the Xbox 360 driver:
//! a synchronous [`HidDevice`] trait, a bounds-checked [`ReportParser`] for
//! fixed-layout input reports, device identity, and an in-memory mock device
//! for tests. A `hidapi` adapter is available behind the `hidapi` feature.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hid_traits;
pub mod report_parser;

#[cfg(feature = "hidapi")]
pub mod hidapi_device;

pub use device_info::*;
pub use hid_traits::*;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Device disconnected")]
    Disconnected,
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
