//! Poll-driven driver for the wired Xbox 360 controller.
//!
//! [`Xbox360Controller`] owns a [`HidDevice`](gamepad_hid_common::HidDevice)
//! transport and the per-device decode state. Call
//! [`update`](Xbox360Controller::update) from the host's poll loop to drain
//! pending input reports into an [`EventSink`](hid_xbox360_protocol::EventSink);
//! player LED and rumble commands are written synchronously.
//!
//! ```
//! use gamepad_hid_common::mock::MockHidDevice;
//! use xbox360_driver::{DriverConfig, Xbox360Controller};
//!
//! # fn main() -> Result<(), xbox360_driver::DriverError> {
//! let device = MockHidDevice::new(0x045E, 0x028E, "mock");
//! device.queue_read([0x00, 0x14, 0x10, 0x00]);
//!
//! let mut controller = Xbox360Controller::open(device, DriverConfig::default())?;
//! let mut events = Vec::new();
//! let stats = controller.update(&mut events)?;
//! assert_eq!(stats.reports_decoded, 1);
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod sink;

pub use config::{DriverConfig, DriverConfigBuilder, MAX_REPORTS_PER_UPDATE_LIMIT, host_inverts_y_axes};
pub use controller::{UpdateStats, Xbox360Controller};
pub use error::{DriverError, DriverResult, ErrorSeverity, Feature};
pub use sink::{StateTracker, TracingSink, Tee};
