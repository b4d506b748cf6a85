//! One opened Xbox 360 controller.
//!
//! The controller owns its [`DeviceState`] and its transport. Every call that
//! touches either takes `&mut self`, so polling and configuration updates for
//! one device are serialized by construction.

use crate::config::DriverConfig;
use crate::error::{DriverError, DriverResult, Feature};
use gamepad_hid_common::{HidDevice, HidDeviceInfo};
use hid_xbox360_protocol::{
    Capabilities, DecodeOutcome, DeviceState, EventSink, LedPattern, USB_PACKET_LENGTH,
    Xbox360Decoder, build_player_led_report, build_rumble_report, is_steam_virtual_gamepad,
    parse_steam_virtual_slot, player_slot,
};
use serde::Serialize;
use tracing::{Level, debug, enabled, info, trace, warn};

/// Counters for one [`Xbox360Controller::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStats {
    pub reports_read: usize,
    pub reports_decoded: usize,
    pub reports_ignored: usize,
    pub button_events: usize,
    pub axis_events: usize,
}

pub struct Xbox360Controller<D: HidDevice> {
    device: D,
    decoder: Xbox360Decoder,
    state: DeviceState,
    config: DriverConfig,
    connected: bool,
    steam_virtual_slot: Option<i32>,
    read_buf: [u8; USB_PACKET_LENGTH],
}

impl<D: HidDevice> Xbox360Controller<D> {
    /// Take ownership of an opened transport and light the player ring.
    ///
    /// A failed initial indicator write is logged and does not fail the open.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidConfig`] for an invalid configuration and
    /// [`DriverError::Disconnected`] if the transport is already closed.
    pub fn open(device: D, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        if !device.is_connected() {
            return Err(DriverError::Disconnected);
        }

        let info = device.device_info();
        let steam_virtual_slot = if is_steam_virtual_gamepad(info.vendor_id, info.product_id) {
            info.product_name.as_deref().and_then(parse_steam_virtual_slot)
        } else {
            None
        };

        info!(
            "Opening Xbox 360 controller {} ({}) player={} lights={} steam_slot={:?}",
            info.display_name(),
            info.usb_id(),
            config.player_index,
            config.player_lights,
            steam_virtual_slot
        );

        let mut controller = Self {
            decoder: Xbox360Decoder::new(config.effective_invert_y_axes()),
            state: DeviceState::new(config.player_index, config.player_lights),
            config,
            connected: true,
            steam_virtual_slot,
            read_buf: [0; USB_PACKET_LENGTH],
            device,
        };

        if let Err(e) = controller.update_slot_led() {
            warn!("{}: {e}", controller.device_label());
        }

        Ok(controller)
    }

    /// Drain pending reports from the transport and decode them into `sink`.
    ///
    /// Stops at the first empty read or after `max_reports_per_update`
    /// reports. Reports other than state reports are skipped.
    ///
    /// # Errors
    ///
    /// A read failure marks the controller disconnected and returns
    /// [`DriverError::Disconnected`]; every later call returns it too.
    pub fn update<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> DriverResult<UpdateStats> {
        self.ensure_connected()?;

        let mut stats = UpdateStats::default();
        while stats.reports_read < self.config.max_reports_per_update {
            let size = match self
                .device
                .read_report(&mut self.read_buf, self.config.read_timeout_ms)
            {
                Ok(0) => break,
                Ok(size) => size.min(USB_PACKET_LENGTH),
                Err(e) => {
                    warn!("{}: read failed, device disconnected: {e}", self.device_label());
                    self.connected = false;
                    return Err(DriverError::Disconnected);
                }
            };
            stats.reports_read += 1;

            let report = self.read_buf.get(..size).unwrap_or_default();
            if enabled!(Level::TRACE) {
                trace!("Xbox 360 packet: size = {size} {}", hex_dump(report));
            }

            match self.decoder.decode(report, &mut self.state, sink) {
                DecodeOutcome::Decoded {
                    button_events,
                    axis_events,
                } => {
                    stats.reports_decoded += 1;
                    stats.button_events += button_events;
                    stats.axis_events += axis_events;
                }
                DecodeOutcome::Ignored { report_type } => {
                    stats.reports_ignored += 1;
                    debug!("skipping report type {report_type:02x?} ({size} bytes)");
                }
            }
        }

        Ok(stats)
    }

    /// Assign a player slot and refresh the ring.
    ///
    /// # Errors
    ///
    /// [`DriverError::IndicatorUpdateFailed`] if the LED command was not
    /// fully written; the new index is kept.
    pub fn set_player_index(&mut self, player_index: i32) -> DriverResult<()> {
        self.ensure_connected()?;
        self.state.player_index = player_index;
        self.config.player_index = player_index;
        self.update_slot_led()
    }

    /// Enable or disable the player ring. No command is sent when unchanged.
    ///
    /// # Errors
    ///
    /// [`DriverError::IndicatorUpdateFailed`] if the LED command was not
    /// fully written.
    pub fn set_player_lights(&mut self, enabled: bool) -> DriverResult<()> {
        self.ensure_connected()?;
        if self.state.player_lights == enabled {
            return Ok(());
        }
        self.state.player_lights = enabled;
        self.config.player_lights = enabled;
        self.update_slot_led()
    }

    /// Replace the configuration. The ring is refreshed only if the player
    /// index or the lights setting changed.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidConfig`] leaves the controller untouched;
    /// [`DriverError::IndicatorUpdateFailed`] is returned after the new
    /// configuration has been applied.
    pub fn apply_config(&mut self, config: &DriverConfig) -> DriverResult<()> {
        config.validate()?;
        self.ensure_connected()?;

        let led_changed = config.player_index != self.state.player_index
            || config.player_lights != self.state.player_lights;

        self.decoder
            .set_invert_y_axes(config.effective_invert_y_axes());
        self.state.player_index = config.player_index;
        self.state.player_lights = config.player_lights;
        self.config = config.clone();

        debug!(
            "{}: config applied invert_y={} led_changed={led_changed}",
            self.device_label(),
            self.decoder.invert_y_axes()
        );

        if led_changed {
            self.update_slot_led()?;
        }
        Ok(())
    }

    /// Drive both rumble motors. Only the upper 8 bits of each magnitude are sent.
    ///
    /// # Errors
    ///
    /// [`DriverError::RumbleRejected`] if the command was not fully written.
    pub fn rumble(&mut self, low_frequency: u16, high_frequency: u16) -> DriverResult<()> {
        self.ensure_connected()?;
        let report = build_rumble_report(low_frequency, high_frequency);
        debug!(
            "{}: rumble low=0x{low_frequency:04X} high=0x{high_frequency:04X}",
            self.device_label()
        );
        self.write_command(&report)
            .map_err(|reason| DriverError::RumbleRejected { reason })
    }

    /// The wired controller has no trigger motors.
    pub fn rumble_triggers(&mut self, _left: u16, _right: u16) -> DriverResult<()> {
        Err(DriverError::unsupported(Feature::TriggerRumble))
    }

    /// The player ring is not an RGB LED.
    pub fn set_led(&mut self, _red: u8, _green: u8, _blue: u8) -> DriverResult<()> {
        Err(DriverError::unsupported(Feature::RgbLed))
    }

    pub fn send_effect(&mut self, _data: &[u8]) -> DriverResult<()> {
        Err(DriverError::unsupported(Feature::Effects))
    }

    pub fn set_sensors_enabled(&mut self, _enabled: bool) -> DriverResult<()> {
        Err(DriverError::unsupported(Feature::Sensors))
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::XBOX360_WIRED
    }

    /// Close the transport. Later calls report [`DriverError::Disconnected`].
    ///
    /// # Errors
    ///
    /// Propagates a transport close failure.
    pub fn close(&mut self) -> DriverResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        info!("Closing Xbox 360 controller {}", self.device_label());
        self.device.close()?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected && self.device.is_connected()
    }

    pub fn player_index(&self) -> i32 {
        self.state.player_index
    }

    pub fn player_lights(&self) -> bool {
        self.state.player_lights
    }

    pub fn invert_y_axes(&self) -> bool {
        self.decoder.invert_y_axes()
    }

    /// Zero-based Steam slot when the device is a Steam virtual gamepad.
    pub fn steam_virtual_slot(&self) -> Option<i32> {
        self.steam_virtual_slot
    }

    pub fn device_info(&self) -> &HidDeviceInfo {
        self.device.device_info()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn into_device(self) -> D {
        self.device
    }

    fn ensure_connected(&self) -> DriverResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(DriverError::Disconnected)
        }
    }

    fn device_label(&self) -> String {
        self.device.device_info().usb_id()
    }

    /// Ring on for an assigned player with lights enabled, off otherwise.
    fn update_slot_led(&mut self) -> DriverResult<()> {
        let (slot, on) = match player_slot(self.state.player_index) {
            Some(slot) if self.state.player_lights => (slot, true),
            _ => (0, false),
        };
        let report = build_player_led_report(slot, on, LedPattern::Solid);
        debug!(
            "{}: player LED slot={slot} on={on} report={report:02x?}",
            self.device_label()
        );
        self.write_command(&report)
            .map_err(|reason| DriverError::IndicatorUpdateFailed { reason })
    }

    /// Write a whole command. Short writes are failures; nothing is retried.
    fn write_command(&mut self, data: &[u8]) -> Result<(), String> {
        match self.device.write_report(data) {
            Ok(n) if n == data.len() => Ok(()),
            Ok(n) => Err(format!("wrote {n} of {} bytes", data.len())),
            Err(e) => Err(e.to_string()),
        }
    }
}

fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
