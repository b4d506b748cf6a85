//! Per-controller configuration.
//!
//! The owner of a controller pushes a new configuration through
//! [`Xbox360Controller::apply_config`](crate::Xbox360Controller::apply_config)
//! whenever a setting changes; the driver keeps no global state.

use crate::error::{DriverError, DriverResult};
use serde::{Deserialize, Serialize};

/// Upper bound on reports drained by a single `update` call.
pub const MAX_REPORTS_PER_UPDATE_LIMIT: usize = 4096;

/// Y axes are inverted everywhere except macOS, whose HID stack already
/// reports them with up negative.
pub fn host_inverts_y_axes() -> bool {
    !cfg!(target_os = "macos")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Light the player ring for the assigned player.
    ///
    /// Default: `true`.
    pub player_lights: bool,

    /// Player slot; negative when unassigned.
    ///
    /// Default: `-1`.
    pub player_index: i32,

    /// Invert the Y sticks. `None` picks [`host_inverts_y_axes`].
    pub invert_y_axes: Option<bool>,

    /// Transport read timeout in milliseconds (`0` = non-blocking, `-1` = block).
    ///
    /// Default: `0`.
    pub read_timeout_ms: i32,

    /// Maximum reports drained by one `update` call.
    ///
    /// Default: `64`.
    pub max_reports_per_update: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            player_lights: true,
            player_index: -1,
            invert_y_axes: None,
            read_timeout_ms: 0,
            max_reports_per_update: 64,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn builder() -> DriverConfigBuilder {
        DriverConfigBuilder::default()
    }

    /// Y inversion after applying the host default.
    pub fn effective_invert_y_axes(&self) -> bool {
        self.invert_y_axes.unwrap_or_else(host_inverts_y_axes)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidConfig`] if any value is out of range.
    pub fn validate(&self) -> DriverResult<()> {
        if !(1..=MAX_REPORTS_PER_UPDATE_LIMIT).contains(&self.max_reports_per_update) {
            return Err(DriverError::InvalidConfig(format!(
                "max_reports_per_update must be between 1 and {MAX_REPORTS_PER_UPDATE_LIMIT}, got {}",
                self.max_reports_per_update
            )));
        }
        if !(-1..=1000).contains(&self.read_timeout_ms) {
            return Err(DriverError::InvalidConfig(format!(
                "read_timeout_ms must be between -1 and 1000, got {}",
                self.read_timeout_ms
            )));
        }
        Ok(())
    }
}

/// Builder for [`DriverConfig`].
#[derive(Debug, Default)]
pub struct DriverConfigBuilder {
    config: DriverConfig,
}

impl DriverConfigBuilder {
    #[must_use]
    pub fn player_lights(mut self, enabled: bool) -> Self {
        self.config.player_lights = enabled;
        self
    }

    #[must_use]
    pub fn player_index(mut self, index: i32) -> Self {
        self.config.player_index = index;
        self
    }

    #[must_use]
    pub fn invert_y_axes(mut self, invert: bool) -> Self {
        self.config.invert_y_axes = Some(invert);
        self
    }

    #[must_use]
    pub fn read_timeout_ms(mut self, ms: i32) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn max_reports_per_update(mut self, count: usize) -> Self {
        self.config.max_reports_per_update = count;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> DriverResult<DriverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
