//! Logical controls and the events emitted for them.

#![deny(static_mut_refs)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical gamepad buttons, in the conventional game-controller order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Xbox360Button {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl Xbox360Button {
    pub const ALL: [Self; crate::BUTTON_COUNT] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::Back,
        Self::Guide,
        Self::Start,
        Self::LeftStick,
        Self::RightStick,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::DpadUp,
        Self::DpadDown,
        Self::DpadLeft,
        Self::DpadRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::X => "x",
            Self::Y => "y",
            Self::Back => "back",
            Self::Guide => "guide",
            Self::Start => "start",
            Self::LeftStick => "leftstick",
            Self::RightStick => "rightstick",
            Self::LeftShoulder => "leftshoulder",
            Self::RightShoulder => "rightshoulder",
            Self::DpadUp => "dpup",
            Self::DpadDown => "dpdown",
            Self::DpadLeft => "dpleft",
            Self::DpadRight => "dpright",
        }
    }
}

impl fmt::Display for Xbox360Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical axes. Every axis is reported as a full-range signed 16-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Xbox360Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

impl Xbox360Axis {
    pub const ALL: [Self; crate::AXIS_COUNT] = [
        Self::LeftX,
        Self::LeftY,
        Self::RightX,
        Self::RightY,
        Self::TriggerLeft,
        Self::TriggerRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftX => "leftx",
            Self::LeftY => "lefty",
            Self::RightX => "rightx",
            Self::RightY => "righty",
            Self::TriggerLeft => "lefttrigger",
            Self::TriggerRight => "righttrigger",
        }
    }

    pub fn is_trigger(self) -> bool {
        matches!(self, Self::TriggerLeft | Self::TriggerRight)
    }
}

impl fmt::Display for Xbox360Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEvent {
    pub button: Xbox360Button,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisEvent {
    pub axis: Xbox360Axis,
    pub value: i16,
}

/// One decoded change, as delivered to an [`EventSink`](crate::EventSink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerEvent {
    Button(ButtonEvent),
    Axis(AxisEvent),
}

impl ControllerEvent {
    pub fn as_button(&self) -> Option<ButtonEvent> {
        match self {
            Self::Button(event) => Some(*event),
            Self::Axis(_) => None,
        }
    }

    pub fn as_axis(&self) -> Option<AxisEvent> {
        match self {
            Self::Axis(event) => Some(*event),
            Self::Button(_) => None,
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Button(ButtonEvent { button, pressed }) => {
                let state = if *pressed { "pressed" } else { "released" };
                write!(f, "button {button} {state}")
            }
            Self::Axis(AxisEvent { axis, value }) => write!(f, "axis {axis} {value}"),
        }
    }
}

/// What the wired controller can do beyond reporting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub rumble: bool,
    pub trigger_rumble: bool,
    pub rgb_led: bool,
    pub sensors: bool,
}

impl Capabilities {
    /// Dual-motor rumble and a player ring; no RGB LED, trigger motors or sensors.
    pub const XBOX360_WIRED: Self = Self {
        rumble: true,
        trigger_rumble: false,
        rgb_led: false,
        sensors: false,
    };
}
