//! Xbox 360 wired controller HID protocol: state report decoding, player LED
//! and rumble encoding.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested without hardware;
//! the transport and poll loop live in `xbox360-driver`.

#![deny(static_mut_refs)]

pub mod ids;
pub mod input;
pub mod output;
pub mod types;

pub use ids::{
    AXIS_COUNT, BUTTON_COUNT, MICROSOFT_VENDOR_ID, USB_PACKET_LENGTH, is_steam_virtual_gamepad,
    parse_steam_virtual_slot, product_ids,
};
pub use input::{
    AXIS_REPORT_ORDER, DecodeOutcome, DeviceState, EventSink, Xbox360Decoder, Xbox360StateReport,
    parse_state_report, trigger_to_axis,
};
pub use output::{
    LED_REPORT_LEN, LedPattern, PLAYER_SLOTS, RUMBLE_REPORT_LEN, build_player_led_report,
    build_rumble_report, build_rumble_stop_report, player_slot,
};
pub use types::{
    AxisEvent, ButtonEvent, Capabilities, ControllerEvent, Xbox360Axis, Xbox360Button,
};
