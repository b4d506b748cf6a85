//! Xbox 360 state report decoding.
//!
//! A wired controller streams 20-byte state reports:
//!
//! ```text
//! Byte 0      report type (0x00 = state)
//! Byte 1      report length
//! Byte 2      D-pad up/down/left/right, Start, Back, L3, R3 (bits 0..7)
//! Byte 3      LB, RB, Guide, (unused), A, B, X, Y       (bits 0..7)
//! Byte 4, 5   left / right trigger, 0..=255
//! Bytes 6..13 left X, left Y, right X, right Y, i16 little-endian
//! ```
//!
//! Buttons are diffed per byte against the previous report: when a button
//! byte changes, every button carried by that byte is re-emitted, including
//! the ones whose bit did not flip. Consumers that count events depend on
//! this cadence. Axes are emitted on every report.
//!
//! Decoding never reads past the end of the report. Missing button bytes
//! emit nothing and missing axis fields are reported as `0`.

#![deny(static_mut_refs)]

use crate::ids::{USB_PACKET_LENGTH, offsets, report_types};
use crate::types::{AxisEvent, ButtonEvent, ControllerEvent, Xbox360Axis, Xbox360Button};
use gamepad_hid_common::ReportParser;

/// Receives decoded events in report order.
pub trait EventSink {
    fn emit(&mut self, event: ControllerEvent);
}

impl EventSink for Vec<ControllerEvent> {
    fn emit(&mut self, event: ControllerEvent) {
        self.push(event);
    }
}

/// Bit assignments of byte 2, in emission order.
pub const BUTTONS_LOW_MAP: [(u8, Xbox360Button); 8] = [
    (0x01, Xbox360Button::DpadUp),
    (0x02, Xbox360Button::DpadDown),
    (0x04, Xbox360Button::DpadLeft),
    (0x08, Xbox360Button::DpadRight),
    (0x10, Xbox360Button::Start),
    (0x20, Xbox360Button::Back),
    (0x40, Xbox360Button::LeftStick),
    (0x80, Xbox360Button::RightStick),
];

/// Bit assignments of byte 3, in emission order. Bit 3 is unused.
pub const BUTTONS_HIGH_MAP: [(u8, Xbox360Button); 7] = [
    (0x01, Xbox360Button::LeftShoulder),
    (0x02, Xbox360Button::RightShoulder),
    (0x04, Xbox360Button::Guide),
    (0x10, Xbox360Button::A),
    (0x20, Xbox360Button::B),
    (0x40, Xbox360Button::X),
    (0x80, Xbox360Button::Y),
];

/// Order in which axes are emitted for every decoded report.
pub const AXIS_REPORT_ORDER: [Xbox360Axis; crate::AXIS_COUNT] = [
    Xbox360Axis::TriggerLeft,
    Xbox360Axis::TriggerRight,
    Xbox360Axis::LeftX,
    Xbox360Axis::LeftY,
    Xbox360Axis::RightX,
    Xbox360Axis::RightY,
];

/// Per-device state owned by exactly one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    /// Previous report, the baseline for button diffing.
    pub last_report: [u8; USB_PACKET_LENGTH],
    /// Player slot; negative when unassigned.
    pub player_index: i32,
    /// Whether the player ring should be lit.
    pub player_lights: bool,
}

impl DeviceState {
    pub fn new(player_index: i32, player_lights: bool) -> Self {
        Self {
            last_report: [0; USB_PACKET_LENGTH],
            player_index,
            player_lights,
        }
    }

    /// Zero the diff baseline, as on a fresh open.
    pub fn reset_baseline(&mut self) {
        self.last_report = [0; USB_PACKET_LENGTH];
    }

    fn baseline(&self, offset: usize) -> Option<u8> {
        self.last_report.get(offset).copied()
    }

    /// Overwrite the first `min(report.len(), USB_PACKET_LENGTH)` bytes.
    /// Bytes past a short report keep their previous values.
    fn store_baseline(&mut self, report: &[u8]) {
        let n = report.len().min(USB_PACKET_LENGTH);
        if let (Some(dst), Some(src)) = (self.last_report.get_mut(..n), report.get(..n)) {
            dst.copy_from_slice(src);
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new(-1, true)
    }
}

/// Fields of one state report, `None` where the report was too short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Xbox360StateReport {
    pub buttons_low: Option<u8>,
    pub buttons_high: Option<u8>,
    pub trigger_left: Option<u8>,
    pub trigger_right: Option<u8>,
    pub left_x: Option<i16>,
    pub left_y: Option<i16>,
    pub right_x: Option<i16>,
    pub right_y: Option<i16>,
}

impl Xbox360StateReport {
    pub fn is_pressed(&self, button: Xbox360Button) -> bool {
        let lookup = |byte: Option<u8>, map: &[(u8, Xbox360Button)]| {
            map.iter()
                .find(|(_, b)| *b == button)
                .is_some_and(|(mask, _)| byte.is_some_and(|v| v & mask != 0))
        };
        lookup(self.buttons_low, &BUTTONS_LOW_MAP) || lookup(self.buttons_high, &BUTTONS_HIGH_MAP)
    }

    /// Normalized axis value, `0` when the field was missing.
    ///
    /// With `invert_y_axes`, the Y sticks are bitwise-inverted so that up is
    /// negative on hosts with that convention.
    pub fn axis_value(&self, axis: Xbox360Axis, invert_y_axes: bool) -> i16 {
        let invert = |v: i16| if invert_y_axes { !v } else { v };
        let value = match axis {
            Xbox360Axis::TriggerLeft => self.trigger_left.map(trigger_to_axis),
            Xbox360Axis::TriggerRight => self.trigger_right.map(trigger_to_axis),
            Xbox360Axis::LeftX => self.left_x,
            Xbox360Axis::LeftY => self.left_y.map(invert),
            Xbox360Axis::RightX => self.right_x,
            Xbox360Axis::RightY => self.right_y.map(invert),
        };
        value.unwrap_or(0)
    }
}

/// Parse a state report (type `0x00`).
///
/// Returns `None` for an empty report or any other report type.
pub fn parse_state_report(data: &[u8]) -> Option<Xbox360StateReport> {
    let parser = ReportParser::new(data);
    if parser.u8_at(offsets::REPORT_TYPE)? != report_types::STATE {
        return None;
    }

    Some(Xbox360StateReport {
        buttons_low: parser.u8_at(offsets::BUTTONS_LOW),
        buttons_high: parser.u8_at(offsets::BUTTONS_HIGH),
        trigger_left: parser.u8_at(offsets::TRIGGER_LEFT),
        trigger_right: parser.u8_at(offsets::TRIGGER_RIGHT),
        left_x: parser.i16_le_at(offsets::LEFT_X),
        left_y: parser.i16_le_at(offsets::LEFT_Y),
        right_x: parser.i16_le_at(offsets::RIGHT_X),
        right_y: parser.i16_le_at(offsets::RIGHT_Y),
    })
}

/// Rescale a 0..=255 trigger to the full signed range: 0 → -32768, 255 → 32767.
pub fn trigger_to_axis(raw: u8) -> i16 {
    let scaled = i32::from(raw) * 257 - 32768;
    // 0..=255 * 257 - 32768 spans exactly i16::MIN..=i16::MAX.
    i16::try_from(scaled).unwrap_or(i16::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded {
        button_events: usize,
        axis_events: usize,
    },
    /// Not a state report. `report_type` is `None` for an empty report.
    Ignored { report_type: Option<u8> },
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }
}

/// Turns state reports into controller events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xbox360Decoder {
    invert_y_axes: bool,
}

impl Xbox360Decoder {
    pub fn new(invert_y_axes: bool) -> Self {
        Self { invert_y_axes }
    }

    pub fn invert_y_axes(&self) -> bool {
        self.invert_y_axes
    }

    pub fn set_invert_y_axes(&mut self, invert: bool) {
        self.invert_y_axes = invert;
    }

    /// Decode one report, emit its events and make it the new baseline.
    ///
    /// Order: byte-2 buttons, byte-3 buttons, then all six axes in
    /// [`AXIS_REPORT_ORDER`]. Reports that are not state reports are dropped
    /// without touching `state`.
    pub fn decode<S: EventSink + ?Sized>(
        &self,
        report: &[u8],
        state: &mut DeviceState,
        sink: &mut S,
    ) -> DecodeOutcome {
        let Some(parsed) = parse_state_report(report) else {
            return DecodeOutcome::Ignored {
                report_type: report.first().copied(),
            };
        };

        let mut button_events = emit_changed_block(
            parsed.buttons_low,
            state.baseline(offsets::BUTTONS_LOW),
            &BUTTONS_LOW_MAP,
            sink,
        );
        button_events += emit_changed_block(
            parsed.buttons_high,
            state.baseline(offsets::BUTTONS_HIGH),
            &BUTTONS_HIGH_MAP,
            sink,
        );

        for axis in AXIS_REPORT_ORDER {
            sink.emit(ControllerEvent::Axis(AxisEvent {
                axis,
                value: parsed.axis_value(axis, self.invert_y_axes),
            }));
        }

        state.store_baseline(report);

        DecodeOutcome::Decoded {
            button_events,
            axis_events: AXIS_REPORT_ORDER.len(),
        }
    }
}

/// Emit every button of `map` if the byte changed. Returns the event count.
fn emit_changed_block<S: EventSink + ?Sized>(
    current: Option<u8>,
    previous: Option<u8>,
    map: &[(u8, Xbox360Button)],
    sink: &mut S,
) -> usize {
    let Some(current) = current else {
        return 0;
    };
    if previous == Some(current) {
        return 0;
    }

    for &(mask, button) in map {
        sink.emit(ControllerEvent::Button(ButtonEvent {
            button,
            pressed: current & mask != 0,
        }));
    }
    map.len()
}
