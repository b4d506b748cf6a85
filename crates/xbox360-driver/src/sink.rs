//! Event sinks provided by the driver.

use hid_xbox360_protocol::{
    AXIS_COUNT, BUTTON_COUNT, ControllerEvent, EventSink, Xbox360Axis, Xbox360Button,
};
use serde::Serialize;
use tracing::trace;

/// Logs every event at `trace` level under the device's name.
#[derive(Debug, Clone)]
pub struct TracingSink {
    device: String,
}

impl TracingSink {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
        }
    }
}

impl EventSink for TracingSink {
    fn emit(&mut self, event: ControllerEvent) {
        trace!(device = %self.device, "{event}");
    }
}

/// Folds events into the latest known state of every control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StateTracker {
    pressed: [bool; BUTTON_COUNT],
    axes: [i16; AXIS_COUNT],
    events: u64,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, button: Xbox360Button) -> bool {
        button_slot(button)
            .and_then(|i| self.pressed.get(i).copied())
            .unwrap_or(false)
    }

    pub fn axis(&self, axis: Xbox360Axis) -> i16 {
        axis_slot(axis)
            .and_then(|i| self.axes.get(i).copied())
            .unwrap_or(0)
    }

    pub fn pressed_buttons(&self) -> Vec<Xbox360Button> {
        Xbox360Button::ALL
            .into_iter()
            .filter(|b| self.is_pressed(*b))
            .collect()
    }

    /// Total events folded in so far.
    pub fn event_count(&self) -> u64 {
        self.events
    }
}

impl EventSink for StateTracker {
    fn emit(&mut self, event: ControllerEvent) {
        self.events = self.events.saturating_add(1);
        match event {
            ControllerEvent::Button(e) => {
                if let Some(slot) = button_slot(e.button).and_then(|i| self.pressed.get_mut(i)) {
                    *slot = e.pressed;
                }
            }
            ControllerEvent::Axis(e) => {
                if let Some(slot) = axis_slot(e.axis).and_then(|i| self.axes.get_mut(i)) {
                    *slot = e.value;
                }
            }
        }
    }
}

/// Forwards every event to two sinks.
pub struct Tee<'a, A: ?Sized, B: ?Sized> {
    first: &'a mut A,
    second: &'a mut B,
}

impl<'a, A: EventSink + ?Sized, B: EventSink + ?Sized> Tee<'a, A, B> {
    pub fn new(first: &'a mut A, second: &'a mut B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink + ?Sized, B: EventSink + ?Sized> EventSink for Tee<'_, A, B> {
    fn emit(&mut self, event: ControllerEvent) {
        self.first.emit(event);
        self.second.emit(event);
    }
}

fn button_slot(button: Xbox360Button) -> Option<usize> {
    Xbox360Button::ALL.iter().position(|b| *b == button)
}

fn axis_slot(axis: Xbox360Axis) -> Option<usize> {
    Xbox360Axis::ALL.iter().position(|a| *a == axis)
}
