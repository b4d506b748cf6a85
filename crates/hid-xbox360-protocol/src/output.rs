//! Xbox 360 output report encoding.
//!
//! All functions are pure and allocation-free.
//!
//! # Player ring
//!
//! The ring around the Guide button is driven by a 3-byte command
//! `[0x01, 0x03, mode]`. Mode `0x00` switches it off, `0x02..=0x05` blink
//! segment 1–4 and `0x06..=0x09` light segment 1–4 solid.
//!
//! # Rumble
//!
//! An 8-byte command `[0x00, 0x08, 0x00, 0x00, low, high, 0x00, 0x00]` where
//! `low`/`high` are the upper 8 bits of the low- and high-frequency motor
//! magnitudes. The trigger motors of newer pads do not exist on this device.

#![deny(static_mut_refs)]

use crate::ids::commands;

/// Wire size of the player LED command.
pub const LED_REPORT_LEN: usize = 3;

/// Wire size of the rumble command.
pub const RUMBLE_REPORT_LEN: usize = 8;

/// Number of segments on the player ring.
pub const PLAYER_SLOTS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedPattern {
    #[default]
    Solid,
    Blinking,
}

impl LedPattern {
    fn base(self) -> u8 {
        match self {
            Self::Solid => commands::LED_SOLID_BASE,
            Self::Blinking => commands::LED_BLINK_BASE,
        }
    }
}

/// Ring segment for a player index. Unassigned (negative) players get none.
pub fn player_slot(player_index: i32) -> Option<u8> {
    if player_index < 0 {
        return None;
    }
    u8::try_from(player_index % i32::from(PLAYER_SLOTS)).ok()
}

/// Build the 3-byte player LED command.
///
/// `slot` wraps at [`PLAYER_SLOTS`]. When `on` is false the mode byte is
/// `0x00` regardless of `slot` and `pattern`.
pub fn build_player_led_report(slot: u8, on: bool, pattern: LedPattern) -> [u8; LED_REPORT_LEN] {
    let mode = if on {
        pattern.base() + slot % PLAYER_SLOTS
    } else {
        commands::LED_OFF
    };
    let [h0, h1] = commands::LED_HEADER;
    [h0, h1, mode]
}

/// Build the 8-byte rumble command from two 16-bit motor magnitudes.
pub fn build_rumble_report(low_frequency: u16, high_frequency: u16) -> [u8; RUMBLE_REPORT_LEN] {
    let [h0, h1] = commands::RUMBLE_HEADER;
    let [_, low] = low_frequency.to_le_bytes();
    let [_, high] = high_frequency.to_le_bytes();
    [h0, h1, 0x00, 0x00, low, high, 0x00, 0x00]
}

/// Build the rumble command that stops both motors.
pub fn build_rumble_stop_report() -> [u8; RUMBLE_REPORT_LEN] {
    build_rumble_report(0, 0)
}
