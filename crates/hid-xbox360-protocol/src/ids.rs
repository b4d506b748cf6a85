//! Xbox 360 USB identifiers, report types and command bytes.

#![deny(static_mut_refs)]

/// Maximum size of one interrupt transfer; the decoder's diff baseline.
pub const USB_PACKET_LENGTH: usize = 64;

/// Logical buttons exposed by the wired controller.
pub const BUTTON_COUNT: usize = 15;

/// Logical axes exposed by the wired controller (two sticks, two triggers).
pub const AXIS_COUNT: usize = 6;

/// Microsoft USB vendor ID.
pub const MICROSOFT_VENDOR_ID: u16 = 0x045E;

/// Valve USB vendor ID (Steam virtual gamepads).
pub const VALVE_VENDOR_ID: u16 = 0x28DE;

/// ASTRO Gaming USB vendor ID.
pub const ASTRO_VENDOR_ID: u16 = 0x9886;

/// Known product IDs.
pub mod product_ids {
    /// Wired Xbox 360 controller.
    pub const XBOX360_WIRED: u16 = 0x028E;
    /// Xbox 360 wireless receiver. Speaks a different protocol.
    pub const XBOX360_WIRELESS_RECEIVER: u16 = 0x0291;
    /// Xbox 360 wireless receiver, second revision. Speaks a different protocol.
    pub const XBOX360_WIRELESS_RECEIVER_V2: u16 = 0x0719;
    /// ASTRO C40 TR in Xbox 360 mode (vendor [`super::ASTRO_VENDOR_ID`]).
    pub const ASTRO_C40_XBOX360: u16 = 0x0024;
    /// Steam virtual gamepad (vendor [`super::VALVE_VENDOR_ID`]).
    pub const STEAM_VIRTUAL_GAMEPAD: u16 = 0x11FF;
}

/// Report type tags carried in byte 0 of an input report.
pub mod report_types {
    /// Controller state: buttons, triggers and sticks.
    pub const STATE: u8 = 0x00;
}

/// Byte offsets inside a state report.
pub mod offsets {
    pub const REPORT_TYPE: usize = 0;
    /// D-pad, Start, Back, stick clicks.
    pub const BUTTONS_LOW: usize = 2;
    /// Shoulders, Guide, face buttons.
    pub const BUTTONS_HIGH: usize = 3;
    pub const TRIGGER_LEFT: usize = 4;
    pub const TRIGGER_RIGHT: usize = 5;
    pub const LEFT_X: usize = 6;
    pub const LEFT_Y: usize = 8;
    pub const RIGHT_X: usize = 10;
    pub const RIGHT_Y: usize = 12;
}

/// Leading bytes of output commands.
pub mod commands {
    /// Player LED command header: `[0x01, 0x03, mode]`.
    pub const LED_HEADER: [u8; 2] = [0x01, 0x03];
    /// LED mode base for a solid ring segment.
    pub const LED_SOLID_BASE: u8 = 0x06;
    /// LED mode base for a blinking ring segment.
    pub const LED_BLINK_BASE: u8 = 0x02;
    /// LED mode that switches the ring off.
    pub const LED_OFF: u8 = 0x00;
    /// Rumble command header: `[0x00, 0x08, ...]`.
    pub const RUMBLE_HEADER: [u8; 2] = [0x00, 0x08];
}

/// Prefix of the product string Steam gives its virtual gamepads.
const STEAM_VIRTUAL_PREFIX: &str = "GamePad-";

/// `true` for Steam's virtual Xbox 360 gamepad.
pub fn is_steam_virtual_gamepad(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VALVE_VENDOR_ID && product_id == product_ids::STEAM_VIRTUAL_GAMEPAD
}

/// Zero-based Steam slot from a `GamePad-<n>` product string.
///
/// Steam numbers its pads from 1; a string with the prefix but no number
/// yields slot `-1`, matching what Steam reports for an unnumbered pad.
pub fn parse_steam_virtual_slot(product: &str) -> Option<i32> {
    let rest = product.strip_prefix(STEAM_VIRTUAL_PREFIX)?;
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    let n = rest
        .get(..digits_end)
        .and_then(|digits| digits.parse::<i32>().ok())
        .unwrap_or(0);
    Some(n.saturating_sub(1))
}
