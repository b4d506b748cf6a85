//! Capture files recorded by `hid-capture` and the hex notation they use.

use std::path::Path;

use gamepad_hid_common::HidDeviceInfo;
use gamepad_hid_common::mock::MockHidDevice;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureReport {
    pub timestamp_us: u64,
    pub report_id: u8,
    /// Space-separated bytes, e.g. `"0x00 0x14 0x01"`.
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureFile {
    pub vendor_id: String,
    pub product_id: String,
    pub captures: Vec<CaptureReport>,
}

impl CaptureFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&text)?;
        Ok(file)
    }

    pub fn device_info(&self, path: &Path) -> Result<HidDeviceInfo, CliError> {
        let vid = parse_hex_u16(&self.vendor_id).map_err(CliError::InvalidCapture)?;
        let pid = parse_hex_u16(&self.product_id).map_err(CliError::InvalidCapture)?;
        Ok(HidDeviceInfo::new(vid, pid, path.display().to_string()))
    }

    /// Decode every capture's payload, in recording order.
    pub fn reports(&self) -> Result<Vec<Vec<u8>>, CliError> {
        self.captures
            .iter()
            .enumerate()
            .map(|(i, capture)| {
                let bytes = parse_hex_bytes(&capture.data).map_err(|e| {
                    CliError::InvalidCapture(format!("capture #{i}: {e}"))
                })?;
                if bytes.first() != Some(&capture.report_id) {
                    warn!(
                        "capture #{i}: report_id 0x{:02X} does not match first byte {:02X?}",
                        capture.report_id,
                        bytes.first()
                    );
                }
                Ok(bytes)
            })
            .collect()
    }

    /// An in-memory transport that plays the captures back in order.
    pub fn replay_device(&self, path: &Path) -> Result<MockHidDevice, CliError> {
        let device = MockHidDevice::with_info(self.device_info(path)?);
        for report in self.reports()? {
            device.queue_read(report);
        }
        Ok(device)
    }
}

pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).map_err(|e| format!("invalid hex value '{s}': {e}"))
}

/// Parse hex bytes separated by whitespace or commas.
///
/// Tokens may carry a `0x` prefix. A token longer than two digits is read as
/// a run of bytes (`"001401"` is three bytes) and must have an even length.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, CliError> {
    let mut bytes = Vec::new();
    for token in s.split(|c: char| c.is_whitespace() || c == ',') {
        let digits = token.trim_start_matches("0x").trim_start_matches("0X");
        if token.is_empty() {
            continue;
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CliError::InvalidHex(format!("'{token}'")));
        }
        if digits.len() <= 2 {
            bytes.push(parse_byte(digits, token)?);
            continue;
        }
        if digits.len() % 2 != 0 {
            return Err(CliError::InvalidHex(format!("'{token}' has an odd number of digits")));
        }
        for i in (0..digits.len()).step_by(2) {
            let pair = digits
                .get(i..i + 2)
                .ok_or_else(|| CliError::InvalidHex(format!("'{token}'")))?;
            bytes.push(parse_byte(pair, token)?);
        }
    }
    if bytes.is_empty() {
        return Err(CliError::InvalidHex("no bytes given".to_string()));
    }
    Ok(bytes)
}

fn parse_byte(digits: &str, token: &str) -> Result<u8, CliError> {
    u8::from_str_radix(digits, 16).map_err(|e| CliError::InvalidHex(format!("'{token}': {e}")))
}

// ── BDD-style scenario tests ────────────────────────────────────────────────
