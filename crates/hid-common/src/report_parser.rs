//! Bounds-checked access to fixed-layout HID reports
//!
//! Fixed layouts are read by offset rather than by cursor, and a field that
//! runs past the end of a truncated report is `None` instead of garbage.

#[derive(Debug, Clone, Copy)]
pub struct ReportParser<'a> {
    buffer: &'a [u8],
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { buffer: data }
    }

    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.buffer.get(offset).copied()
    }

    pub fn u16_le_at(&self, offset: usize) -> Option<u16> {
        let end = offset.checked_add(2)?;
        match self.buffer.get(offset..end)? {
            &[lo, hi] => Some(u16::from_le_bytes([lo, hi])),
            _ => None,
        }
    }

    pub fn i16_le_at(&self, offset: usize) -> Option<i16> {
        self.u16_le_at(offset)
            .map(|raw| i16::from_le_bytes(raw.to_le_bytes()))
    }
}
