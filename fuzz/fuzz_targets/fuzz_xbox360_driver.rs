//! Fuzzes the driver poll loop over an in-memory transport.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_xbox360_driver
#![no_main]
use gamepad_hid_common::mock::MockHidDevice;
use libfuzzer_sys::fuzz_target;
use xbox360_driver::{DriverConfig, StateTracker, Xbox360Controller};

fuzz_target!(|data: &[u8]| {
    let Some((&cap, rest)) = data.split_first() else {
        return;
    };
    let device = MockHidDevice::new(0x045E, 0x028E, "fuzz");
    for chunk in rest.chunks(20) {
        device.queue_read(chunk);
    }

    let config = DriverConfig {
        max_reports_per_update: usize::from(cap).max(1),
        ..DriverConfig::default()
    };
    let Ok(mut controller) = Xbox360Controller::open(device.clone(), config) else {
        return;
    };

    let mut tracker = StateTracker::new();
    while device.pending_reads() > 0 {
        match controller.update(&mut tracker) {
            Ok(stats) if stats.reports_read > 0 => {}
            _ => break,
        }
    }
    let _ = controller.set_player_index(i32::from(cap) - 128);
    let _ = controller.rumble(u16::from(cap) << 8, 0);
});
