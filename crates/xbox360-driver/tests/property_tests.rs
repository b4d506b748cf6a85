//! Property-based tests for the driver poll loop.
//!
//! Uses proptest with 200 cases to verify:
//! - folded events always mirror the most recent full state report
//! - a single update never reads more than the configured drain cap
//! - player LED commands always carry the header and a valid mode byte

use gamepad_hid_common::mock::MockHidDevice;
use hid_xbox360_protocol::{Xbox360Axis, parse_state_report};
use proptest::prelude::*;
use xbox360_driver::{DriverConfig, StateTracker, Xbox360Controller};

fn full_report() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 20).prop_map(|mut data| {
        data[0] = 0x00;
        data[1] = 0x14;
        data
    })
}

fn open(device: &MockHidDevice, config: DriverConfig) -> Xbox360Controller<MockHidDevice> {
    match Xbox360Controller::open(device.clone(), config) {
        Ok(controller) => controller,
        Err(e) => panic!("open failed: {e}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_tracker_mirrors_last_report(
        reports in proptest::collection::vec(full_report(), 1..12),
        invert in any::<bool>(),
    ) {
        let device = MockHidDevice::new(0x045E, 0x028E, "prop");
        for report in &reports {
            device.queue_read(report.clone());
        }
        let config = DriverConfig { invert_y_axes: Some(invert), ..DriverConfig::default() };
        let mut controller = open(&device, config);

        let mut tracker = StateTracker::new();
        let stats = controller.update(&mut tracker);
        prop_assert!(stats.is_ok());

        let last = reports.last().and_then(|r| parse_state_report(r));
        prop_assert!(last.is_some());
        if let Some(last) = last {
            for button in hid_xbox360_protocol::Xbox360Button::ALL {
                prop_assert_eq!(tracker.is_pressed(button), last.is_pressed(button), "{}", button);
            }
            for axis in Xbox360Axis::ALL {
                prop_assert_eq!(tracker.axis(axis), last.axis_value(axis, invert), "{}", axis);
            }
        }
    }

    #[test]
    fn prop_update_respects_drain_cap(
        queued in 0usize..40,
        cap in 1usize..16,
    ) {
        let device = MockHidDevice::new(0x045E, 0x028E, "prop");
        for _ in 0..queued {
            device.queue_read([0x00, 0x14, 0x00, 0x00]);
        }
        let config = DriverConfig { max_reports_per_update: cap, ..DriverConfig::default() };
        let mut controller = open(&device, config);

        let mut events = Vec::new();
        let stats = controller.update(&mut events);
        prop_assert!(stats.is_ok());
        if let Ok(stats) = stats {
            prop_assert_eq!(stats.reports_read, queued.min(cap));
            prop_assert_eq!(device.pending_reads(), queued - queued.min(cap));
        }
    }

    #[test]
    fn prop_player_led_command_shape(index in any::<i32>(), lights in any::<bool>()) {
        let device = MockHidDevice::new(0x045E, 0x028E, "prop");
        let config = DriverConfig { player_lights: lights, ..DriverConfig::default() };
        let mut controller = open(&device, config);
        device.clear_write_history();

        prop_assert!(controller.set_player_index(index).is_ok());
        let writes = device.get_write_history();
        prop_assert_eq!(writes.len(), 1);
        let led = &writes[0];
        prop_assert_eq!(&led[..2], &[0x01, 0x03]);
        if lights && index >= 0 {
            let slot = u8::try_from(index % 4).unwrap_or(0);
            prop_assert_eq!(led[2], 0x06 + slot);
        } else {
            prop_assert_eq!(led[2], 0x00);
        }
    }
}
