//! Driver integration tests against the in-memory transport.
//!
//! Each test keeps a clone of the mock device so it can queue reports and
//! inspect written commands while the controller owns the other handle.

use gamepad_hid_common::mock::MockHidDevice;
use gamepad_hid_common::{HidDevice, HidDeviceInfo};
use hid_xbox360_protocol::{
    AxisEvent, ButtonEvent, ControllerEvent, Xbox360Axis, Xbox360Button, product_ids,
};
use xbox360_driver::{DriverConfig, DriverError, Feature, StateTracker, Tee, Xbox360Controller};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const LED_OFF: [u8; 3] = [0x01, 0x03, 0x00];

fn wired() -> MockHidDevice {
    MockHidDevice::new(0x045E, product_ids::XBOX360_WIRED, "/dev/hidraw3")
}

fn config() -> DriverConfig {
    DriverConfig {
        invert_y_axes: Some(false),
        ..DriverConfig::default()
    }
}

fn state_report(buttons_low: u8, buttons_high: u8) -> Vec<u8> {
    let mut data = vec![0u8; 20];
    data[1] = 0x14;
    data[2] = buttons_low;
    data[3] = buttons_high;
    data
}

fn open(
    device: &MockHidDevice,
    config: DriverConfig,
) -> Result<Xbox360Controller<MockHidDevice>, DriverError> {
    let controller = Xbox360Controller::open(device.clone(), config)?;
    device.clear_write_history();
    Ok(controller)
}

fn buttons(events: &[ControllerEvent]) -> Vec<ButtonEvent> {
    events.iter().filter_map(ControllerEvent::as_button).collect()
}

fn axes(events: &[ControllerEvent]) -> Vec<AxisEvent> {
    events.iter().filter_map(ControllerEvent::as_axis).collect()
}

// ── Input polling ─────────────────────────────────────────────────────────────

#[test]
fn test_dpad_press_emits_low_block_then_axes() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.queue_read(state_report(0x01, 0x00));

    let mut events = Vec::new();
    let stats = controller.update(&mut events)?;

    assert_eq!(stats.reports_read, 1);
    assert_eq!(stats.reports_decoded, 1);
    assert_eq!(stats.button_events, 8);
    assert_eq!(stats.axis_events, 6);
    assert_eq!(events.len(), 14);

    let pressed: Vec<_> = buttons(&events)
        .into_iter()
        .filter(|e| e.pressed)
        .map(|e| e.button)
        .collect();
    assert_eq!(pressed, vec![Xbox360Button::DpadUp]);
    assert!(buttons(&events).iter().all(|e| e.button != Xbox360Button::A));
    Ok(())
}

#[test]
fn test_repeated_report_emits_only_axes() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.queue_read(state_report(0x00, 0x10));

    let mut first = Vec::new();
    controller.update(&mut first)?;

    device.queue_read(state_report(0x00, 0x10));
    let mut second = Vec::new();
    let stats = controller.update(&mut second)?;

    assert_eq!(stats.button_events, 0);
    assert_eq!(second.len(), 6);
    assert!(buttons(&second).is_empty());
    Ok(())
}

#[test]
fn test_triggers_and_sticks_are_scaled() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    let mut report = state_report(0, 0);
    report[4] = 0xFF;
    report[5] = 0x80;
    report[6] = 0xFF;
    report[7] = 0x7F;
    device.queue_read(report);

    let mut events = Vec::new();
    controller.update(&mut events)?;

    let values: Vec<_> = axes(&events).into_iter().map(|e| (e.axis, e.value)).collect();
    assert_eq!(
        values,
        vec![
            (Xbox360Axis::TriggerLeft, 32767),
            (Xbox360Axis::TriggerRight, 128),
            (Xbox360Axis::LeftX, 32767),
            (Xbox360Axis::LeftY, 0),
            (Xbox360Axis::RightX, 0),
            (Xbox360Axis::RightY, 0),
        ]
    );
    Ok(())
}

#[test]
fn test_inverted_y_axes() -> TestResult {
    let device = wired();
    let cfg = DriverConfig::builder().invert_y_axes(true).build()?;
    let mut controller = open(&device, cfg)?;
    let mut report = state_report(0, 0);
    report[8] = 0xFF;
    report[9] = 0x7F;
    device.queue_read(report);

    let mut tracker = StateTracker::new();
    controller.update(&mut tracker)?;

    assert_eq!(tracker.axis(Xbox360Axis::LeftY), -32768);
    assert_eq!(tracker.axis(Xbox360Axis::RightY), -1);
    Ok(())
}

#[test]
fn test_non_state_reports_are_skipped() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.queue_read([0x01, 0x03, 0x06]);
    device.queue_read([0x08, 0x03, 0x00]);
    device.queue_read(state_report(0x10, 0x00));

    let mut tracker = StateTracker::new();
    let stats = controller.update(&mut tracker)?;

    assert_eq!(stats.reports_read, 3);
    assert_eq!(stats.reports_ignored, 2);
    assert_eq!(stats.reports_decoded, 1);
    assert!(tracker.is_pressed(Xbox360Button::Start));
    Ok(())
}

#[test]
fn test_drain_stops_at_cap() -> TestResult {
    let device = wired();
    let cfg = DriverConfig::builder()
        .invert_y_axes(false)
        .max_reports_per_update(2)
        .build()?;
    let mut controller = open(&device, cfg)?;
    for _ in 0..5 {
        device.queue_read(state_report(0, 0));
    }

    let mut events = Vec::new();
    let stats = controller.update(&mut events)?;
    assert_eq!(stats.reports_read, 2);
    assert_eq!(device.pending_reads(), 3);
    Ok(())
}

#[test]
fn test_empty_transport_is_not_an_error() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    let mut events = Vec::new();
    let stats = controller.update(&mut events)?;
    assert_eq!(stats.reports_read, 0);
    assert!(events.is_empty());
    Ok(())
}

#[test]
fn test_short_report_keeps_tail_of_baseline() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    let mut full = state_report(0, 0x20);
    full[12] = 0x34;
    device.queue_read(full);
    device.queue_read([0x00, 0x14, 0x01]);

    let mut events = Vec::new();
    controller.update(&mut events)?;

    let baseline = controller.state().last_report;
    assert_eq!(baseline[2], 0x01);
    assert_eq!(baseline[3], 0x20);
    assert_eq!(baseline[12], 0x34);
    Ok(())
}

// ── Disconnect ────────────────────────────────────────────────────────────────

#[test]
fn test_read_error_disconnects_permanently() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.queue_read(state_report(0x01, 0x00));
    device.queue_read_error("device unplugged");
    device.queue_read(state_report(0x00, 0x00));

    let mut events = Vec::new();
    let result = controller.update(&mut events);
    assert!(matches!(result, Err(DriverError::Disconnected)));
    assert_eq!(events.len(), 14, "events before the failure are delivered");
    assert!(!controller.is_connected());

    let again = controller.update(&mut events);
    assert!(matches!(again, Err(DriverError::Disconnected)));
    assert_eq!(device.pending_reads(), 1);

    assert!(matches!(
        controller.rumble(0xFFFF, 0xFFFF),
        Err(DriverError::Disconnected)
    ));
    assert!(device.get_write_history().is_empty());
    Ok(())
}

#[test]
fn test_close_ends_the_session() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    controller.close()?;
    assert!(!controller.is_connected());
    assert!(!device.is_connected());

    let mut events = Vec::new();
    assert!(matches!(
        controller.update(&mut events),
        Err(DriverError::Disconnected)
    ));
    controller.close()?;
    Ok(())
}

// ── Player indicator ──────────────────────────────────────────────────────────

#[test]
fn test_player_index_selects_slot() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    controller.set_player_index(0)?;
    controller.set_player_index(2)?;
    controller.set_player_index(5)?;
    controller.set_player_index(-1)?;

    assert_eq!(
        device.get_write_history(),
        vec![
            vec![0x01, 0x03, 0x06],
            vec![0x01, 0x03, 0x08],
            vec![0x01, 0x03, 0x07],
            LED_OFF.to_vec(),
        ]
    );
    assert_eq!(controller.player_index(), -1);
    Ok(())
}

#[test]
fn test_player_lights_toggle_writes_only_on_change() -> TestResult {
    let device = wired();
    let cfg = DriverConfig::builder()
        .player_index(3)
        .invert_y_axes(false)
        .build()?;
    let mut controller = open(&device, cfg)?;

    controller.set_player_lights(true)?;
    assert!(device.get_write_history().is_empty());

    controller.set_player_lights(false)?;
    controller.set_player_lights(false)?;
    controller.set_player_lights(true)?;

    assert_eq!(
        device.get_write_history(),
        vec![LED_OFF.to_vec(), vec![0x01, 0x03, 0x09]]
    );
    assert!(controller.player_lights());
    Ok(())
}

#[test]
fn test_lights_disabled_keeps_ring_off() -> TestResult {
    let device = wired();
    let cfg = DriverConfig::builder()
        .player_lights(false)
        .invert_y_axes(false)
        .build()?;
    let mut controller = open(&device, cfg)?;

    controller.set_player_index(1)?;
    assert_eq!(device.get_write_history(), vec![LED_OFF.to_vec()]);
    Ok(())
}

#[test]
fn test_short_indicator_write_is_recoverable() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.set_write_limit(Some(2));

    let err = controller
        .set_player_index(1)
        .err()
        .ok_or("short write must fail")?;
    assert!(matches!(err, DriverError::IndicatorUpdateFailed { .. }));
    assert!(!err.is_fatal());
    assert_eq!(controller.player_index(), 1);

    device.set_write_limit(None);
    controller.set_player_index(1)?;
    assert!(controller.is_connected());
    Ok(())
}

// ── Configuration updates ─────────────────────────────────────────────────────

#[test]
fn test_apply_config_refreshes_led_only_on_change() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    let same_led = DriverConfig {
        invert_y_axes: Some(true),
        max_reports_per_update: 16,
        ..config()
    };
    controller.apply_config(&same_led)?;
    assert!(device.get_write_history().is_empty());
    assert!(controller.invert_y_axes());
    assert_eq!(controller.config().max_reports_per_update, 16);

    let new_player = DriverConfig {
        player_index: 0,
        ..same_led
    };
    controller.apply_config(&new_player)?;
    assert_eq!(device.get_write_history(), vec![vec![0x01, 0x03, 0x06]]);
    assert_eq!(controller.player_index(), 0);
    Ok(())
}

#[test]
fn test_apply_invalid_config_changes_nothing() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    let bad = DriverConfig {
        player_index: 2,
        max_reports_per_update: 0,
        ..config()
    };
    assert!(matches!(
        controller.apply_config(&bad),
        Err(DriverError::InvalidConfig(_))
    ));
    assert_eq!(controller.player_index(), -1);
    assert!(device.get_write_history().is_empty());
    Ok(())
}

#[test]
fn test_open_rejects_invalid_config() {
    let cfg = DriverConfig {
        read_timeout_ms: 5000,
        ..DriverConfig::default()
    };
    let result = Xbox360Controller::open(wired(), cfg);
    assert!(matches!(result, Err(DriverError::InvalidConfig(_))));
}

// ── Rumble ────────────────────────────────────────────────────────────────────

#[test]
fn test_rumble_sends_high_bytes() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    controller.rumble(0x1234, 0xABCD)?;
    controller.rumble(0, 0)?;

    assert_eq!(
        device.get_write_history(),
        vec![
            vec![0x00, 0x08, 0x00, 0x00, 0x12, 0xAB, 0x00, 0x00],
            vec![0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        ]
    );
    Ok(())
}

#[test]
fn test_rumble_failures_are_rejections() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    device.set_write_limit(Some(4));
    assert!(matches!(
        controller.rumble(0xFFFF, 0),
        Err(DriverError::RumbleRejected { .. })
    ));

    device.set_write_limit(None);
    device.fail_writes(Some("pipe stalled".to_string()));
    let err = controller
        .rumble(0xFFFF, 0)
        .err()
        .ok_or("failed write must be rejected")?;
    assert!(err.to_string().contains("pipe stalled"));
    assert!(controller.is_connected());
    Ok(())
}

// ── Unsupported operations ────────────────────────────────────────────────────

#[test]
fn test_unsupported_operations_do_no_io() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;

    let results = [
        controller.rumble_triggers(0xFFFF, 0xFFFF),
        controller.set_led(0xFF, 0, 0),
        controller.send_effect(&[0x01, 0x02]),
        controller.set_sensors_enabled(true),
    ];
    let features: Vec<_> = results
        .into_iter()
        .map(|r| match r {
            Err(DriverError::Unsupported { feature }) => Some(feature),
            _ => None,
        })
        .collect();

    assert_eq!(
        features,
        vec![
            Some(Feature::TriggerRumble),
            Some(Feature::RgbLed),
            Some(Feature::Effects),
            Some(Feature::Sensors),
        ]
    );
    assert!(device.get_write_history().is_empty());

    let caps = controller.capabilities();
    assert!(caps.rumble);
    assert!(!caps.trigger_rumble && !caps.rgb_led && !caps.sensors);
    Ok(())
}

// ── Identification ────────────────────────────────────────────────────────────

#[test]
fn test_steam_virtual_gamepad_slot() -> TestResult {
    let info = HidDeviceInfo::new(0x28DE, product_ids::STEAM_VIRTUAL_GAMEPAD, "steam")
        .with_product_name("GamePad-2");
    let device = MockHidDevice::with_info(info);
    let controller = open(&device, config())?;

    assert_eq!(controller.steam_virtual_slot(), Some(1));
    assert_eq!(controller.device_info().vendor_id, 0x28DE);
    Ok(())
}

#[test]
fn test_plain_controller_has_no_steam_slot() -> TestResult {
    let info = HidDeviceInfo::new(0x045E, product_ids::XBOX360_WIRED, "usb")
        .with_product_name("GamePad-2");
    let device = MockHidDevice::with_info(info);
    let controller = open(&device, config())?;

    assert_eq!(controller.steam_virtual_slot(), None);
    Ok(())
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

#[test]
fn test_tee_feeds_tracker_and_log() -> TestResult {
    let device = wired();
    let mut controller = open(&device, config())?;
    device.queue_read(state_report(0x00, 0x90));

    let mut events = Vec::new();
    let mut tracker = StateTracker::new();
    controller.update(&mut Tee::new(&mut events, &mut tracker))?;

    assert_eq!(tracker.event_count(), events.len() as u64);
    assert_eq!(
        tracker.pressed_buttons(),
        vec![Xbox360Button::A, Xbox360Button::Y]
    );
    Ok(())
}

// ── Logging ───────────────────────────────────────────────────────────────────

#[test]
fn test_update_under_trace_subscriber() -> TestResult {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || -> TestResult {
        let device = wired();
        let mut controller = open(&device, config())?;
        device.queue_read(state_report(0x02, 0x00));
        device.queue_read([0x02, 0x03]);

        let mut sink = xbox360_driver::TracingSink::new("045e:028e");
        let stats = controller.update(&mut sink)?;
        assert_eq!(stats.reports_decoded, 1);
        assert_eq!(stats.reports_ignored, 1);
        Ok(())
    })
}
