//! Fuzzes the Xbox 360 state report decoder with report sequences.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_xbox360_input
#![no_main]
use hid_xbox360_protocol::{
    ControllerEvent, DecodeOutcome, DeviceState, Xbox360Decoder, parse_state_report,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = parse_state_report(data);

    // The first byte picks Y inversion; the rest is a run of length-prefixed
    // reports so one input exercises diffing across several reports.
    let Some((&flags, mut rest)) = data.split_first() else {
        return;
    };
    let decoder = Xbox360Decoder::new(flags & 1 != 0);
    let mut state = DeviceState::default();

    while let Some((&len, tail)) = rest.split_first() {
        let (report, next) = tail.split_at(usize::from(len).min(tail.len()));
        rest = next;
        let before = state.last_report;
        let mut events: Vec<ControllerEvent> = Vec::new();
        match decoder.decode(report, &mut state, &mut events) {
            DecodeOutcome::Decoded {
                button_events,
                axis_events,
            } => {
                assert_eq!(axis_events, 6);
                assert_eq!(events.len(), button_events + axis_events);
                assert!(matches!(button_events, 0 | 7 | 8 | 15));
            }
            DecodeOutcome::Ignored { .. } => {
                assert!(events.is_empty());
                assert_eq!(state.last_report, before);
            }
        }
    }
});
