//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use hid_xbox360_protocol::{ControllerEvent, Xbox360Axis};
use serde::Serialize;
use serde_json::json;
use xbox360_driver::{StateTracker, UpdateStats};

/// Result of feeding reports through a controller.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub device: String,
    pub reports: usize,
    pub stats: UpdateStats,
    /// Output reports written to the device, in hex.
    pub commands: Vec<String>,
    pub events: Vec<ControllerEvent>,
    pub final_state: StateTracker,
}

pub fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(&json!({
        "success": false,
        "error": { "message": format!("{error:#}") }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

pub fn print_events(events: &[ControllerEvent], json: bool) {
    if json {
        print_json(&json!({ "success": true, "events": events }));
        return;
    }
    if events.is_empty() {
        println!("{}", "No events".yellow());
    }
    for event in events {
        println!("{event}");
    }
}

pub fn print_ignored(report_type: Option<u8>, json: bool) {
    let reason = match report_type {
        Some(t) => format!("report type 0x{t:02X} is not a state report"),
        None => "empty report".to_string(),
    };
    if json {
        print_json(&json!({ "success": true, "ignored": true, "reason": reason, "events": [] }));
    } else {
        println!("{} {reason}", "Ignored:".yellow());
    }
}

pub fn print_command(name: &str, data: &[u8], json: bool) {
    if json {
        print_json(&json!({ "success": true, "command": name, "bytes": data, "hex": hex(data) }));
    } else {
        println!("{}: {}", name.bold(), hex(data));
    }
}

pub fn print_replay(summary: &ReplaySummary, json: bool) {
    if json {
        match serde_json::to_value(summary) {
            Ok(mut value) => {
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("success".to_string(), json!(true));
                }
                print_json(&value);
            }
            Err(e) => eprintln!("Failed to format replay as JSON: {e}"),
        }
        return;
    }

    for event in &summary.events {
        println!("{event}");
    }
    println!();
    println!("{} {}", "Device:".bold(), summary.device);
    for command in &summary.commands {
        println!("  {} {command}", "sent".dimmed());
    }
    let s = &summary.stats;
    println!(
        "Replayed {} report(s): {} decoded, {} ignored, {} button event(s), {} axis event(s)",
        summary.reports, s.reports_decoded, s.reports_ignored, s.button_events, s.axis_events
    );
    print_final_state(&summary.final_state);
}

fn print_final_state(state: &StateTracker) {
    let pressed: Vec<_> = state
        .pressed_buttons()
        .into_iter()
        .map(|b| b.name())
        .collect();
    if pressed.is_empty() {
        println!("{} none", "Pressed:".bold());
    } else {
        println!("{} {}", "Pressed:".bold(), pressed.join(" "));
    }
    let axes: Vec<_> = Xbox360Axis::ALL
        .into_iter()
        .map(|a| format!("{a}={}", state.axis(a)))
        .collect();
    println!("{} {}", "Axes:".bold(), axes.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_uses_capture_notation() {
        assert_eq!(hex(&[0x01, 0x03, 0x06]), "0x01 0x03 0x06");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn replay_summary_serializes_events_inline() -> Result<(), serde_json::Error> {
        let summary = ReplaySummary {
            device: "045e:028e".to_string(),
            reports: 0,
            stats: UpdateStats::default(),
            commands: vec![hex(&[0x01, 0x03, 0x00])],
            events: Vec::new(),
            final_state: StateTracker::new(),
        };
        let value = serde_json::to_value(&summary)?;
        insta::assert_snapshot!(value["commands"].to_string(), @r#"["0x01 0x03 0x00"]"#);
        assert_eq!(value["stats"]["reports_read"], 0);
        Ok(())
    }
}
