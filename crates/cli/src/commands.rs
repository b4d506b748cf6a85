//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hid_xbox360_protocol::{
    DecodeOutcome, DeviceState, LedPattern, Xbox360Decoder, build_player_led_report,
    build_rumble_report, build_rumble_stop_report, player_slot,
};
use tracing::{debug, info};
use xbox360_driver::{DriverConfig, StateTracker, Tee, UpdateStats, Xbox360Controller};

use crate::capture::{CaptureFile, parse_hex_bytes};
use crate::error::CliError;
use crate::output::{self, ReplaySummary};

/// Driver settings shared by commands that open a controller.
#[derive(Args, Debug, Default)]
pub struct DriverArgs {
    /// YAML driver configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Player index (negative = unassigned)
    #[arg(long, allow_hyphen_values = true)]
    pub player: Option<i32>,

    /// Keep the player ring dark
    #[arg(long)]
    pub no_player_led: bool,

    /// Invert the Y sticks (default: host convention)
    #[arg(long)]
    pub invert_y: Option<bool>,

    /// Maximum reports drained per update
    #[arg(long)]
    pub max_reports: Option<usize>,
}

impl DriverArgs {
    /// Load the configuration file, then apply flag overrides.
    pub fn load(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(CliError::from)
                    .with_context(|| format!("Failed to read config '{}'", path.display()))?;
                let config: DriverConfig = serde_yaml::from_str(&text)
                    .map_err(CliError::from)
                    .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
                config
            }
            None => DriverConfig::default(),
        };

        if let Some(player) = self.player {
            config.player_index = player;
        }
        if self.no_player_led {
            config.player_lights = false;
        }
        if let Some(invert) = self.invert_y {
            config.invert_y_axes = Some(invert);
        }
        if let Some(max) = self.max_reports {
            config.max_reports_per_update = max;
        }

        config.validate().map_err(CliError::from)?;
        debug!("driver config: {config:?}");
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum EncodeCommands {
    /// Player LED command
    Led {
        /// Player index; the ring shows index % 4
        #[arg(long, allow_hyphen_values = true)]
        player: i32,
        /// Turn the ring off
        #[arg(long)]
        off: bool,
        /// Blink instead of holding the quadrant lit
        #[arg(long)]
        blink: bool,
    },
    /// Rumble command
    Rumble {
        /// Low-frequency (left) motor magnitude, 0..=65535
        #[arg(long, default_value_t = 0)]
        low: u16,
        /// High-frequency (right) motor magnitude, 0..=65535
        #[arg(long, default_value_t = 0)]
        high: u16,
    },
    /// Rumble stop command
    RumbleStop,
}

/// Decode one report against a zeroed device state.
pub fn decode(bytes: &[String], invert_y: Option<bool>, json: bool) -> Result<()> {
    let report = parse_hex_bytes(&bytes.join(" "))?;
    let invert = invert_y.unwrap_or_else(xbox360_driver::host_inverts_y_axes);
    let decoder = Xbox360Decoder::new(invert);
    let mut state = DeviceState::default();
    let mut events = Vec::new();

    match decoder.decode(&report, &mut state, &mut events) {
        DecodeOutcome::Decoded { .. } => output::print_events(&events, json),
        DecodeOutcome::Ignored { report_type } => output::print_ignored(report_type, json),
    }
    Ok(())
}

pub fn encode(cmd: &EncodeCommands, json: bool) -> Result<()> {
    match cmd {
        EncodeCommands::Led { player, off, blink } => {
            let pattern = if *blink {
                LedPattern::Blinking
            } else {
                LedPattern::Solid
            };
            let report = match player_slot(*player) {
                Some(slot) if !off => build_player_led_report(slot, true, pattern),
                _ => build_player_led_report(0, false, pattern),
            };
            output::print_command("led", &report, json);
        }
        EncodeCommands::Rumble { low, high } => {
            output::print_command("rumble", &build_rumble_report(*low, *high), json);
        }
        EncodeCommands::RumbleStop => {
            output::print_command("rumble", &build_rumble_stop_report(), json);
        }
    }
    Ok(())
}

/// Feed a capture file through the driver.
pub fn replay(input: &Path, args: &DriverArgs, json: bool) -> Result<()> {
    let capture = CaptureFile::load(input)
        .with_context(|| format!("Failed to load capture '{}'", input.display()))?;
    let config = args.load()?;
    let summary = replay_capture(&capture, input, config)?;
    output::print_replay(&summary, json);
    Ok(())
}

pub fn replay_capture(
    capture: &CaptureFile,
    path: &Path,
    config: DriverConfig,
) -> Result<ReplaySummary, CliError> {
    let device = capture.replay_device(path)?;
    let reports = device.pending_reads();
    let mut controller = Xbox360Controller::open(device.clone(), config)?;
    info!(
        "replaying {reports} report(s) from {} as {}",
        path.display(),
        controller.device_info().usb_id()
    );

    let mut events = Vec::new();
    let mut tracker = StateTracker::new();
    let mut stats = UpdateStats::default();
    while device.pending_reads() > 0 {
        let step = controller.update(&mut Tee::new(&mut events, &mut tracker))?;
        if step.reports_read == 0 {
            break;
        }
        accumulate(&mut stats, &step);
    }

    let summary = ReplaySummary {
        device: controller.device_info().usb_id(),
        reports,
        stats,
        commands: device
            .get_write_history()
            .iter()
            .map(|w| output::hex(w))
            .collect(),
        events,
        final_state: tracker,
    };
    controller.close()?;
    Ok(summary)
}

fn accumulate(total: &mut UpdateStats, step: &UpdateStats) {
    total.reports_read += step.reports_read;
    total.reports_decoded += step.reports_decoded;
    total.reports_ignored += step.reports_ignored;
    total.button_events += step.button_events;
    total.axis_events += step.axis_events;
}

#[cfg(feature = "hidapi")]
pub mod live {
    //! Commands that talk to real hardware through hidapi.

    use std::time::{Duration, Instant};

    use anyhow::{Context, Result};
    use gamepad_hid_common::hidapi_device::HidApiDevice;
    use hid_xbox360_protocol::{
        ControllerEvent, EventSink, MICROSOFT_VENDOR_ID, is_steam_virtual_gamepad,
    };
    use hidapi::HidApi;
    use xbox360_driver::{Tee, TracingSink, Xbox360Controller};

    use super::DriverArgs;
    use crate::error::CliError;

    /// Prints each event as it arrives.
    struct PrintSink {
        json: bool,
    }

    impl EventSink for PrintSink {
        fn emit(&mut self, event: ControllerEvent) {
            if self.json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("Failed to format event: {e}"),
                }
            } else {
                println!("{event}");
            }
        }
    }

    #[derive(serde::Serialize)]
    struct ListedDevice {
        vendor_id: String,
        product_id: String,
        product: String,
        path: String,
    }

    pub fn list(json: bool) -> Result<()> {
        let api = HidApi::new().context("Failed to initialize HidApi")?;
        let devices: Vec<_> = api
            .device_list()
            .filter(|d| {
                d.vendor_id() == MICROSOFT_VENDOR_ID
                    || is_steam_virtual_gamepad(d.vendor_id(), d.product_id())
            })
            .map(|d| ListedDevice {
                vendor_id: format!("0x{:04X}", d.vendor_id()),
                product_id: format!("0x{:04X}", d.product_id()),
                product: d.product_string().unwrap_or("(unknown)").to_string(),
                path: d.path().to_string_lossy().into_owned(),
            })
            .collect();

        if json {
            let value = serde_json::json!({ "success": true, "devices": devices });
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else if devices.is_empty() {
            println!("No controllers found.");
        } else {
            println!("{:<8} {:<8} {:<28} Path", "VID", "PID", "Product");
            for d in &devices {
                println!(
                    "{:<8} {:<8} {:<28} {}",
                    d.vendor_id, d.product_id, d.product, d.path
                );
            }
        }
        Ok(())
    }

    pub fn monitor(
        vid: u16,
        pid: u16,
        duration_secs: u64,
        args: &DriverArgs,
        json: bool,
    ) -> Result<()> {
        let config = args.load()?;
        let api = HidApi::new().context("Failed to initialize HidApi")?;
        let device = HidApiDevice::open(&api, vid, pid)
            .map_err(|e| CliError::DeviceNotFound(e.to_string()))?;
        let mut controller = Xbox360Controller::open(device, config).map_err(CliError::from)?;

        let label = controller.device_info().usb_id();
        let mut print = PrintSink { json };
        let mut log = TracingSink::new(label);
        let start = Instant::now();
        let deadline = Duration::from_secs(duration_secs);

        while start.elapsed() < deadline {
            let stats = controller
                .update(&mut Tee::new(&mut print, &mut log))
                .map_err(CliError::from)?;
            if stats.reports_read == 0 {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        controller.close().map_err(CliError::from)?;
        Ok(())
    }
}
