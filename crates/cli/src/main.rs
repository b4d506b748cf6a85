//! xbox360ctl - Xbox 360 controller protocol tool
//!
//! Decodes raw state reports, replays `hid-capture` recordings through the
//! driver, and prints the output reports the driver would send. With the
//! `hidapi` feature it can also watch a live controller.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod capture;
mod commands;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{DriverArgs, EncodeCommands};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "xbox360ctl")]
#[command(about = "Xbox 360 controller HID tool - decode, replay and encode reports")]
#[command(version)]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one input report against a fresh controller state
    Decode {
        /// Report bytes in hex, e.g. `0x00 0x14 0x01` or `001401`
        #[arg(required = true)]
        bytes: Vec<String>,

        /// Invert the Y sticks (default: host convention)
        #[arg(long)]
        invert_y: Option<bool>,
    },

    /// Feed a hid-capture recording through the driver
    Replay {
        /// Capture file written by `hid-capture --output`
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        driver: DriverArgs,
    },

    /// Print output report bytes
    #[command(subcommand)]
    Encode(EncodeCommands),

    /// List connected Xbox 360 controllers
    #[cfg(feature = "hidapi")]
    List,

    /// Print events from a connected controller
    #[cfg(feature = "hidapi")]
    Monitor {
        /// Vendor ID (hex, e.g. 0x045E)
        #[arg(long, value_parser = capture::parse_hex_u16, default_value = "0x045E")]
        vid: u16,
        /// Product ID (hex, e.g. 0x028E)
        #[arg(long, value_parser = capture::parse_hex_u16, default_value = "0x028E")]
        pid: u16,
        /// Monitor duration in seconds
        #[arg(long, default_value = "10")]
        duration: u64,

        #[command(flatten)]
        driver: DriverArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("xbox360ctl={log_level},xbox360_driver={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute_command(&cli) {
        if cli.json {
            output::print_error_json(&e);
        } else {
            output::print_error_human(&e);
        }

        let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(exit_code);
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Decode { bytes, invert_y } => commands::decode(bytes, *invert_y, cli.json),
        Commands::Replay { input, driver } => commands::replay(input, driver, cli.json),
        Commands::Encode(cmd) => commands::encode(cmd, cli.json),
        #[cfg(feature = "hidapi")]
        Commands::List => commands::live::list(cli.json),
        #[cfg(feature = "hidapi")]
        Commands::Monitor {
            vid,
            pid,
            duration,
            driver,
        } => commands::live::monitor(*vid, *pid, *duration, driver, cli.json),
    }
}

// ── BDD-style scenario tests ────────────────────────────────────────────────
