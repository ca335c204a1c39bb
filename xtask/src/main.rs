// Host tooling crate: unwrap/expect/panic are acceptable outside the firmware.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod symbolize;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "CSK6 fatal-report development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a fault backtrace to functions and source lines
    Symbolize {
        /// ELF of the firmware image that links `fatal` and printed the trail
        #[arg(long, default_value = fatal::config::FIRMWARE_ELF)]
        elf: PathBuf,
        /// addr2line binary for the target toolchain
        #[arg(long, default_value = "arm-none-eabi-addr2line")]
        tool: String,
        /// Address trail as printed by the fault report, or the whole report line
        #[arg(required = true, num_args = 1..)]
        trail: Vec<String>,
    },
    /// Check the no_std, hardware and host builds, then lint
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Symbolize { elf, tool, trail } => symbolize::run(&elf, &tool, &trail.join(" ")),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
