use anyhow::{Context, Result};
use colored::Colorize;
use fatal::config::SYMBOLIZER_FLAGS;
use std::path::Path;
use std::process::Command;
use thumb_backtrace::AddressTrail;

pub fn run(elf: &Path, tool: &str, input: &str) -> Result<()> {
    let addresses = AddressTrail::parse(trail_of(input))
        .with_context(|| format!("Could not parse address trail '{input}'"))?;

    if !elf.exists() {
        anyhow::bail!(
            "{} not found. Build it with: cargo build --release --target thumbv8m.main-none-eabihf",
            elf.display()
        );
    }

    println!();
    println!(
        "{}",
        format!("🔎 Symbolizing {} addresses...", addresses.len())
            .cyan()
            .bold()
    );
    println!();

    let output = Command::new(tool)
        .args(addr2line_args(elf, &addresses))
        .output()
        .with_context(|| format!("Failed to run {tool}. Is the Arm GNU toolchain installed?"))?;

    if !output.status.success() {
        eprintln!("{}", "✗ addr2line failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("addr2line failed");
    }

    let frames = String::from_utf8_lossy(&output.stdout);
    for (depth, frame) in frames.lines().enumerate() {
        println!("  {} {}", format!("#{depth:<2}").dimmed(), frame);
    }
    println!();

    Ok(())
}

/// Accept either the bare trail or the full report line and return the trail.
fn trail_of(input: &str) -> &str {
    input
        .rsplit_once(SYMBOLIZER_FLAGS)
        .map_or(input, |(_, trail)| trail)
        .trim()
}

fn addr2line_args(elf: &Path, addresses: &[u32]) -> Vec<String> {
    let mut args = vec!["-e".to_string(), elf.display().to_string()];
    args.extend(SYMBOLIZER_FLAGS.split_whitespace().map(str::to_string));
    args.extend(addresses.iter().map(|a| format!("0x{a:08x}")));
    args
}
