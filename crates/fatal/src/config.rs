//! Fatal report configuration and constants.
//!
//! Everything the report prints that is not derived from the fault itself
//! lives here, so the log format can be changed in one place.

/// First line of every fatal report.
pub const FATAL_BANNER: &str = "*** CSK FATAL ***";

/// Last line of every fatal report, emitted just before the core halts.
pub const HALT_NOTICE: &str = "Halting system";

/// Emitted instead of the symbolizer line when no address was recorded.
pub const BACKTRACE_UNAVAILABLE: &str = "Dump call stack has an error";

/// Prefix of the symbolizer line; the trail follows the command.
pub const SYMBOLIZE_HINT: &str = "Show more call stack info by run:";

/// Offline symbolizer invoked by the hint and by `cargo xtask symbolize`.
pub const SYMBOLIZER: &str = "addr2line";

/// Flags passed to the symbolizer: print addresses, function names, pretty output.
pub const SYMBOLIZER_FLAGS: &str = "-a -f -p";

/// ELF of the firmware image that links this crate, as printed in the hint.
///
/// This workspace builds no image of its own; the path names the consuming
/// firmware's build output. Override it at build time with
/// `FATAL_FIRMWARE_ELF=<path>`.
pub const FIRMWARE_ELF: &str = match option_env!("FATAL_FIRMWARE_ELF") {
    Some(path) => path,
    None => "target/thumbv8m.main-none-eabihf/release/firmware",
};

/// Capacity of one rendered report line.
///
/// Sized for the symbolizer line at full backtrace depth.
pub const LINE_CAPACITY: usize = 320;
