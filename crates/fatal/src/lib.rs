//! Fatal-fault report for CSK6 Cortex-M33 firmware.
//!
//! Turns a fault into a short, greppable log sequence and then halts:
//!
//! ```text
//! *** CSK FATAL ***
//! unhandled interrupt, num:8, name:uart0
//! Show more call stack info by run: addr2line -e <elf> -a -f -p 0800142c 08000f12
//! Halting system
//! ```
//!
//! The backtrace comes from [`thumb_backtrace`]; this crate decides what to
//! print around it and where the lines go.
//!
//! # Features
//!
//! - `hardware`: `HardFault` and `DefaultHandler` for `cortex-m-rt`, reporting
//!   over defmt/RTT. Implies `defmt`.
//! - `defmt`: [`sink::DefmtSink`] and `defmt::Format` derives.
//! - `std`: [`sink::TracingSink`] for host tools.
//!
//! # Example
//!
//! ```
//! use fatal::{FatalReason, FatalReport, LineBuffer};
//!
//! let mut sink = LineBuffer::<4>::new();
//! FatalReport::new(FatalReason::KernelPanic).emit(&mut sink);
//! assert_eq!(sink.lines().last(), Some("Halting system"));
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod irq;
pub mod report;
pub mod sink;

#[cfg(feature = "hardware")]
pub mod hardware;

pub use irq::ActiveVector;
pub use report::{report_fault, FatalReason, FatalReport};
#[cfg(feature = "defmt")]
pub use sink::DefmtSink;
#[cfg(feature = "std")]
pub use sink::TracingSink;
pub use sink::{FaultSink, Line, LineBuffer};
