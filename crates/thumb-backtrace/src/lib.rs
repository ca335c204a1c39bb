//! Fault-time backtrace for Thumb-only Cortex-M targets.
//!
//! Firmware built without frame pointers and without unwind tables gives a
//! fault handler nothing to unwind with. This crate recovers a plausible call
//! chain anyway, by scanning the faulting stack for words that look like
//! return addresses and confirming each one against the instruction that
//! precedes it in flash.
//!
//! # Pipeline
//!
//! ```text
//! FaultContext (pc, lr, sp)
//!         ↓
//! walker  - scan stack words, keep Thumb return addresses into code
//!         ↓                          ↑
//!         ↓              thumb - is the preceding instruction BL/BLX?
//!         ↓
//! trail   - "00001232 00004a1c ..." for addr2line
//! ```
//!
//! All memory is read through [`MemoryRegion`], which bounds-checks every
//! access. The crate allocates nothing and holds no global state.
//!
//! # Example
//!
//! ```
//! use thumb_backtrace::{Backtrace, FaultContext, MemoryRegion};
//!
//! // bl <callee> at 0x1230, returning to 0x1234
//! let mut flash = [0u8; 0x100];
//! flash[0x30..0x34].copy_from_slice(&[0x00, 0xF0, 0x00, 0xF8]);
//! let stack = 0x1235u32.to_le_bytes();
//!
//! let ctx = FaultContext::new(0x1280, 0, 0x2000_0000);
//! let bt = Backtrace::capture(
//!     &ctx,
//!     &MemoryRegion::new(0x2000_0000, &stack),
//!     &MemoryRegion::new(0x1200, &flash),
//! );
//! assert_eq!(bt.trail().unwrap().as_str(), "00001280 00001232");
//! ```
//!
//! # Features
//!
//! - `defmt`: `defmt::Format` derives and scan tracing
//! - `std`: `std::error::Error` for [`TrailError`]

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)] // pure logic: memory arrives as slices
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // register names and hex addresses in docs

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod context;
pub mod memory;
pub mod thumb;
pub mod trail;
pub mod walker;

pub use config::{MAX_DEPTH, WORD_SIZE};
pub use context::{ActiveStack, FaultContext};
pub use memory::{AddressRange, MemoryRegion};
pub use thumb::{classify, is_branch_with_link, CallEncoding};
pub use trail::{AddressTrail, TrailError};
pub use walker::{capture_backtrace, Backtrace};
