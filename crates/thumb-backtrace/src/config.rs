//! Compile-time configuration for the backtrace engine.
//!
//! None of these values are runtime-tunable: the walker runs inside a fatal
//! exception handler where there is no configuration store to consult, and
//! every buffer that depends on them is sized statically.

/// Maximum number of addresses recorded per fault, including the faulting PC.
pub const MAX_DEPTH: usize = 16;

/// Machine word size on the Cortex-M family, in bytes.
///
/// The stack is scanned one word at a time and a stacked return address is
/// assumed to sit one word past the call it belongs to.
pub const WORD_SIZE: u32 = 4;

/// Size of one Thumb halfword, in bytes.
pub const HALFWORD_SIZE: u32 = 2;

/// Low-order Thumb state bit carried by every return address in LR or on the stack.
pub const THUMB_BIT: u32 = 1;

/// Characters used per rendered address: 8 hex digits plus one separator.
pub const TOKEN_WIDTH: usize = 9;

/// Capacity of the rendered address trail.
///
/// The last token has no trailing separator, so one byte of this budget is
/// always spare.
pub const TRAIL_CAPACITY: usize = MAX_DEPTH * TOKEN_WIDTH;
