//! Register snapshot captured at exception entry, and the runtime query for
//! the active stack.

use crate::memory::AddressRange;

/// The three registers the walker needs from a fatal exception.
///
/// The layout of the hardware exception frame belongs to the architecture
/// layer; this type only keeps the values the backtrace consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultContext {
    /// Program counter at the faulting instruction.
    pub pc: u32,
    /// Link register at fault time, Thumb bit included.
    pub lr: u32,
    /// Stack pointer the scan starts from.
    pub sp: u32,
}

impl FaultContext {
    /// Build a context from explicit register values.
    #[must_use]
    pub const fn new(pc: u32, lr: u32, sp: u32) -> Self {
        Self { pc, lr, sp }
    }

    /// Build a context for a handler that has no exception frame in scope.
    ///
    /// PC and LR are unknown and left at zero; address 0 holds the initial
    /// stack pointer in the vector table, so it is never a code address.
    #[must_use]
    pub const fn without_registers(sp: u32) -> Self {
        Self { pc: 0, lr: 0, sp }
    }

    /// `false` when the faulting PC was not captured.
    #[must_use]
    pub const fn has_pc(&self) -> bool {
        self.pc != 0
    }

    /// Build a context from a stacked Cortex-M exception frame.
    ///
    /// `frame_address` is the process stack pointer at exception entry, i.e.
    /// the address of the stacked `r0`. The scan deliberately starts there:
    /// the stacked LR is one of the words it will visit, which is why the
    /// walker suppresses a duplicate of the LR-derived entry.
    #[must_use]
    pub const fn from_exception_frame(frame_address: u32, pc: u32, lr: u32) -> Self {
        Self {
            pc,
            lr,
            sp: frame_address,
        }
    }
}

/// Runtime query for the stack of the execution context that faulted.
///
/// On an RTOS this reads the current thread's control block; on a bare
/// `cortex-m-rt` image it is the main stack carved out by the linker script.
pub trait ActiveStack {
    /// Start address and size of the active stack.
    fn stack_bounds(&self) -> AddressRange;
}

impl ActiveStack for AddressRange {
    fn stack_bounds(&self) -> AddressRange {
        *self
    }
}
