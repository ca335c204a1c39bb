//! Heuristic stack walker.
//!
//! Cortex-M code built without frame pointers leaves no chain to follow, so
//! the walker scans every word of the active stack instead. A word is kept as
//! a caller when:
//!
//! 1. it has the Thumb bit set (`value - 4` is odd),
//! 2. with the bit cleared it points into the code region, at least one word
//!    past its base, and
//! 3. the instruction one word before it classifies as `BL`/`BLX`.
//!
//! Accepted words are reported as call sites, one halfword before the return
//! address, so the symbolizer resolves the line of the call rather than the
//! line after it.
//!
//! Entry 0 is always the faulting PC. Entry 1 comes from the saved LR when it
//! points into code, which covers faults taken before the current function
//! pushed LR. Stale return addresses left in dead stack slots will also pass
//! the filter; the trail is best-effort.

use heapless::Vec;

use crate::config::{HALFWORD_SIZE, MAX_DEPTH, THUMB_BIT, WORD_SIZE};
use crate::context::FaultContext;
use crate::memory::MemoryRegion;
use crate::thumb::is_branch_with_link;
use crate::trail::{AddressTrail, TrailError};

/// Fixed-capacity cursor over the caller's output slots.
struct Recorder<'a> {
    slots: &'a mut [u32],
    depth: usize,
}

impl<'a> Recorder<'a> {
    fn new(slots: &'a mut [u32]) -> Self {
        Self { slots, depth: 0 }
    }

    fn is_full(&self) -> bool {
        self.depth >= self.slots.len()
    }

    fn get(&self, index: usize) -> Option<u32> {
        self.slots.get(..self.depth)?.get(index).copied()
    }

    /// Append `address`; returns `false` (and writes nothing) when full.
    fn push(&mut self, address: u32) -> bool {
        match self.slots.get_mut(self.depth) {
            Some(slot) => {
                *slot = address;
                self.depth = self.depth.saturating_add(1);
                true
            }
            None => false,
        }
    }
}

/// Convert a tag-cleared return address into the address of its call.
const fn call_site(return_address: u32) -> u32 {
    return_address.wrapping_sub(HALFWORD_SIZE)
}

/// Inspect one stack slot; returns the call site it proves, if any.
fn scan_slot(stack: &MemoryRegion<'_>, code: &MemoryRegion<'_>, slot: u32) -> Option<u32> {
    let value = stack.read_u32(slot)?;

    // Return addresses carry the Thumb bit, so a genuine one minus a word is odd.
    if value.wrapping_sub(WORD_SIZE) & THUMB_BIT == 0 {
        return None;
    }

    let return_address = value.wrapping_sub(THUMB_BIT);
    let code_range = code.range();
    let lowest = code_range.base().checked_add(WORD_SIZE)?;
    if return_address < lowest || !code_range.contains(return_address) {
        return None;
    }

    // return_address >= base + 4, so both halfwords of the call are in range.
    if !is_branch_with_link(code, return_address.wrapping_sub(WORD_SIZE)) {
        return None;
    }

    Some(call_site(return_address))
}

/// Reconstruct the call chain of a fault into `out`.
///
/// Writes at most `min(MAX_DEPTH, out.len())` addresses, innermost first,
/// and returns how many were written. Returns 0 only when `out` is empty;
/// otherwise entry 0 is `ctx.pc`.
///
/// `stack` must describe the active stack of the faulting context; the scan
/// covers every whole word from `ctx.sp` up to the end of that region. If the
/// region is corrupt the scan reads unrelated memory, but only through
/// `stack`, so it cannot fault outside the bytes it was handed.
pub fn capture_backtrace(
    ctx: &FaultContext,
    stack: &MemoryRegion<'_>,
    code: &MemoryRegion<'_>,
    out: &mut [u32],
) -> usize {
    let limit = out.len().min(MAX_DEPTH);
    let Some(slots) = out.get_mut(..limit) else {
        return 0;
    };
    let mut trace = Recorder::new(slots);

    if !trace.push(ctx.pc) {
        return 0;
    }

    let lr_site = call_site(ctx.lr.wrapping_sub(THUMB_BIT));
    let saved_lr_valid = code.range().contains(lr_site) && trace.push(lr_site);

    let stack_range = stack.range();
    let mut slot = ctx.sp;
    while !trace.is_full() && stack_range.contains_span(slot, WORD_SIZE) {
        if let Some(site) = scan_slot(stack, code, slot) {
            // The stacked LR of the exception frame yields the same site as
            // the saved-LR path; keep only the first.
            let duplicate = trace.depth == 2 && saved_lr_valid && trace.get(1) == Some(site);
            if !duplicate {
                #[cfg(feature = "defmt")]
                defmt::trace!("stack slot {=u32:#x} -> call site {=u32:#x}", slot, site);
                trace.push(site);
            }
        }
        let Some(next) = slot.checked_add(WORD_SIZE) else {
            break;
        };
        slot = next;
    }

    trace.depth
}

/// An owned backtrace of at most [`MAX_DEPTH`] addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtrace {
    frames: Vec<u32, MAX_DEPTH>,
}

impl Backtrace {
    /// Capture a backtrace for `ctx` into an owned buffer.
    ///
    /// See [`capture_backtrace`] for the scan rules.
    #[must_use]
    pub fn capture(ctx: &FaultContext, stack: &MemoryRegion<'_>, code: &MemoryRegion<'_>) -> Self {
        let mut buf = [0u32; MAX_DEPTH];
        let depth = capture_backtrace(ctx, stack, code, &mut buf);
        let frames = buf
            .get(..depth)
            .and_then(|recorded| Vec::from_slice(recorded).ok())
            .unwrap_or_default();
        Self { frames }
    }

    /// Drop entry 0, the faulting PC.
    ///
    /// Used when the context carried no PC, so the trail starts at the first
    /// inferred caller instead of a meaningless zero.
    #[must_use]
    pub fn without_fault_pc(mut self) -> Self {
        if !self.frames.is_empty() {
            let _fault_pc = self.frames.remove(0);
        }
        self
    }

    /// Recorded addresses, innermost first.
    #[must_use]
    pub fn frames(&self) -> &[u32] {
        &self.frames
    }

    /// Number of recorded addresses.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render the addresses as a symbolizer-ready trail.
    pub fn trail(&self) -> Result<AddressTrail, TrailError> {
        AddressTrail::render(&self.frames)
    }
}
