//! Thumb call-instruction classifier.
//!
//! A stacked word is only believed to be a return address when the code just
//! before it looks like a call. Two encodings count:
//!
//! | Encoding | First halfword | Second halfword |
//! |---|---|---|
//! | 32-bit `BL` | `11110xxx xxxxxxxx` | `11111xxx xxxxxxxx` |
//! | 16-bit `BLX Rm` | (ignored) | `01000111 xxxxxxxx` |
//!
//! The `BLX` mask also admits `BX Rm`, and any data word can alias either
//! pattern. Both are accepted false positives: this is a fault-time
//! heuristic, not a disassembler.

use crate::config::HALFWORD_SIZE;
use crate::memory::MemoryRegion;

const BL_MASK: u16 = 0xF800;
const BL_PREFIX: u16 = 0xF000;
const BL_SUFFIX: u16 = 0xF800;
const BLX_MASK: u16 = 0xFF00;
const BLX_REGISTER: u16 = 0x4700;

/// Call encoding recognised in the two halfwords preceding a return address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CallEncoding {
    /// 32-bit branch-with-link (`BL imm`).
    BranchLink,
    /// 16-bit branch-with-link-exchange through a register (`BLX Rm`).
    BranchLinkExchange,
    /// Anything else.
    Other,
}

impl CallEncoding {
    /// `true` for either call encoding.
    #[must_use]
    pub const fn is_call(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Classify the halfword pair `first` (lower address) and `second`.
///
/// `BL` is tested first, so a pair matching both patterns reports
/// [`CallEncoding::BranchLink`].
#[must_use]
pub const fn classify(first: u16, second: u16) -> CallEncoding {
    if first & BL_MASK == BL_PREFIX && second & BL_MASK == BL_SUFFIX {
        CallEncoding::BranchLink
    } else if second & BLX_MASK == BLX_REGISTER {
        CallEncoding::BranchLinkExchange
    } else {
        CallEncoding::Other
    }
}

/// Classify the instruction at `address` in `code`.
///
/// Reads the halfwords at `address` and `address + 2`. A halfword that
/// cannot be read classifies as [`CallEncoding::Other`]; callers still keep
/// the two-halfword margin so that never happens for accepted candidates.
#[must_use]
pub fn classify_at(code: &MemoryRegion<'_>, address: u32) -> CallEncoding {
    let Some(first) = code.read_u16(address) else {
        return CallEncoding::Other;
    };
    let Some(second) = address
        .checked_add(HALFWORD_SIZE)
        .and_then(|next| code.read_u16(next))
    else {
        return CallEncoding::Other;
    };
    classify(first, second)
}

/// Whether the instruction at `address` is a `BL` or `BLX`.
#[must_use]
pub fn is_branch_with_link(code: &MemoryRegion<'_>, address: u32) -> bool {
    classify_at(code, address).is_call()
}
