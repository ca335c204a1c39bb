//! Property-based tests for the stack walker.
//! Verifies the walker's safety invariants hold for arbitrary memory, not
//! just hand-built fixtures.

#![allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use proptest::collection::vec;
use proptest::prelude::*;
use thumb_backtrace::{capture_backtrace, classify, FaultContext, MemoryRegion, MAX_DEPTH};

const CODE_BASE: u32 = 0x0800_0000;
const STACK_BASE: u32 = 0x2000_0000;
const SENTINEL: u32 = 0xA5A5_A5A5;

proptest! {
    /// Depth is bounded by both MAX_DEPTH and the output buffer, and nothing
    /// past that bound is written.
    #[test]
    fn depth_is_bounded_and_no_overrun(
        code in vec(any::<u8>(), 0..512),
        stack in vec(any::<u8>(), 0..512),
        pc in any::<u32>(),
        lr in any::<u32>(),
        sp_offset in 0u32..600,
        capacity in 0usize..24,
    ) {
        let ctx = FaultContext::new(pc, lr, STACK_BASE + sp_offset);
        let mut out = vec![SENTINEL; capacity + 4];
        let depth = capture_backtrace(
            &ctx,
            &MemoryRegion::new(STACK_BASE, &stack),
            &MemoryRegion::new(CODE_BASE, &code),
            &mut out[..capacity],
        );

        prop_assert!(depth <= MAX_DEPTH.min(capacity));
        prop_assert!(out[capacity..].iter().all(|&w| w == SENTINEL));
        if capacity > 0 {
            prop_assert!(depth >= 1);
            prop_assert_eq!(out[0], pc);
        } else {
            prop_assert_eq!(depth, 0);
        }
    }

    /// Same inputs, same trace.
    #[test]
    fn capture_is_deterministic(
        code in vec(any::<u8>(), 0..256),
        stack in vec(any::<u8>(), 0..256),
        pc in any::<u32>(),
        lr in any::<u32>(),
    ) {
        let ctx = FaultContext::new(pc, lr, STACK_BASE);
        let stack_region = MemoryRegion::new(STACK_BASE, &stack);
        let code_region = MemoryRegion::new(CODE_BASE, &code);
        let mut a = [0u32; MAX_DEPTH];
        let mut b = [0u32; MAX_DEPTH];

        let da = capture_backtrace(&ctx, &stack_region, &code_region, &mut a);
        let db = capture_backtrace(&ctx, &stack_region, &code_region, &mut b);

        prop_assert_eq!(da, db);
        prop_assert_eq!(&a[..da], &b[..db]);
    }

    /// Every inferred entry past the faulting PC points into the code region.
    #[test]
    fn inferred_entries_lie_in_code(
        code in vec(any::<u8>(), 8..512),
        stack in vec(any::<u8>(), 0..512),
        lr in any::<u32>(),
    ) {
        let ctx = FaultContext::new(0, lr, STACK_BASE);
        let mut out = [0u32; MAX_DEPTH];
        let depth = capture_backtrace(
            &ctx,
            &MemoryRegion::new(STACK_BASE, &stack),
            &MemoryRegion::new(CODE_BASE, &code),
            &mut out,
        );

        let code_end = CODE_BASE + code.len() as u32;
        for &address in &out[1..depth] {
            prop_assert!(address >= CODE_BASE && address < code_end,
                "address {:#x} outside [{:#x}, {:#x})", address, CODE_BASE, code_end);
        }
    }

    /// Classification is total: any halfword pair classifies without panicking,
    /// and a BLX-class second halfword is always a call.
    #[test]
    fn classify_is_total(first in any::<u16>(), low in any::<u8>()) {
        let second = 0x4700 | u16::from(low);
        prop_assert!(classify(first, second).is_call());
    }
}
