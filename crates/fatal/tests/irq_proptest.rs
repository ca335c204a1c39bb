//! Property-based tests for vector decoding and report shape.

#![allow(clippy::arithmetic_side_effects)]

use fatal::irq::{EXTERNAL_IRQ_BASE, INTERRUPT_NAMES, UNKNOWN};
use fatal::{ActiveVector, FatalReason, FatalReport, LineBuffer};
use proptest::prelude::*;

fn any_reason() -> impl Strategy<Value = FatalReason> {
    prop_oneof![
        Just(FatalReason::CpuException),
        Just(FatalReason::SpuriousIrq),
        Just(FatalReason::StackCheck),
        Just(FatalReason::KernelOops),
        Just(FatalReason::KernelPanic),
    ]
}

proptest! {
    /// Any ICSR value decodes; only VECTACTIVE >= 16 is an external interrupt,
    /// and its name is either a table entry or "unknown".
    #[test]
    fn icsr_decoding_is_total(icsr in any::<u32>()) {
        let vector = ActiveVector::from_icsr(icsr);
        let active = u16::try_from(icsr & 0x1FF).unwrap_or(u16::MAX);
        match vector {
            ActiveVector::Interrupt(irq) => {
                prop_assert!(active >= EXTERNAL_IRQ_BASE);
                prop_assert_eq!(u32::from(irq) + 16, u32::from(active));
                let name = vector.name();
                prop_assert!(name == UNKNOWN || INTERRUPT_NAMES.contains(&name));
            }
            ActiveVector::Exception(n) => {
                prop_assert!(n < EXTERNAL_IRQ_BASE);
                prop_assert_eq!(vector.name(), UNKNOWN);
            }
        }
    }

    /// Every report starts with the banner and ends with the halt notice.
    #[test]
    fn report_is_framed(reason in any_reason(), vector in 0u16..512) {
        let mut sink = LineBuffer::<8>::new();
        FatalReport::new(reason)
            .with_vector(ActiveVector::from_vector(vector))
            .emit(&mut sink);

        let lines: Vec<&str> = sink.lines().collect();
        prop_assert_eq!(lines.first().copied(), Some("*** CSK FATAL ***"));
        prop_assert_eq!(lines.last().copied(), Some("Halting system"));
        let expected = if reason == FatalReason::SpuriousIrq { 4 } else { 3 };
        prop_assert_eq!(lines.len(), expected);
    }
}
