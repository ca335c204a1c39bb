//! Fault handlers for the CSK6 image (hardware target only).
//!
//! Both handlers report through defmt/RTT and halt; neither returns.
//!
//! - **HardFault**: every CPU fault escalates here (MemManage, BusFault and
//!   UsageFault are not enabled separately). The stacked exception frame gives
//!   PC, LR and the address the backtrace scan starts from.
//! - **DefaultHandler**: any interrupt without a handler. The report names the
//!   vector from `SCB.ICSR.VECTACTIVE`.
//!
//! # Memory layout
//!
//! The code region is `[__stext, __etext)` and the stack region is
//! `[_stack_end, _stack_start)`, all four symbols provided by the
//! `cortex-m-rt` linker script. `_stack_end` is the end of `.uninit`, so the
//! stack region never overlaps `.bss` or `.data` and never reaches below the
//! RAM origin. Faults taken on a corrupt SP still scan only inside these two
//! regions.

#![allow(clippy::doc_markdown)] // HardFault, DefaultHandler, VECTACTIVE are register/handler names

use core::ptr::addr_of;

use cortex_m_rt::{exception, ExceptionFrame};
use defmt_rtt as _;
use thumb_backtrace::{ActiveStack, AddressRange, FaultContext, MemoryRegion};

use crate::irq::ActiveVector;
use crate::report::{report_fault, FatalReason};
use crate::sink::DefmtSink;

extern "C" {
    static __stext: u8;
    static __etext: u8;
    static _stack_start: u32;
    static _stack_end: u32;
}

/// The main stack: whatever RAM the linker script left above the statics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainStack;

impl ActiveStack for MainStack {
    fn stack_bounds(&self) -> AddressRange {
        AddressRange::between(addr_of!(_stack_end) as u32, addr_of!(_stack_start) as u32)
    }
}

fn code_bounds() -> AddressRange {
    AddressRange::between(addr_of!(__stext) as u32, addr_of!(__etext) as u32)
}

/// View `range` as bytes.
///
/// # Safety
///
/// `range` must be mapped, readable memory that nothing writes while the
/// returned region is alive.
#[allow(unsafe_code)]
unsafe fn region(range: AddressRange) -> MemoryRegion<'static> {
    // SAFETY: caller guarantees the range is mapped and readable; interrupts
    // are masked in the fault handlers that call this, so nothing writes to it.
    let bytes =
        unsafe { core::slice::from_raw_parts(range.base() as *const u8, range.size() as usize) };
    MemoryRegion::new(range.base(), bytes)
}

fn report_and_halt(reason: FatalReason, vector: Option<ActiveVector>, ctx: &FaultContext) -> ! {
    cortex_m::interrupt::disable();

    #[allow(unsafe_code)]
    // SAFETY: both ranges come from linker symbols describing flash and the
    // main stack, and interrupts are now disabled.
    let (stack, code) = unsafe { (region(MainStack.stack_bounds()), region(code_bounds())) };

    let mut sink = DefmtSink;
    let backtrace = report_fault(reason, vector, ctx, &stack, &code, &mut sink);
    defmt::debug!("{}: {} frames recorded", reason, backtrace.depth());

    halt()
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

/// HardFault exception handler.
///
/// # Safety
///
/// Called by the core on fault entry only; must never return.
#[exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &ExceptionFrame) -> ! {
    let frame_address = core::ptr::from_ref(ef) as u32;
    let ctx = FaultContext::from_exception_frame(frame_address, ef.pc(), ef.lr());
    report_and_halt(FatalReason::CpuException, None, &ctx)
}

/// Handler for every interrupt with no handler of its own.
#[exception]
#[allow(unsafe_code)]
unsafe fn DefaultHandler(_irqn: i16) {
    // SAFETY: read-only access to a core register; ICSR reads have no side effects.
    let icsr = unsafe { (*cortex_m::peripheral::SCB::PTR).icsr.read() };
    let vector = ActiveVector::from_icsr(icsr);

    // No exception frame is in scope, so PC and LR are unknown. The report
    // leaves entry 0 out and the trail starts at the first stacked caller.
    let sp = cortex_m::register::msp::read();
    report_and_halt(
        FatalReason::SpuriousIrq,
        Some(vector),
        &FaultContext::without_registers(sp),
    )
}
