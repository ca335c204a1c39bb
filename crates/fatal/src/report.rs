//! The fatal report: what gets printed between the fault and the halt.
//!
//! ```text
//! *** CSK FATAL ***
//! unhandled interrupt, num:11, name:ir            (SpuriousIrq only)
//! Show more call stack info by run: addr2line -e <elf> -a -f -p <trail>
//! Halting system
//! ```
//!
//! When no address could be recorded the backtrace line is replaced by
//! `Dump call stack has an error`.

use core::fmt::{self, Write as _};

use thumb_backtrace::{Backtrace, FaultContext, MemoryRegion};

use crate::config::{
    BACKTRACE_UNAVAILABLE, FATAL_BANNER, FIRMWARE_ELF, HALT_NOTICE, SYMBOLIZER, SYMBOLIZER_FLAGS,
    SYMBOLIZE_HINT,
};
use crate::irq::ActiveVector;
use crate::sink::{FaultSink, Line};

/// Why the system is going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FatalReason {
    /// CPU fault (HardFault, MemManage, BusFault, UsageFault).
    CpuException,
    /// An interrupt fired with no handler installed.
    SpuriousIrq,
    /// Stack canary or stack-limit check failed.
    StackCheck,
    /// Recoverable kernel error escalated to fatal.
    KernelOops,
    /// Unrecoverable kernel error.
    KernelPanic,
}

impl FatalReason {
    /// `true` if the report should name the active interrupt.
    #[must_use]
    pub const fn reports_interrupt(self) -> bool {
        matches!(self, Self::SpuriousIrq)
    }
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CpuException => write!(f, "CPU exception"),
            Self::SpuriousIrq => write!(f, "unhandled interrupt"),
            Self::StackCheck => write!(f, "stack check failed"),
            Self::KernelOops => write!(f, "kernel oops"),
            Self::KernelPanic => write!(f, "kernel panic"),
        }
    }
}

/// A fault ready to be reported.
#[derive(Debug, Clone, Copy)]
pub struct FatalReport<'a> {
    reason: FatalReason,
    vector: Option<ActiveVector>,
    backtrace: Option<&'a Backtrace>,
}

impl<'a> FatalReport<'a> {
    /// Report with no interrupt and no backtrace attached.
    #[must_use]
    pub const fn new(reason: FatalReason) -> Self {
        Self {
            reason,
            vector: None,
            backtrace: None,
        }
    }

    /// Attach the vector that was active when the fault was raised.
    #[must_use]
    pub const fn with_vector(mut self, vector: ActiveVector) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Attach a captured backtrace.
    #[must_use]
    pub const fn with_backtrace(mut self, backtrace: &'a Backtrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    /// Reason given at construction.
    #[must_use]
    pub const fn reason(&self) -> FatalReason {
        self.reason
    }

    /// Write the report to `sink`, flushing before the halt notice.
    pub fn emit<S: FaultSink + ?Sized>(&self, sink: &mut S) {
        sink.emit(FATAL_BANNER);

        if self.reason.reports_interrupt() {
            if let Some(vector) = self.vector {
                sink.emit(&interrupt_line(vector));
            }
        }

        match self.backtrace.map(Backtrace::trail) {
            Some(Ok(trail)) => {
                let mut line = Line::new();
                // Truncation only costs trailing addresses; LINE_CAPACITY fits MAX_DEPTH.
                write!(
                    line,
                    "{SYMBOLIZE_HINT} {SYMBOLIZER} -e {FIRMWARE_ELF} {SYMBOLIZER_FLAGS} {trail}"
                )
                .ok();
                sink.emit(&line);
            }
            Some(Err(_)) | None => sink.emit(BACKTRACE_UNAVAILABLE),
        }

        sink.flush();
        sink.emit(HALT_NOTICE);
    }
}

fn interrupt_line(vector: ActiveVector) -> Line {
    let mut line = Line::new();
    write!(
        line,
        "unhandled interrupt, num:{}, name:{}",
        vector.number(),
        vector.name()
    )
    .ok();
    line
}

/// Capture a backtrace for `ctx` and emit the full report for `reason`.
///
/// A context without a PC contributes no entry 0, so the trail starts at the
/// first caller found on the stack. Returns the captured backtrace so the
/// caller can retain it.
pub fn report_fault<S: FaultSink + ?Sized>(
    reason: FatalReason,
    vector: Option<ActiveVector>,
    ctx: &FaultContext,
    stack: &MemoryRegion<'_>,
    code: &MemoryRegion<'_>,
    sink: &mut S,
) -> Backtrace {
    let mut backtrace = Backtrace::capture(ctx, stack, code);
    if !ctx.has_pc() {
        backtrace = backtrace.without_fault_pc();
    }

    let mut report = FatalReport::new(reason).with_backtrace(&backtrace);
    if let Some(vector) = vector {
        report = report.with_vector(vector);
    }
    report.emit(sink);
    backtrace
}
