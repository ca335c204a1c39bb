//! Where fatal report lines go.
//!
//! The report is rendered line by line and handed to a [`FaultSink`]. On
//! hardware that is [`DefmtSink`] (RTT via `defmt-rtt`); host tools use
//! [`TracingSink`]; [`LineBuffer`] keeps the lines in memory, which is what
//! the tests inspect and what firmware can park in retained RAM.

use heapless::{String, Vec};

use crate::config::LINE_CAPACITY;

/// One rendered report line.
pub type Line = String<LINE_CAPACITY>;

/// Destination for fatal report lines.
///
/// Implementations must not allocate or block: they run inside the fault
/// handler, after the faulting context is already lost.
pub trait FaultSink {
    /// Emit one line of the report.
    fn emit(&mut self, line: &str);

    /// Push buffered output to the transport before the core halts.
    fn flush(&mut self) {}
}

/// Sink that logs every line at error level through defmt.
#[cfg(feature = "defmt")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl FaultSink for DefmtSink {
    fn emit(&mut self, line: &str) {
        defmt::error!("{=str}", line);
    }

    fn flush(&mut self) {
        defmt::flush();
    }
}

/// Sink that logs every line at error level through `tracing`.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "std")]
impl FaultSink for TracingSink {
    fn emit(&mut self, line: &str) {
        tracing::error!(target: "fatal", "{line}");
    }
}

/// In-memory sink holding up to `N` lines.
///
/// Lines longer than [`LINE_CAPACITY`] are truncated at a character
/// boundary; lines past `N` are counted in [`LineBuffer::dropped`].
#[derive(Debug, Default, Clone)]
pub struct LineBuffer<const N: usize> {
    lines: Vec<Line, N>,
    dropped: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            dropped: 0,
        }
    }

    /// Lines emitted so far, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` when nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines discarded because the buffer was full.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<const N: usize> FaultSink for LineBuffer<N> {
    fn emit(&mut self, line: &str) {
        let mut stored = Line::new();
        for c in line.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        if self.lines.push(stored).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn line_buffer_keeps_order() {
        let mut sink = LineBuffer::<4>::new();
        sink.emit("first");
        sink.emit("second");
        let lines: std::vec::Vec<&str> = sink.lines().collect();
        assert_eq!(lines, ["first", "second"]);
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn line_buffer_counts_overflow() {
        let mut sink = LineBuffer::<1>::new();
        sink.emit("kept");
        sink.emit("lost");
        sink.emit("lost too");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.dropped(), 2);
    }

    #[test]
    fn long_lines_are_truncated_not_dropped() {
        let mut sink = LineBuffer::<1>::new();
        let long = "x".repeat(LINE_CAPACITY + 10);
        sink.emit(&long);
        assert_eq!(sink.lines().next().map(str::len), Some(LINE_CAPACITY));
    }
}
