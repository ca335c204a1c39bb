//! Naming of the vector that was active when an unhandled interrupt fired.
//!
//! `SCB.ICSR.VECTACTIVE` holds the exception number being serviced. Numbers
//! below 16 are Cortex-M system exceptions; 16 and up are the SoC's external
//! interrupts, which on the CSK6 map onto the table below.

/// Exception number of the first external interrupt.
pub const EXTERNAL_IRQ_BASE: u16 = 16;

/// Mask of the `VECTACTIVE` field in `SCB.ICSR`.
pub const ICSR_VECTACTIVE_MASK: u32 = 0x1FF;

/// Name reported for vectors without a table entry.
pub const UNKNOWN: &str = "unknown";

/// CSK6 external interrupt names, indexed by IRQ number.
pub const INTERRUPT_NAMES: [&str; 33] = [
    "dma",
    "usbc",
    "sdio",
    "crypto",
    "qspi",
    "efuse",
    "timer",
    "wdt",
    "uart0",
    "uart1",
    "uart2",
    "ir",
    "spi0",
    "spi1",
    "iic0",
    "iic1",
    "gpt",
    "gpio0",
    "gpio1",
    "gpadc",
    "trng",
    "cmn-mailbox",
    "cmn-uart",
    "aon-keysense",
    "aon-cbutton",
    "aon-rtc",
    "aon-iwdt",
    "aon-timer",
    "aon-wakeup",
    "aon-pmuc",
    "aon-cp0",
    "aon-cp1",
    "aon-cp2",
];

/// The vector being serviced, split into system exception or external IRQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveVector {
    /// System exception (vector number below 16; 0 means thread mode).
    Exception(u16),
    /// External interrupt, numbered from 0.
    Interrupt(u16),
}

impl ActiveVector {
    /// Decode a raw exception number.
    #[must_use]
    pub const fn from_vector(vector: u16) -> Self {
        match vector.checked_sub(EXTERNAL_IRQ_BASE) {
            Some(irq) => Self::Interrupt(irq),
            None => Self::Exception(vector),
        }
    }

    /// Decode the `VECTACTIVE` field of a raw `SCB.ICSR` value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 9 bits
    pub const fn from_icsr(icsr: u32) -> Self {
        Self::from_vector((icsr & ICSR_VECTACTIVE_MASK) as u16)
    }

    /// IRQ number for external interrupts, exception number otherwise.
    #[must_use]
    pub const fn number(&self) -> u16 {
        match *self {
            Self::Exception(n) | Self::Interrupt(n) => n,
        }
    }

    /// Peripheral name of an external interrupt, or [`UNKNOWN`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        match *self {
            Self::Interrupt(irq) => INTERRUPT_NAMES
                .get(usize::from(irq))
                .copied()
                .unwrap_or(UNKNOWN),
            Self::Exception(_) => UNKNOWN,
        }
    }
}
