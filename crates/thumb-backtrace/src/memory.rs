//! Bounds-checked views over target memory.
//!
//! The walker never dereferences a raw address. Stack words and code halfwords
//! are read through a [`MemoryRegion`], which pairs a half-open address range
//! with the bytes backing it and answers `None` for any access that is not
//! entirely inside that range.
//!
//! On hardware the backing slice is built once, by the fault glue, from the
//! linker-provided flash extent and the active stack bounds. On the host the
//! same type wraps a synthetic image, which is how the walker is tested.

/// Half-open address range `[base, base + size)`.
///
/// All arithmetic saturates or is checked, so a range that reaches the top of
/// the 32-bit address space behaves as if it ended at `u32::MAX + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressRange {
    base: u32,
    size: u32,
}

impl AddressRange {
    /// Create a range from its base address and size in bytes.
    #[must_use]
    pub const fn new(base: u32, size: u32) -> Self {
        Self { base, size }
    }

    /// Range spanning `[low, high)`, as given by a pair of linker symbols.
    ///
    /// Symbols in the wrong order give an empty range at `low`.
    #[must_use]
    pub const fn between(low: u32, high: u32) -> Self {
        Self {
            base: low,
            size: high.saturating_sub(low),
        }
    }

    /// First address of the range.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Size of the range in bytes.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Exclusive end address, or `None` when the range runs to the top of
    /// the address space.
    #[must_use]
    pub const fn end(&self) -> Option<u32> {
        self.base.checked_add(self.size)
    }

    /// `true` when the range contains no addresses.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Check whether `addr` lies inside the range.
    #[must_use]
    pub fn contains(&self, addr: u32) -> bool {
        self.offset_of(addr).is_some()
    }

    /// Check whether all `len` bytes starting at `addr` lie inside the range.
    #[must_use]
    pub fn contains_span(&self, addr: u32, len: u32) -> bool {
        match self.offset_of(addr) {
            Some(offset) => len <= self.size.wrapping_sub(offset),
            None => false,
        }
    }

    /// Byte offset of `addr` from the base, if `addr` is inside the range.
    #[must_use]
    pub fn offset_of(&self, addr: u32) -> Option<u32> {
        let offset = addr.checked_sub(self.base)?;
        (offset < self.size).then_some(offset)
    }
}

/// A range of target memory together with the bytes that back it.
///
/// Reads are little-endian (Cortex-M data endianness) and tolerate
/// unaligned addresses; alignment is the caller's concern, not a fault.
#[derive(Debug, Clone, Copy)]
pub struct MemoryRegion<'a> {
    range: AddressRange,
    bytes: &'a [u8],
}

impl<'a> MemoryRegion<'a> {
    /// Wrap `bytes` as the contents of memory starting at `base`.
    ///
    /// The region size is the slice length, clamped to what fits between
    /// `base` and the top of the 32-bit address space.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // clamped to u32::MAX first
    pub fn new(base: u32, bytes: &'a [u8]) -> Self {
        let room = u32::MAX.wrapping_sub(base);
        let len = bytes.len().min(room as usize) as u32;
        Self {
            range: AddressRange::new(base, len),
            bytes: bytes.get(..len as usize).unwrap_or(&[]),
        }
    }

    /// The address range covered by this region.
    #[must_use]
    pub const fn range(&self) -> AddressRange {
        self.range
    }

    /// Read `N` bytes starting at `addr`, or `None` if any of them falls
    /// outside the region.
    #[must_use]
    pub fn read_bytes<const N: usize>(&self, addr: u32) -> Option<[u8; N]> {
        let start = self.range.offset_of(addr)? as usize;
        let end = start.checked_add(N)?;
        self.bytes.get(start..end)?.try_into().ok()
    }

    /// Read a little-endian halfword at `addr`.
    #[must_use]
    pub fn read_u16(&self, addr: u32) -> Option<u16> {
        self.read_bytes::<2>(addr).map(u16::from_le_bytes)
    }

    /// Read a little-endian word at `addr`.
    #[must_use]
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        self.read_bytes::<4>(addr).map(u32::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_between_symbols() {
        let stack = AddressRange::between(0x2000_1800, 0x2000_2000);
        assert_eq!(stack.base(), 0x2000_1800);
        assert_eq!(stack.size(), 0x800);
        assert_eq!(stack.end(), Some(0x2000_2000));

        // Inverted symbols never reach below `low`.
        let inverted = AddressRange::between(0x2000_2000, 0x2000_1800);
        assert!(inverted.is_empty());
        assert_eq!(inverted.base(), 0x2000_2000);
    }

    #[test]
    fn range_is_half_open() {
        let r = AddressRange::new(0x1000, 0x1000);
        assert!(r.contains(0x1000));
        assert!(r.contains(0x1FFF));
        assert!(!r.contains(0x2000));
        assert!(!r.contains(0x0FFF));
        assert_eq!(r.end(), Some(0x2000));
    }

    #[test]
    fn range_at_top_of_address_space_does_not_overflow() {
        let r = AddressRange::new(0xFFFF_FFF0, 0x20);
        assert_eq!(r.end(), None);
        assert!(r.contains(0xFFFF_FFFF));
        assert!(r.contains_span(0xFFFF_FFFC, 4));
    }

    #[test]
    fn empty_range_contains_nothing() {
        let r = AddressRange::new(0x2000_0000, 0);
        assert!(r.is_empty());
        assert!(!r.contains(0x2000_0000));
        assert!(!r.contains_span(0x2000_0000, 0));
    }

    #[test]
    fn span_must_fit_entirely() {
        let r = AddressRange::new(0x100, 8);
        assert!(r.contains_span(0x104, 4));
        assert!(!r.contains_span(0x106, 4));
        assert!(!r.contains_span(0x108, 1));
    }

    #[test]
    fn region_reads_little_endian() {
        let bytes = [0x78, 0x56, 0x34, 0x12, 0x00, 0xF0];
        let region = MemoryRegion::new(0x2000_0000, &bytes);
        assert_eq!(region.read_u32(0x2000_0000), Some(0x1234_5678));
        assert_eq!(region.read_u16(0x2000_0004), Some(0xF000));
        assert_eq!(region.read_u16(0x2000_0001), Some(0x3456));
    }

    #[test]
    fn region_rejects_reads_straddling_the_end() {
        let bytes = [0u8; 6];
        let region = MemoryRegion::new(0x100, &bytes);
        assert_eq!(region.read_u32(0x102), Some(0));
        assert_eq!(region.read_u32(0x103), None);
        assert_eq!(region.read_u16(0x105), None);
        assert_eq!(region.read_u16(0xFF), None);
    }

    #[test]
    fn region_is_clamped_at_address_space_top() {
        let bytes = [0xAAu8; 16];
        let region = MemoryRegion::new(0xFFFF_FFF8, &bytes);
        assert_eq!(region.range().size(), 7);
        assert_eq!(region.read_u16(0xFFFF_FFFC), Some(0xAAAA));
        assert_eq!(region.read_u32(0xFFFF_FFFC), None);
    }
}
