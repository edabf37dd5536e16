//! Guest RAM backing store.

use crate::error::InitError;
use crate::layout::bus_address;
use crate::Width;

/// Flat byte buffer backing the RAM portion of the address space.
///
/// Pages below the configured RAM page count dispatch here; the buffer
/// is owned exclusively by the bus and addressed with guest addresses
/// (RAM occupies the bottom of the address space, so the masked address
/// is the buffer offset).
///
/// A multi-byte access that starts inside the final RAM page may reach
/// past the end of the image. Such trailing bytes read as zero and
/// writes to them are dropped; this keeps the raw-hardware "no bounds
/// fault" contract while staying deterministic.
pub(crate) struct RamImage {
    bytes: Box<[u8]>,
}

impl RamImage {
    /// Allocates a zeroed image of `len` bytes.
    pub(crate) fn allocate(len: usize) -> Result<Self, InitError> {
        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(len).is_err() {
            return Err(InitError::Allocation { bytes: len });
        }
        bytes.resize(len, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    fn byte(&self, addr: u32) -> u8 {
        self.bytes
            .get(bus_address(addr) as usize)
            .copied()
            .unwrap_or(0)
    }

    fn set_byte(&mut self, addr: u32, value: u8) {
        if let Some(slot) = self.bytes.get_mut(bus_address(addr) as usize) {
            *slot = value;
        }
    }

    /// Reads a big-endian value of `width` starting at `addr`.
    pub(crate) fn read(&self, width: Width, addr: u32) -> u32 {
        match width {
            Width::Byte => u32::from(self.byte(addr)),
            Width::Word => {
                let hi = self.byte(addr);
                let lo = self.byte(addr.wrapping_add(1));
                u32::from(u16::from_be_bytes([hi, lo]))
            }
            Width::Long => u32::from_be_bytes([
                self.byte(addr),
                self.byte(addr.wrapping_add(1)),
                self.byte(addr.wrapping_add(2)),
                self.byte(addr.wrapping_add(3)),
            ]),
        }
    }

    /// Writes the low `width` bits of `value` big-endian starting at `addr`.
    pub(crate) fn write(&mut self, width: Width, addr: u32, value: u32) {
        let [b0, b1, b2, b3] = value.to_be_bytes();
        match width {
            Width::Byte => self.set_byte(addr, b3),
            Width::Word => {
                self.set_byte(addr, b2);
                self.set_byte(addr.wrapping_add(1), b3);
            }
            Width::Long => {
                self.set_byte(addr, b0);
                self.set_byte(addr.wrapping_add(1), b1);
                self.set_byte(addr.wrapping_add(2), b2);
                self.set_byte(addr.wrapping_add(3), b3);
            }
        }
    }

    /// Zeroes the whole image.
    pub(crate) fn clear(&mut self) {
        self.bytes.fill(0);
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::RamImage;
    use crate::Width;

    fn image_64k() -> RamImage {
        RamImage::allocate(0x10000).expect("64 KiB allocation")
    }

    #[test]
    fn zero_length_image_is_valid() {
        let ram = RamImage::allocate(0).expect("empty allocation");
        assert_eq!(ram.len(), 0);
        assert_eq!(ram.read(Width::Long, 0), 0);
    }

    #[test]
    fn multi_byte_values_are_big_endian() {
        let mut ram = image_64k();
        ram.write(Width::Long, 0x100, 0xAABB_CCDD);
        assert_eq!(ram.read(Width::Byte, 0x100), 0xAA);
        assert_eq!(ram.read(Width::Byte, 0x101), 0xBB);
        assert_eq!(ram.read(Width::Byte, 0x102), 0xCC);
        assert_eq!(ram.read(Width::Byte, 0x103), 0xDD);
        assert_eq!(ram.read(Width::Word, 0x100), 0xAABB);
        assert_eq!(ram.read(Width::Word, 0x102), 0xCCDD);
    }

    #[test]
    fn unaligned_accesses_never_fault() {
        let mut ram = image_64k();
        ram.write(Width::Long, 0x0101, 0x1122_3344);
        assert_eq!(ram.read(Width::Long, 0x0101), 0x1122_3344);
        assert_eq!(ram.read(Width::Word, 0x0102), 0x2233);
    }

    #[test]
    fn byte_writes_only_touch_the_low_byte() {
        let mut ram = image_64k();
        ram.write(Width::Byte, 0x10, 0xFFFF_FFAB);
        assert_eq!(ram.read(Width::Byte, 0x10), 0xAB);
        assert_eq!(ram.read(Width::Byte, 0x11), 0);
    }

    #[test]
    fn tail_straddle_reads_zero_and_drops_writes() {
        let mut ram = image_64k();
        ram.write(Width::Word, 0xFFFE, 0x1234);
        // The long starting at 0xFFFE keeps its two in-image bytes and
        // composes zeros for the two bytes past the end of the image.
        assert_eq!(ram.read(Width::Long, 0xFFFE), 0x1234_0000);
        ram.write(Width::Long, 0xFFFE, 0xAABB_CCDD);
        assert_eq!(ram.read(Width::Word, 0xFFFE), 0xAABB);
        assert_eq!(ram.read(Width::Word, 0x0000), 0);
    }
}
