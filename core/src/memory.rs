use crate::constants::{
    FALLBACK_IMAGE, FONT_START, MEMORY_SIZE, PROGRAM_CAPACITY, PROGRAM_START, SPRITE_SHEET,
};
use crate::error::{Error, Result};

/// # Memory
/// The machine's flat, byte-addressable address space.
///
/// Every access is bounds checked against `0..=0xFFF`. A violation is an
/// `Error::OutOfBounds`, which stops the machine.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    /// Zeroed memory with the sprite sheet in the font region.
    pub fn new() -> Self {
        let mut bytes = Box::new([0; MEMORY_SIZE]);
        let font = FONT_START as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Memory with the sprite sheet and a program image loaded at `PROGRAM_START`.
    ///
    /// Nothing is written if the image doesn't fit.
    pub fn with_program(image: &[u8]) -> Result<Self> {
        if image.len() > PROGRAM_CAPACITY {
            return Err(Error::ProgramTooLarge {
                size: image.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let mut memory = Memory::new();
        memory.write_range(PROGRAM_START, image)?;
        Ok(memory)
    }

    /// Memory with the built-in fallback image as its program.
    pub fn with_fallback_program() -> Self {
        let mut memory = Memory::new();
        let start = PROGRAM_START as usize;
        memory.bytes[start..start + FALLBACK_IMAGE.len()].copy_from_slice(&FALLBACK_IMAGE);
        memory
    }

    pub fn read8(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        let byte = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Error::OutOfBounds {
                address: addr as usize,
            })?;
        *byte = value;
        Ok(())
    }

    /// Big-endian: the high byte lives at `addr`.
    pub fn read16(&self, addr: u16) -> Result<u16> {
        let high = self.read8(addr)?;
        let low = self.read8(Self::next(addr)?)?;
        Ok(u16::from(high) << 8 | u16::from(low))
    }

    pub fn write16(&mut self, addr: u16, value: u16) -> Result<()> {
        self.write8(addr, (value >> 8) as u8)?;
        self.write8(Self::next(addr)?, value as u8)
    }

    pub fn read_range(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let range = Self::range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write_range(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let range = Self::range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    fn next(addr: u16) -> Result<u16> {
        addr.checked_add(1).ok_or(Error::OutOfBounds {
            address: addr as usize + 1,
        })
    }

    fn range(addr: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(start..end),
            _ => Err(Error::RangeOutOfBounds {
                address: start,
                len,
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
