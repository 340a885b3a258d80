use crate::error::{Fault, LoadError};

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine
pub trait MemoryMap {
    /// total addressable bytes
    fn capacity(&self) -> usize;

    /// get a r/w slice of the underlying memory, or None if it would run off
    /// the end
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Option<&mut [u8]>;

    /// get a r/o slice of the underlying memory, or None if it would run off
    /// the end
    fn get_ro_slice(&self, addr: u16, len: usize) -> Option<&[u8]>;

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Fault> {
        let bytes = self
            .get_rw_slice(addr, data.len())
            .ok_or(Fault::AddressOutOfRange(addr))?;
        bytes.copy_from_slice(data);
        Ok(())
    }

    fn read_byte(&self, addr: u16) -> Result<u8, Fault> {
        self.get_ro_slice(addr, 1)
            .map(|b| b[0])
            .ok_or(Fault::AddressOutOfRange(addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Fault> {
        let b = self
            .get_rw_slice(addr, 1)
            .ok_or(Fault::AddressOutOfRange(addr))?;
        b[0] = value;
        Ok(())
    }

    /// get a big-endian two-byte word (opcode fetch)
    fn get_word(&self, addr: u16) -> Result<u16, Fault> {
        let word = self
            .get_ro_slice(addr, 2)
            .ok_or(Fault::AddressOutOfRange(addr))?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }
}

/// Defines the CHIP-8 memory map (4K configuration):
///   0x0000-0x01ff  interpreter (font glyphs live at 0x0050-0x009f)
///   0x0200-0x0fff  program
///
/// the call stack and display live outside addressable memory, so programs
/// get the whole of 0x200 upward
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Option<&mut [u8]> {
        let a = addr as usize;
        self.bytes.get_mut(a..a.checked_add(len)?)
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Option<&[u8]> {
        let a = addr as usize;
        self.bytes.get(a..a.checked_add(len)?)
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest program image that fits
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// every 12-bit address is valid; anything computed from I wraps here
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

impl Chip8MemoryMap {
    /// blank memory with the font baked in
    pub fn new() -> Self {
        let mut bytes = vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice();
        let font = CHIP8_FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8MemoryMap { bytes }
    }

    /// initialises memory and loads a CHIP-8 program at 0x200
    pub fn with_program(program: &[u8]) -> Result<Self, LoadError> {
        let mut mm = Chip8MemoryMap::new();
        let max = mm.capacity() - CHIP8_PROGRAM_ADDR as usize;
        mm.write(program, CHIP8_PROGRAM_ADDR)
            .map_err(|_| LoadError::ImageTooLarge {
                len: program.len(),
                max,
            })?;
        Ok(mm)
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;
const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
