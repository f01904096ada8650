//! The flat 4KB address space of the machine.
//!
//! Layout:
//! * `0x000..0x200` - reserved for the interpreter. Only the font glyphs at `0x050..0x0A0` live here.
//! * `0x200..0x1000` - program image and working memory.

use log::{info, warn};

use crate::error::LoadError;

/// Total number of addressable bytes.
pub const MEMORY_SIZE: usize = 0x1000;

/// Where program images are loaded and where execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// The largest program image that fits in memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Address of the glyph for the digit `0`. Each subsequent digit follows directly after.
pub const FONT_START: u16 = 0x050;

/// Number of bytes (rows) making up a single glyph.
pub const GLYPH_SIZE: u16 = 5;

/// Addresses are 12 bits wide.
pub const ADDRESS_MASK: u16 = 0x0FFF;

const FONT: [u8; 80] = [
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

const FONT_END: u16 = FONT_START + FONT.len() as u16;

/// Byte addressable RAM with the font glyphs baked in.
pub struct Memory {
    ram: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Returns zeroed memory holding only the font glyphs.
    #[must_use]
    pub fn new() -> Memory {
        let mut ram = [0; MEMORY_SIZE];
        ram[FONT_START as usize..FONT_END as usize].copy_from_slice(&FONT);
        Memory { ram }
    }

    /// Returns the byte at `address`. Only the lower 12 bits of the address are used.
    #[must_use]
    pub fn read(&self, address: u16) -> u8 {
        self.ram[(address & ADDRESS_MASK) as usize]
    }

    /// Stores `value` at `address`. Only the lower 12 bits of the address are used.
    /// The font glyphs are read-only, so stores landing on them are dropped.
    pub fn write(&mut self, address: u16, value: u8) {
        let address = address & ADDRESS_MASK;
        if Self::is_font_address(address) {
            warn!("Ignored store of {value:#04X} into font glyph at {address:#05X}.");
            return;
        }
        self.ram[address as usize] = value;
    }

    /// Returns the address of the glyph for the lowest nibble of `digit`.
    #[must_use]
    pub fn glyph_address(digit: u8) -> u16 {
        FONT_START + u16::from(digit & 0xF) * GLYPH_SIZE
    }

    /// Copies a program image into memory starting at [`PROGRAM_START`](PROGRAM_START).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TooLarge`](LoadError::TooLarge) if the image is bigger than [`MAX_PROGRAM_SIZE`](MAX_PROGRAM_SIZE).
    /// Memory is left untouched in that case.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge { size: program.len(), max: MAX_PROGRAM_SIZE });
        }

        let start = PROGRAM_START as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        info!("Loaded program [size: {}]", program.len());
        Ok(())
    }

    fn is_font_address(address: u16) -> bool {
        (FONT_START..FONT_END).contains(&address)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
