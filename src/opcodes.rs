//! A module to contain the types and operations related to determining opcodes.
//! For more information on CHIP-8 opcodes, please see [this section](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table) of the wikipedia page.

const CLEAR_SCREEN_OPCODE_FIRST_BYTE: u8 = 0x00;
const CLEAR_SCREEN_OPCODE_SECOND_BYTE: u8 = 0xE0;
const RETURN_OPCODE_FIRST_BYTE: u8 = 0x00;
const RETURN_OPCODE_SECOND_BYTE: u8 = 0xEE;
const LOWER_NIBBLE_MASK: u8 = 0xF;
const UPPER_NIBBLE_MASK: u8 = 0xF0;

/// Denotes a particular opcode and stores the necessary information to process it.
/// Register operands are already converted to indices into the register file.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Opcode {
    /// 0nnn
    SystemAddr(u16),

    /// 00E0
    ClearScreen,

    /// 00EE
    Return,

    /// 1nnn
    JumpAddr(u16),

    /// 2nnn
    CallAddr(u16),

    /// 3xkk
    SkipRegisterEqualsValue(usize, u8),

    /// 4xkk
    SkipRegisterNotEqualsValue(usize, u8),

    /// 5xy0
    SkipRegistersEqual(usize, usize),

    /// 6xkk
    LoadValue(usize, u8),

    /// 7xkk
    AddValue(usize, u8),

    /// 8xy0
    LoadRegisterValue(usize, usize),

    /// 8xy1
    Or(usize, usize),

    /// 8xy2
    And(usize, usize),

    /// 8xy3
    Xor(usize, usize),

    /// 8xy4
    AddRegisters(usize, usize),

    /// 8xy5
    SubtractFromFirstRegister(usize, usize),

    /// 8xy6
    BitShiftRight(usize, usize),

    /// 8xy7
    SubtractFromSecondRegister(usize, usize),

    /// 8xyE
    BitShiftLeft(usize, usize),

    /// 9xy0
    SkipRegistersNotEqual(usize, usize),

    /// Annn
    LoadRegisterI(u16),

    /// Bnnn
    JumpAddrV0(u16),

    /// Cxkk
    Random(usize, u8),

    /// Dxyn
    Draw(usize, usize, u8),

    /// Ex9E
    SkipKeyPressed(usize),

    /// ExA1
    SkipKeyNotPressed(usize),

    /// Fx07
    LoadDelayTimer(usize),

    /// Fx0A
    LoadKeyPress(usize),

    /// Fx15
    SetDelayTimer(usize),

    /// Fx18
    SetSoundTimer(usize),

    /// Fx1E
    AddRegisterI(usize),

    /// Fx29
    SetIHexSpriteLocation(usize),

    /// Fx33
    BinaryCodedDecimal(usize),

    /// Fx55
    StoreRegisters(usize),

    /// Fx65
    LoadRegisters(usize),

    /// Any bit pattern without a meaning. Executing it does nothing.
    Unknown(u16)
}

/// Stores the information necessary to determine an [Opcode](Opcode) from an instruction word read from memory.
pub struct OpcodeBytes {
    first_byte: u8,
    second_byte: u8,
    first_nibble: u8,
    last_nibble: u8
}

impl OpcodeBytes {
    /// Returns an opcode-convertible structure from a big-endian instruction word.
    /// The resulting structure can be used to get a proper [Opcode](Opcode).
    ///
    /// # Arguments
    ///
    /// * `word` - The two instruction bytes, first byte in the upper half.
    #[must_use]
    pub fn build(word: u16) -> OpcodeBytes {
        let [first_byte, second_byte] = word.to_be_bytes();

        OpcodeBytes {
            first_byte,
            second_byte,
            first_nibble: Self::get_upper_nibble_u8(first_byte),
            last_nibble: Self::get_lower_nibble_u8(second_byte)
        }
    }

    /// Returns a `u8` containing the first 4 bits of a byte.
    ///
    /// # Parameters
    ///
    /// * `byte` - The byte from which to read the nibble.
    fn get_upper_nibble_u8(byte: u8) -> u8 {
        (byte & UPPER_NIBBLE_MASK) >> 4
    }

    /// Returns a `u8` containing the last 4 bits of a byte.
    ///
    /// # Parameters
    ///
    /// * `byte` - The byte from which to read the nibble.
    fn get_lower_nibble_u8(byte: u8) -> u8 {
        byte & LOWER_NIBBLE_MASK
    }

    /// Returns a `usize` containing the first 4 bits of a byte.
    fn get_upper_nibble(byte: u8) -> usize {
        Self::get_upper_nibble_u8(byte) as usize
    }

    /// Returns a `usize` containing the last 4 bits of a byte.
    fn get_lower_nibble(byte: u8) -> usize {
        Self::get_lower_nibble_u8(byte) as usize
    }

    /// The `x` register operand.
    fn x(&self) -> usize {
        Self::get_lower_nibble(self.first_byte)
    }

    /// The `y` register operand.
    fn y(&self) -> usize {
        Self::get_upper_nibble(self.second_byte)
    }

    /// Returns the 12-bit address contained in an opcode as a `u16`.
    fn get_addr(&self) -> u16 {
        (u16::from(Self::get_lower_nibble_u8(self.first_byte)) << 8) | u16::from(self.second_byte)
    }

    /// Returns the full instruction word.
    fn word(&self) -> u16 {
        u16::from_be_bytes([self.first_byte, self.second_byte])
    }

    /// Returns a proper [Opcode](Opcode) with the data needed to handle it.
    /// Unrecognized bit patterns decode to [`Opcode::Unknown`](Opcode::Unknown).
    #[must_use]
    pub fn get_opcode(&self) -> Opcode {
        let opcode_selection_info = (self.first_nibble, self.last_nibble, self.first_byte, self.second_byte);
        match opcode_selection_info {
            (_, _, CLEAR_SCREEN_OPCODE_FIRST_BYTE, CLEAR_SCREEN_OPCODE_SECOND_BYTE) => Opcode::ClearScreen,
            (_, _, RETURN_OPCODE_FIRST_BYTE, RETURN_OPCODE_SECOND_BYTE) => Opcode::Return,
            (0x0, _, _, _) => Opcode::SystemAddr(self.get_addr()),
            (0x1, _, _, _) => Opcode::JumpAddr(self.get_addr()),
            (0x2, _, _, _) => Opcode::CallAddr(self.get_addr()),
            (0x3, _, _, _) => Opcode::SkipRegisterEqualsValue(self.x(), self.second_byte),
            (0x4, _, _, _) => Opcode::SkipRegisterNotEqualsValue(self.x(), self.second_byte),
            (0x5, 0x0, _, _) => Opcode::SkipRegistersEqual(self.x(), self.y()),
            (0x6, _, _, _) => Opcode::LoadValue(self.x(), self.second_byte),
            (0x7, _, _, _) => Opcode::AddValue(self.x(), self.second_byte),
            (0x8, 0x0, _, _) => Opcode::LoadRegisterValue(self.x(), self.y()),
            (0x8, 0x1, _, _) => Opcode::Or(self.x(), self.y()),
            (0x8, 0x2, _, _) => Opcode::And(self.x(), self.y()),
            (0x8, 0x3, _, _) => Opcode::Xor(self.x(), self.y()),
            (0x8, 0x4, _, _) => Opcode::AddRegisters(self.x(), self.y()),
            (0x8, 0x5, _, _) => Opcode::SubtractFromFirstRegister(self.x(), self.y()),
            (0x8, 0x6, _, _) => Opcode::BitShiftRight(self.x(), self.y()),
            (0x8, 0x7, _, _) => Opcode::SubtractFromSecondRegister(self.x(), self.y()),
            (0x8, 0xE, _, _) => Opcode::BitShiftLeft(self.x(), self.y()),
            (0x9, 0x0, _, _) => Opcode::SkipRegistersNotEqual(self.x(), self.y()),
            (0xA, _, _, _) => Opcode::LoadRegisterI(self.get_addr()),
            (0xB, _, _, _) => Opcode::JumpAddrV0(self.get_addr()),
            (0xC, _, _, _) => Opcode::Random(self.x(), self.second_byte),
            (0xD, _, _, _) => Opcode::Draw(self.x(), self.y(), self.last_nibble),
            (0xE, _, _, 0x9E) => Opcode::SkipKeyPressed(self.x()),
            (0xE, _, _, 0xA1) => Opcode::SkipKeyNotPressed(self.x()),
            (0xF, _, _, 0x07) => Opcode::LoadDelayTimer(self.x()),
            (0xF, _, _, 0x0A) => Opcode::LoadKeyPress(self.x()),
            (0xF, _, _, 0x15) => Opcode::SetDelayTimer(self.x()),
            (0xF, _, _, 0x18) => Opcode::SetSoundTimer(self.x()),
            (0xF, _, _, 0x1E) => Opcode::AddRegisterI(self.x()),
            (0xF, _, _, 0x29) => Opcode::SetIHexSpriteLocation(self.x()),
            (0xF, _, _, 0x33) => Opcode::BinaryCodedDecimal(self.x()),
            (0xF, _, _, 0x55) => Opcode::StoreRegisters(self.x()),
            (0xF, _, _, 0x65) => Opcode::LoadRegisters(self.x()),
            _ => Opcode::Unknown(self.word())
        }
    }
}

impl From<u16> for Opcode {
    fn from(word: u16) -> Self {
        OpcodeBytes::build(word).get_opcode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_opcode() {
        let opcode_bytes = OpcodeBytes::build(0xABCD);
        assert_eq!(opcode_bytes.first_byte, 0xAB);
        assert_eq!(opcode_bytes.second_byte, 0xCD);
        assert_eq!(opcode_bytes.first_nibble, 0xA);
        assert_eq!(opcode_bytes.last_nibble, 0xD);
    }

    #[test]
    fn get_nibble() {
        let byte = 0xAE;
        assert_eq!(OpcodeBytes::get_upper_nibble(byte), 0xA);
        assert_eq!(OpcodeBytes::get_lower_nibble(byte), 0xE);
    }

    #[test]
    fn get_addr_value() {
        let opcode_bytes = OpcodeBytes::build(0x8A78);
        assert_eq!(opcode_bytes.get_addr(), 0xA78);
    }

    #[test]
    fn get_unrecognized_opcodes() {
        for word in [0x51C7, 0x800F, 0x9AB1, 0xE1FF, 0xF0FF, 0xF2A2] {
            assert_eq!(Opcode::from(word), Opcode::Unknown(word), "{word:04X} not treated as unknown.");
        }
    }

    #[test]
    fn get_sys_addr_opcode() {
        assert_eq!(Opcode::from(0x0A78), Opcode::SystemAddr(0xA78));
    }

    #[test]
    fn get_clear_screen_opcode() {
        assert_eq!(Opcode::from(0x00E0), Opcode::ClearScreen);
    }

    #[test]
    fn get_return_opcode() {
        assert_eq!(Opcode::from(0x00EE), Opcode::Return);
    }

    #[test]
    fn get_jump_addr_opcode() {
        assert_eq!(Opcode::from(0x1ABC), Opcode::JumpAddr(0xABC));
    }

    #[test]
    fn get_call_addr_opcode() {
        assert_eq!(Opcode::from(0x2ABC), Opcode::CallAddr(0xABC));
    }

    #[test]
    fn get_skip_register_opcodes() {
        assert_eq!(Opcode::from(0x3A12), Opcode::SkipRegisterEqualsValue(0xA, 0x12));
        assert_eq!(Opcode::from(0x4B34), Opcode::SkipRegisterNotEqualsValue(0xB, 0x34));
        assert_eq!(Opcode::from(0x5120), Opcode::SkipRegistersEqual(0x1, 0x2));
        assert_eq!(Opcode::from(0x9340), Opcode::SkipRegistersNotEqual(0x3, 0x4));
    }

    #[test]
    fn get_load_and_add_value_opcodes() {
        assert_eq!(Opcode::from(0x6AFF), Opcode::LoadValue(0xA, 0xFF));
        assert_eq!(Opcode::from(0x7C01), Opcode::AddValue(0xC, 0x01));
    }

    #[test]
    fn get_arithmetic_opcodes() {
        assert_eq!(Opcode::from(0x8120), Opcode::LoadRegisterValue(0x1, 0x2));
        assert_eq!(Opcode::from(0x8121), Opcode::Or(0x1, 0x2));
        assert_eq!(Opcode::from(0x8122), Opcode::And(0x1, 0x2));
        assert_eq!(Opcode::from(0x8123), Opcode::Xor(0x1, 0x2));
        assert_eq!(Opcode::from(0x8124), Opcode::AddRegisters(0x1, 0x2));
        assert_eq!(Opcode::from(0x8125), Opcode::SubtractFromFirstRegister(0x1, 0x2));
        assert_eq!(Opcode::from(0x8126), Opcode::BitShiftRight(0x1, 0x2));
        assert_eq!(Opcode::from(0x8127), Opcode::SubtractFromSecondRegister(0x1, 0x2));
        assert_eq!(Opcode::from(0x812E), Opcode::BitShiftLeft(0x1, 0x2));
    }

    #[test]
    fn get_index_and_jump_opcodes() {
        assert_eq!(Opcode::from(0xABCD), Opcode::LoadRegisterI(0xBCD));
        assert_eq!(Opcode::from(0xB123), Opcode::JumpAddrV0(0x123));
    }

    #[test]
    fn get_random_opcode() {
        assert_eq!(Opcode::from(0xC70F), Opcode::Random(0x7, 0x0F));
    }

    #[test]
    fn get_draw_opcode() {
        assert_eq!(Opcode::from(0xD125), Opcode::Draw(0x1, 0x2, 0x5));
        assert_eq!(Opcode::from(0xDEF0), Opcode::Draw(0xE, 0xF, 0x0));
    }

    #[test]
    fn get_key_opcodes() {
        assert_eq!(Opcode::from(0xE59E), Opcode::SkipKeyPressed(0x5));
        assert_eq!(Opcode::from(0xE5A1), Opcode::SkipKeyNotPressed(0x5));
        assert_eq!(Opcode::from(0xF30A), Opcode::LoadKeyPress(0x3));
    }

    #[test]
    fn get_timer_opcodes() {
        assert_eq!(Opcode::from(0xF207), Opcode::LoadDelayTimer(0x2));
        assert_eq!(Opcode::from(0xF215), Opcode::SetDelayTimer(0x2));
        assert_eq!(Opcode::from(0xF218), Opcode::SetSoundTimer(0x2));
    }

    #[test]
    fn get_memory_opcodes() {
        assert_eq!(Opcode::from(0xF41E), Opcode::AddRegisterI(0x4));
        assert_eq!(Opcode::from(0xF429), Opcode::SetIHexSpriteLocation(0x4));
        assert_eq!(Opcode::from(0xF433), Opcode::BinaryCodedDecimal(0x4));
        assert_eq!(Opcode::from(0xF455), Opcode::StoreRegisters(0x4));
        assert_eq!(Opcode::from(0xF465), Opcode::LoadRegisters(0x4));
    }
}
