//! The fetch-decode-execute engine and all architectural state of the machine.

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::display::Display;
use crate::error::LoadError;
use crate::keypad::KeyState;
use crate::memory::{Memory, ADDRESS_MASK, MEMORY_SIZE, PROGRAM_START};
use crate::opcodes::Opcode;

const PROGRAM_COUNTER_INCREMENT: u16 = 0x2;
const REGISTER_COUNT: usize = 16;
const STACK_SIZE: usize = 16;
const FLAG_REGISTER: usize = 0xF;
const LEAST_SIGNIFICANT_BIT_MASK: u8 = 0x1;
const MOST_SIGNIFICANT_BIT_MASK: u8 = 0x80;

/// Supplies the bytes used by the random opcode (Cxkk).
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

/// Uniformly distributed bytes from a generator seeded once from OS entropy.
pub struct EntropyRandom {
    rng: StdRng
}

impl EntropyRandom {
    #[must_use]
    pub fn new() -> EntropyRandom {
        EntropyRandom { rng: StdRng::from_entropy() }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        EntropyRandom::new()
    }
}

impl RandomSource for EntropyRandom {
    fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}

/// A complete CHIP-8 machine minus its keypad, which is owned by whoever drives it.
pub struct Interpreter {
    memory: Memory,
    display: Display,
    registers: [u8; REGISTER_COUNT],
    register_i: u16,
    delay_timer: u8,
    sound_timer: u8,
    program_counter: u16,
    stack_pointer: usize,
    stack: [u16; STACK_SIZE],
    awaiting_key: Option<usize>,
    random: Box<dyn RandomSource>
}

impl Interpreter {
    /// Returns a machine in its power-on state, drawing random numbers from OS entropy.
    #[must_use]
    pub fn new() -> Interpreter {
        Interpreter::with_random_source(Box::new(EntropyRandom::new()))
    }

    /// Returns a machine in its power-on state using `random` for the random opcode.
    #[must_use]
    pub fn with_random_source(random: Box<dyn RandomSource>) -> Interpreter {
        Interpreter {
            memory: Memory::new(),
            display: Display::new(),
            registers: [0; REGISTER_COUNT],
            register_i: 0,
            delay_timer: 0,
            sound_timer: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            awaiting_key: None,
            random
        }
    }

    /// Returns the machine to its power-on state. The random source is kept.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.display.clear();
        self.registers = [0; REGISTER_COUNT];
        self.register_i = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.program_counter = PROGRAM_START;
        self.stack_pointer = 0;
        self.stack = [0; STACK_SIZE];
        self.awaiting_key = None;
    }

    /// Loads a program image at the program start address.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TooLarge`](LoadError::TooLarge) if the image does not fit; memory is untouched in that case.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.memory.load(program)
    }

    /// Resets the machine and loads `program` into it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::TooLarge`](LoadError::TooLarge) if the image does not fit, in which case the current program keeps its state.
    pub fn restart_with(&mut self, program: &[u8]) -> Result<(), LoadError> {
        let mut memory = Memory::new();
        memory.load(program)?;
        self.reset();
        self.memory = memory;
        Ok(())
    }

    /// Runs a single instruction cycle.
    /// While a key wait (Fx0A) is pending no instruction runs; the wait completes on the first cycle that sees a key held.
    pub fn step(&mut self, keys: &KeyState) {
        if let Some(register) = self.awaiting_key {
            if let Some(key) = keys.first_pressed() {
                debug!("Key {key:X} pressed, stored in V{register:X}.");
                self.registers[register] = key;
                self.awaiting_key = None;
            }
            return;
        }

        let opcode = self.fetch();
        self.decode_and_execute(opcode, keys);
    }

    /// Reads the instruction word at the program counter and moves past it.
    /// Running off the top of memory restarts the program.
    pub fn fetch(&mut self) -> u16 {
        if self.program_counter as usize >= MEMORY_SIZE {
            self.program_counter = PROGRAM_START;
        }

        let word = u16::from_be_bytes([
            self.memory.read(self.program_counter),
            self.memory.read(self.program_counter + 1)
        ]);
        self.program_counter += PROGRAM_COUNTER_INCREMENT;
        word
    }

    /// Executes a single instruction word. Unknown words do nothing.
    pub fn decode_and_execute(&mut self, word: u16, keys: &KeyState) {
        let opcode = Opcode::from(word);
        trace!("{word:04X} pc{:03X} {opcode:?}", self.program_counter);
        self.handle_opcode(opcode, keys);
    }

    /// Counts both timers down by one, stopping at zero. Meant to be called at 60Hz.
    pub fn update_timer(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    #[must_use]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Address of the next instruction to fetch.
    #[must_use]
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    #[must_use]
    pub fn register(&self, register: usize) -> u8 {
        self.registers[register]
    }

    /// Current value of the address register I.
    #[must_use]
    pub fn register_i(&self) -> u16 {
        self.register_i
    }

    #[must_use]
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    #[must_use]
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Number of return addresses on the stack.
    #[must_use]
    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    /// Whether a key wait (Fx0A) is holding back execution.
    #[must_use]
    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    fn handle_opcode(&mut self, opcode: Opcode, keys: &KeyState) {
        match opcode {
            Opcode::ClearScreen => self.display.clear(),
            Opcode::Return => self.return_from_subroutine(),
            Opcode::JumpAddr(address) => self.jump_addr(address),
            Opcode::CallAddr(address) => self.call_addr(address),
            Opcode::SkipRegisterEqualsValue(register, value) => self.skip_if(self.registers[register] == value),
            Opcode::SkipRegisterNotEqualsValue(register, value) => self.skip_if(self.registers[register] != value),
            Opcode::SkipRegistersEqual(first_register, second_register) => self.skip_if(self.registers[first_register] == self.registers[second_register]),
            Opcode::LoadValue(register, value) => self.registers[register] = value,
            Opcode::AddValue(register, value) => self.registers[register] = self.registers[register].wrapping_add(value),
            Opcode::LoadRegisterValue(first_register, second_register) => self.registers[first_register] = self.registers[second_register],
            Opcode::Or(first_register, second_register) => self.registers[first_register] |= self.registers[second_register],
            Opcode::And(first_register, second_register) => self.registers[first_register] &= self.registers[second_register],
            Opcode::Xor(first_register, second_register) => self.registers[first_register] ^= self.registers[second_register],
            Opcode::AddRegisters(first_register, second_register) => self.add_registers(first_register, second_register),
            Opcode::SubtractFromFirstRegister(first_register, second_register) => self.bounded_subtraction(first_register, second_register, first_register),
            Opcode::BitShiftRight(register, _) => self.bit_shift_right(register),
            Opcode::SubtractFromSecondRegister(first_register, second_register) => self.bounded_subtraction(second_register, first_register, first_register),
            Opcode::BitShiftLeft(register, _) => self.bit_shift_left(register),
            Opcode::SkipRegistersNotEqual(first_register, second_register) => self.skip_if(self.registers[first_register] != self.registers[second_register]),
            Opcode::LoadRegisterI(address) => self.register_i = address,
            Opcode::JumpAddrV0(address) => self.jump_addr((address + u16::from(self.registers[0])) & ADDRESS_MASK),
            Opcode::Random(register, value) => self.registers[register] = self.random.next_byte() & value,
            Opcode::Draw(first_register, second_register, height) => self.draw(first_register, second_register, height),
            Opcode::SkipKeyPressed(register) => self.skip_if(keys.is_key_down(self.registers[register])),
            Opcode::SkipKeyNotPressed(register) => self.skip_if(!keys.is_key_down(self.registers[register])),
            Opcode::LoadDelayTimer(register) => self.registers[register] = self.delay_timer,
            Opcode::LoadKeyPress(register) => self.load_key_press(register),
            Opcode::SetDelayTimer(register) => self.delay_timer = self.registers[register],
            Opcode::SetSoundTimer(register) => self.sound_timer = self.registers[register],
            Opcode::AddRegisterI(register) => self.register_i = (self.register_i + u16::from(self.registers[register])) & ADDRESS_MASK,
            Opcode::SetIHexSpriteLocation(register) => self.register_i = Memory::glyph_address(self.registers[register]),
            Opcode::BinaryCodedDecimal(register) => self.binary_coded_decimal(register),
            Opcode::StoreRegisters(register) => self.store_registers(register),
            Opcode::LoadRegisters(register) => self.load_registers(register),
            Opcode::SystemAddr(address) => debug!("Ignored machine code routine at {address:#05X}."),
            Opcode::Unknown(word) => debug!("Ignored unknown opcode {word:04X}.")
        }
    }

    fn jump_addr(&mut self, address: u16) {
        self.program_counter = address;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter += PROGRAM_COUNTER_INCREMENT;
        }
    }

    /// Pushes the address of the instruction after the call, so returning resumes right there.
    /// Calling with a full stack does nothing.
    fn call_addr(&mut self, address: u16) {
        if self.stack_pointer == STACK_SIZE {
            warn!("Stack overflow calling {address:#05X} from {:#05X}, call ignored.", self.program_counter);
            return;
        }

        self.stack[self.stack_pointer] = self.program_counter;
        self.stack_pointer += 1;
        self.program_counter = address;
    }

    /// Returning with an empty stack does nothing.
    fn return_from_subroutine(&mut self) {
        if self.stack_pointer == 0 {
            warn!("Stack underflow returning at {:#05X}, return ignored.", self.program_counter);
            return;
        }

        self.stack_pointer -= 1;
        self.program_counter = self.stack[self.stack_pointer];
    }

    // The flag is written before the result, so with x = F the result is what remains in VF.

    fn add_registers(&mut self, first_register: usize, second_register: usize) {
        let (sum, did_overflow) = self.registers[first_register].overflowing_add(self.registers[second_register]);
        self.registers[FLAG_REGISTER] = u8::from(did_overflow);
        self.registers[first_register] = sum;
    }

    fn bounded_subtraction(&mut self, minuend_register: usize, subtrahend_register: usize, result_register: usize) {
        let minuend = self.registers[minuend_register];
        let subtrahend = self.registers[subtrahend_register];
        self.registers[FLAG_REGISTER] = u8::from(minuend > subtrahend);
        self.registers[result_register] = minuend.wrapping_sub(subtrahend);
    }

    fn bit_shift_right(&mut self, register: usize) {
        let value = self.registers[register];
        self.registers[FLAG_REGISTER] = value & LEAST_SIGNIFICANT_BIT_MASK;
        self.registers[register] = value >> 1;
    }

    fn bit_shift_left(&mut self, register: usize) {
        let value = self.registers[register];
        self.registers[FLAG_REGISTER] = (value & MOST_SIGNIFICANT_BIT_MASK) >> 7;
        self.registers[register] = value << 1;
    }

    fn draw(&mut self, first_register: usize, second_register: usize, height: u8) {
        let sprite: Vec<u8> = (0..u16::from(height))
            .map(|row| self.memory.read(self.register_i + row))
            .collect();
        let collision = self.display.draw_sprite(self.registers[first_register], self.registers[second_register], &sprite);
        self.registers[FLAG_REGISTER] = u8::from(collision);
    }

    fn load_key_press(&mut self, register: usize) {
        debug!("Waiting for a key press for V{register:X}.");
        self.awaiting_key = Some(register);
    }

    fn binary_coded_decimal(&mut self, register: usize) {
        let mut value = self.registers[register];

        for i in (0..=2).rev() {
            self.memory.write(self.register_i + i, value % 10);
            value /= 10;
        }
    }

    fn store_registers(&mut self, register: usize) {
        for i in 0..=register {
            self.memory.write(self.register_i + i as u16, self.registers[i]);
        }
    }

    fn load_registers(&mut self, register: usize) {
        for i in 0..=register {
            self.registers[i] = self.memory.read(self.register_i + i as u16);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
