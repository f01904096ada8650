//! # `RustyEight`
//!
//! `rusty_eight` is an implementation of the CHIP-8 virtual machine written in Rust.
//! The machine itself ([`Interpreter`](interpreter::Interpreter)) never performs any I/O; the [`Driver`](driver::Driver)
//! paces it against the wall clock and hands its display and keypad to a frontend.

use std::fs;
use std::path::Path;
use std::time::Instant;

use clock::Scheduler;
use config::Config;
use driver::Driver;
use error::{Chip8Error, LoadError};
use frontend::SdlFrontend;
use interpreter::Interpreter;
use memory::MAX_PROGRAM_SIZE;

pub mod clock;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod frontend;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod opcodes;

/// Runs the actual emulator.
/// Returns either an `OK` signifying the process ended successfully or an `Err` describing the issue.
///
/// # Parameters
///
/// * `path` - The program image to run.
/// * `config` - Rates and window scale.
///
/// # Errors
///
/// Returns an `Err` if:
/// * The program file cannot be read or is too large. Nothing is started in that case.
/// * Any SDL system cannot be initialized.
pub fn run(path: &Path, config: &Config) -> Result<(), Chip8Error> {
    // Load first so a bad program never opens a window
    let mut interpreter = Interpreter::new();
    load_program_file(&mut interpreter, path)?;

    let sdl_context = sdl2::init()?;
    let mut frontend = SdlFrontend::new(&sdl_context, config.scale)?;

    let scheduler = Scheduler::new(config.instructions_per_second, config.frames_per_second, Instant::now());
    let mut driver = Driver::new(interpreter, scheduler);
    driver.run(&mut frontend)
}

/// Loads the program at the provided path into the interpreter.
///
/// # Errors
///
/// Returns the forwarded `Err` from [`read_program_file`](read_program_file) if the file fails to be read,
/// or [`LoadError::TooLarge`](LoadError::TooLarge) if it does not fit in memory.
pub fn load_program_file(interpreter: &mut Interpreter, path: &Path) -> Result<(), LoadError> {
    let program = read_program_file(path)?;
    interpreter.load(&program)
}

/// Returns the byte contents of the provided program file.
///
/// # Errors
///
/// Returns an `Err` if the file fails to be read or is larger than the program area.
pub fn read_program_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let program = fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    if program.len() > MAX_PROGRAM_SIZE {
        return Err(LoadError::TooLarge { size: program.len(), max: MAX_PROGRAM_SIZE });
    }
    Ok(program)
}
