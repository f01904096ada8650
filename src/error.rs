//! Error types for the few operations that can fail: loading a program and bringing up the frontend.
//! Everything the interpreter does once a program is running is total and never errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a program image could not be placed into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image does not fit between the program start address and the top of memory.
    #[error("program is too large to fit in CHIP-8 memory ({size} bytes, max file size is {max} bytes)")]
    TooLarge { size: usize, max: usize },

    /// The image file could not be opened or read.
    #[error("could not read program file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top level error returned by [`run`](crate::run).
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// SDL reports its failures as plain strings.
    #[error("frontend error: {0}")]
    Frontend(String),
}

impl From<String> for Chip8Error {
    fn from(message: String) -> Self {
        Chip8Error::Frontend(message)
    }
}
