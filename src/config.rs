use std::path::PathBuf;

use clap::Parser;

/// Emulates the CHIP-8 virtual machine.
#[derive(Debug, Parser)]
#[command(name = "rusty_eight", version)]
pub struct Config {
    /// The program image to run.
    pub program: Option<PathBuf>,

    /// How many instructions to execute per second.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..=1_000_000))]
    pub instructions_per_second: u32,

    /// How often per second the timers tick and the screen is redrawn.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub frames_per_second: u32,

    /// Size in window pixels of a single CHIP-8 pixel.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub scale: u32
}
