use std::process;

use clap::{CommandFactory, Parser};
use env_logger::Env;

use rusty_eight::config::Config;
use rusty_eight::error::Chip8Error;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = Config::parse();
    let Some(path) = config.program.as_deref() else {
        println!("{}", Config::command().render_usage());
        println!("Pass the path of a CHIP-8 program to run.");
        process::exit(0);
    };

    match rusty_eight::run(path, &config) {
        Ok(()) => {},
        Err(Chip8Error::Load(e)) => {
            eprintln!("{e}");
            process::exit(0);
        },
        Err(e) => {
            eprintln!("Application error: {e}");
            process::exit(1);
        }
    }
}
