//! The main loop: runs instructions at the instruction rate and timers, redraws and input at the frame rate.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use crate::clock::Scheduler;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::interpreter::Interpreter;
use crate::keypad::KeyState;

/// Longest the loop sleeps between checks of the clock.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Timers are 8 bits wide, so more decrements than this in one go change nothing.
const MAX_TIMER_UPDATES: u32 = u8::MAX as u32;

/// Renders the framebuffer somewhere a person can see it.
pub trait Presenter {
    /// Draws the whole display.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the underlying output fails.
    fn present(&mut self, display: &Display) -> Result<(), Chip8Error>;
}

/// What the input collaborator asks of the driver after being polled.
#[derive(Debug, PartialEq)]
pub enum Signal {
    Continue,
    Quit,
    /// Replace the running program with the image at this path.
    Load(PathBuf)
}

/// Translates host input into keypad state and control requests.
pub trait Input {
    /// Applies pending key presses and releases to `keys`.
    fn poll(&mut self, keys: &mut KeyState) -> Signal;
}

/// Owns the machine, its keypad and the clocks pacing them.
pub struct Driver {
    interpreter: Interpreter,
    keys: KeyState,
    scheduler: Scheduler
}

impl Driver {
    #[must_use]
    pub fn new(interpreter: Interpreter, scheduler: Scheduler) -> Driver {
        Driver {
            interpreter,
            keys: KeyState::new(),
            scheduler
        }
    }

    /// Runs until the frontend asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if presenting a frame fails.
    pub fn run<F: Presenter + Input>(&mut self, frontend: &mut F) -> Result<(), Chip8Error> {
        info!("Driver started.");
        loop {
            let now = Instant::now();
            if self.tick(frontend, now)?.is_break() {
                break;
            }
            thread::sleep(self.scheduler.time_until_next(Instant::now()).min(IDLE_SLEEP));
        }
        info!("Driver stopped.");
        Ok(())
    }

    /// Does whatever work is due at `now`: frame work first, then any due instructions.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if presenting a frame fails.
    pub fn tick<F: Presenter + Input>(&mut self, frontend: &mut F, now: Instant) -> Result<ControlFlow<()>, Chip8Error> {
        let frames = self.scheduler.due_frames(now);
        if frames > 0 {
            for _ in 0..frames.min(MAX_TIMER_UPDATES) {
                self.interpreter.update_timer();
            }
            frontend.present(self.interpreter.display())?;

            match frontend.poll(&mut self.keys) {
                Signal::Continue => {},
                Signal::Quit => return Ok(ControlFlow::Break(())),
                Signal::Load(path) => self.swap_program(&path)
            }
        }

        for _ in 0..self.scheduler.due_instructions(now) {
            self.interpreter.step(&self.keys);
        }

        Ok(ControlFlow::Continue(()))
    }

    #[must_use]
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Loads a new program in place of the running one. Failures are logged and the current program keeps going.
    fn swap_program(&mut self, path: &std::path::Path) {
        let result = crate::read_program_file(path).and_then(|program| self.interpreter.restart_with(&program));
        match result {
            Ok(()) => {
                self.keys.release_all();
                info!("Switched to program {}.", path.display());
            },
            Err(e) => error!("{e}")
        }
    }
}
