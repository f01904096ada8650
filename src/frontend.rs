//! SDL window and keyboard handling.
//! Web-viewable documentation for the SDL2 crate [here](https://docs.rs/sdl2/latest/sdl2/).
//!
//! Physical keys are mapped onto the left-hand side of a QWERTY keyboard:
//!
//! ```text
//! 1 2 3 C      1 2 3 4
//! 4 5 6 D  ->  Q W E R
//! 7 8 9 E      A S D F
//! A 0 B F      Z X C V
//! ```

use rfd::FileDialog;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::WindowCanvas;
use sdl2::{EventPump, Sdl};

use crate::display::{Display, HEIGHT, WIDTH};
use crate::driver::{Input, Presenter, Signal};
use crate::error::Chip8Error;
use crate::keypad::KeyState;

const BACKGROUND_COLOR: Color = Color::RGB(0x00, 0x00, 0x00);
const FOREGROUND_COLOR: Color = Color::RGB(0xFF, 0xFF, 0xFF);

/// A window showing the display, scaled up, and the keyboard feeding the keypad.
pub struct SdlFrontend {
    canvas: WindowCanvas,
    event_pump: EventPump,
    scale: u32
}

impl SdlFrontend {
    /// Opens the window.
    ///
    /// # Parameters
    ///
    /// * `sdl_context` - An initialized SDL context.
    /// * `scale` - The size in window pixels of a single display pixel.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if any SDL system cannot be initialized.
    pub fn new(sdl_context: &Sdl, scale: u32) -> Result<SdlFrontend, Chip8Error> {
        let video_subsystem = sdl_context.video()?;

        #[allow(clippy::cast_possible_truncation)]
        let window = video_subsystem.window("RustyEight", WIDTH as u32 * scale, HEIGHT as u32 * scale)
            .position_centered()
            .build()
            .map_err(|window_build_error| window_build_error.to_string())?;

        let canvas = window.into_canvas()
            .build()
            .map_err(|integer_or_sdl_error| integer_or_sdl_error.to_string())?;

        let event_pump = sdl_context.event_pump()?;

        Ok(SdlFrontend { canvas, event_pump, scale })
    }
}

impl Presenter for SdlFrontend {
    fn present(&mut self, display: &Display) -> Result<(), Chip8Error> {
        self.canvas.set_draw_color(BACKGROUND_COLOR);
        self.canvas.clear();

        self.canvas.set_draw_color(FOREGROUND_COLOR);
        let rects = lit_rects(display, self.scale);
        self.canvas.fill_rects(&rects)?;

        self.canvas.present();
        Ok(())
    }
}

impl Input for SdlFrontend {
    fn poll(&mut self, keys: &mut KeyState) -> Signal {
        let mut signal = Signal::Continue;

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } |
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    signal = Signal::Quit;
                },
                Event::KeyDown { keycode: Some(Keycode::L), .. } => {
                    let path = FileDialog::new()
                        .add_filter("CHIP-8", &["ch8", "chip8"])
                        .pick_file();
                    if let Some(path) = path {
                        if signal == Signal::Continue {
                            signal = Signal::Load(path);
                        }
                    }
                },
                Event::DropFile { filename, .. } => {
                    if signal == Signal::Continue {
                        signal = Signal::Load(filename.into());
                    }
                },
                Event::KeyDown { keycode: Some(keycode), .. } => {
                    if let Some(key) = keymap(keycode) {
                        keys.press(key);
                    }
                },
                Event::KeyUp { keycode: Some(keycode), .. } => {
                    if let Some(key) = keymap(keycode) {
                        keys.release(key);
                    }
                },
                _ => {}
            }
        }

        signal
    }
}

/// Maps a physical key to its keypad key.
#[must_use]
pub fn keymap(keycode: Keycode) -> Option<u8> {
    match keycode {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

/// Returns one window rectangle per lit display pixel.
fn lit_rects(display: &Display, scale: u32) -> Vec<Rect> {
    display.pixels()
        .iter()
        .enumerate()
        .filter(|&(_, &lit)| lit)
        .map(|(index, _)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let (x, y) = ((index % WIDTH) as i32, (index / WIDTH) as i32);
            #[allow(clippy::cast_possible_wrap)]
            let scale_signed = scale as i32;
            Rect::new(x * scale_signed, y * scale_signed, scale, scale)
        })
        .collect()
}
