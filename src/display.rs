//! The monochrome 64x32 framebuffer.
//! Pixels are only ever toggled by sprite drawing or wiped by a clear.

/// Width of the framebuffer in pixels.
pub const WIDTH: usize = 64;

/// Height of the framebuffer in pixels.
pub const HEIGHT: usize = 32;

const SPRITE_WIDTH: usize = 8;

/// Row-major grid of on/off pixels.
pub struct Display {
    pixels: [bool; WIDTH * HEIGHT],
}

impl Display {
    #[must_use]
    pub fn new() -> Display {
        Display { pixels: [false; WIDTH * HEIGHT] }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
    }

    /// XORs a sprite onto the screen with its top-left corner at (`x`, `y`).
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Both axes wrap around, so every pixel of the sprite lands somewhere on screen.
    ///
    /// Returns whether any pixel that was on got switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row_index, row) in sprite.iter().enumerate() {
            let row_y = (y as usize + row_index) % HEIGHT;
            for bit in 0..SPRITE_WIDTH {
                if row & (0x80 >> bit) == 0 {
                    continue;
                }

                let column_x = (x as usize + bit) % WIDTH;
                let pixel = &mut self.pixels[row_y * WIDTH + column_x];
                collision |= *pixel;
                *pixel ^= true;
            }
        }

        collision
    }

    /// Returns whether the pixel at (`x`, `y`) is on. Coordinates wrap like sprite drawing does.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    /// The whole grid, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }
}

impl Default for Display {
    fn default() -> Self {
        Display::new()
    }
}
