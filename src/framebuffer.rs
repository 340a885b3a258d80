/// display width in pixels
pub const WIDTH: usize = 64;
/// display height in pixels
pub const HEIGHT: usize = 32;

/// the monochrome 64x32 display. pixels only ever change by XOR-ing sprites
/// onto them or by clearing the lot
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [bool; WIDTH * HEIGHT],
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [false; WIDTH * HEIGHT],
            dirty: true,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
        self.dirty = true;
    }

    /// pixel state; anything off-screen reads as unset
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }

    /// XOR an 8-pixel-wide sprite onto the display with its top-left corner at
    /// (x, y), which must already be on-screen. rows and columns running off
    /// the right or bottom edge are clipped. returns true if any set pixel was
    /// turned off
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in rows.iter().enumerate() {
            let py = y + row;
            if py >= HEIGHT {
                break;
            }
            for col in 0..8 {
                let px = x + col;
                if px >= WIDTH {
                    break;
                }
                if byte & (0x80 >> col) != 0 {
                    let p = &mut self.pixels[py * WIDTH + px];
                    collision |= *p;
                    *p ^= true;
                }
            }
        }
        self.dirty = true;
        collision
    }

    /// coordinates of every pixel that is set (or unset), row-major
    pub fn points(&self, lit: bool) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(move |(_, p)| **p == lit)
            .map(|(i, _)| (i % WIDTH, i / WIDTH))
    }

    /// has anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
