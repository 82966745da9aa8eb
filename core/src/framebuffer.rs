use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # FrameBuffer
///
/// A 64x32 monochrome pixel grid addressed `[row][col]` with 0/1 bytes per
/// pixel. Sprites are composited by XOR with toroidal wrapping on both axes
/// independently, so a sprite drawn near an edge continues on the opposite
/// edge. The buffer owns no behavior beyond storage, clear, and XOR draw
/// with collision reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    /// An all-dark buffer; also the state after `clear`.
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        self.pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// Read one pixel; coordinates wrap.
    pub fn pixel(&self, col: usize, row: usize) -> u8 {
        self.pixels[row % DISPLAY_HEIGHT][col % DISPLAY_WIDTH]
    }

    /// Write one pixel; coordinates wrap.
    pub fn set_pixel(&mut self, col: usize, row: usize, on: u8) {
        self.pixels[row % DISPLAY_HEIGHT][col % DISPLAY_WIDTH] = on & 0x1;
    }

    /// The whole grid, for rendering.
    pub fn rows(&self) -> &[[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.pixels
    }

    /// XOR-composite a sprite whose origin is `(x mod width, y mod height)`.
    ///
    /// Each byte of `rows` is one row of 8 pixels, most significant bit
    /// leftmost. Returns true iff any pixel flipped from on to off; once a
    /// collision is observed it stays reported for the whole draw.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (row_offset, sprite_row) in rows.iter().enumerate() {
            let row = (y as usize + row_offset) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                let col = (x as usize + bit) % DISPLAY_WIDTH;
                let sprite_pixel = (sprite_row >> (7 - bit)) & 0x1;
                let screen_pixel = self.pixels[row][col];
                if screen_pixel == 1 && sprite_pixel == 1 {
                    collision = true;
                }
                self.pixels[row][col] = screen_pixel ^ sprite_pixel;
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_framebuffer {
    use super::*;

    #[test]
    fn test_draw_sets_pixels_msb_first() {
        let mut fb = FrameBuffer::new();
        let collided = fb.draw_sprite(0, 0, &[0b1010_0001]);
        assert!(!collided);
        assert_eq!(fb.pixel(0, 0), 1);
        assert_eq!(fb.pixel(1, 0), 0);
        assert_eq!(fb.pixel(2, 0), 1);
        assert_eq!(fb.pixel(7, 0), 1);
    }

    #[test]
    fn test_double_draw_restores_and_collides() {
        let mut fb = FrameBuffer::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!fb.draw_sprite(12, 7, &sprite));
        let before = fb;
        assert!(fb.draw_sprite(12, 7, &sprite));
        assert_eq!(fb, FrameBuffer::new());
        assert_ne!(before, FrameBuffer::new());
    }

    #[test]
    fn test_overlapping_sprites_collide() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(0, 0, &[0b1000_0000]));
        assert!(fb.draw_sprite(0, 0, &[0b1100_0000]));
        // The overlap bit was erased, the other bit was set
        assert_eq!(fb.pixel(0, 0), 0);
        assert_eq!(fb.pixel(1, 0), 1);
    }

    #[test]
    fn test_disjoint_sprites_dont_collide() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(0, 0, &[0xFF]));
        assert!(!fb.draw_sprite(0, 1, &[0xFF]));
    }

    #[test]
    fn test_sprites_wrap_both_axes() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(62, 31, &[0xFF, 0xFF]);
        // Horizontal wrap on the last row
        assert_eq!(fb.pixel(62, 31), 1);
        assert_eq!(fb.pixel(63, 31), 1);
        assert_eq!(fb.pixel(0, 31), 1);
        assert_eq!(fb.pixel(5, 31), 1);
        // Vertical wrap back to the first row
        assert_eq!(fb.pixel(62, 0), 1);
        assert_eq!(fb.pixel(0, 0), 1);
        assert_eq!(fb.pixel(6, 0), 0);
    }

    #[test]
    fn test_clear_turns_everything_off() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(3, 3, &[0xFF]);
        fb.clear();
        assert_eq!(fb, FrameBuffer::new());
    }
}
