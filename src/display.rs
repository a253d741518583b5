pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome bitmap. The interpreter clears it and blits
/// sprites onto it; the renderer reads the grid whenever the redraw
/// flag is pending and acknowledges with [`Display::clear_redraw`].
pub struct Display {
    pixels: [[bool; WIDTH]; HEIGHT],
    redraw: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
            redraw: true,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
        self.redraw = true;
    }

    /// XOR-blits `rows` at `(x, y)`, one byte per row, most significant
    /// bit drawn leftmost. The origin wraps around both edges; the
    /// sprite body does not and is clipped at the right and bottom.
    /// Returns true if any pixel flipped from lit to unlit. Marks the
    /// redraw flag even when no bit was set.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        let origin_x = x as usize % WIDTH;
        let origin_y = y as usize % HEIGHT;

        for (row, &byte) in rows.iter().enumerate() {
            let py = origin_y + row;
            if py >= HEIGHT {
                break;
            }
            for bit in 0..8 {
                let px = origin_x + bit;
                if px >= WIDTH {
                    break;
                }
                if (byte >> (7 - bit)) & 1 == 1 {
                    let cell = &mut self.pixels[py][px];
                    if *cell {
                        collision = true;
                    }
                    *cell = !*cell;
                }
            }
        }

        self.redraw = true;
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    pub fn pixels(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw
    }

    /// The renderer calls this after consuming a frame, or it will
    /// keep re-observing the same pending flag.
    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_count(d: &Display) -> usize {
        d.pixels()
            .iter()
            .flatten()
            .filter(|&&p| p)
            .count()
    }

    #[test]
    fn draw_lights_pixels_and_reports_no_collision() {
        let mut d = Display::new();
        let collision = d.draw_sprite(0, 0, &[0b1010_0000]);
        assert!(!collision);
        assert!(d.pixel(0, 0));
        assert!(!d.pixel(1, 0));
        assert!(d.pixel(2, 0));
        assert_eq!(lit_count(&d), 2);
    }

    #[test]
    fn redrawing_the_same_sprite_is_an_involution() {
        let mut d = Display::new();
        d.draw_sprite(10, 5, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        let before = *d.pixels();
        d.draw_sprite(3, 20, &[0xFF, 0xFF]);
        let collision = d.draw_sprite(3, 20, &[0xFF, 0xFF]);
        assert!(collision); // every bit erased a lit pixel
        assert_eq!(*d.pixels(), before);
    }

    #[test]
    fn origin_wraps_but_body_clips() {
        let mut d = Display::new();
        d.draw_sprite(70, 34, &[0x80]);
        assert!(d.pixel(70 % WIDTH, 34 % HEIGHT));
        assert_eq!(lit_count(&d), 1);

        // at x = 62 only two of the eight columns fit
        d.clear();
        d.draw_sprite(62, 0, &[0xFF]);
        assert!(d.pixel(62, 0));
        assert!(d.pixel(63, 0));
        assert_eq!(lit_count(&d), 2);

        // rows past the bottom edge are dropped, not wrapped
        d.clear();
        d.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert!(d.pixel(0, 30));
        assert!(d.pixel(0, 31));
        assert_eq!(lit_count(&d), 2);
    }

    #[test]
    fn clear_is_unconditional_and_idempotent() {
        let mut d = Display::new();
        d.draw_sprite(0, 0, &[0xFF; 15]);
        d.clear();
        assert_eq!(lit_count(&d), 0);
        d.clear();
        assert_eq!(lit_count(&d), 0);
    }

    #[test]
    fn redraw_flag_set_by_every_draw_and_cleared_by_ack() {
        let mut d = Display::new();
        assert!(d.redraw_pending());
        d.clear_redraw();
        assert!(!d.redraw_pending());

        // an all-zero sprite still marks the frame dirty
        d.draw_sprite(0, 0, &[0x00]);
        assert!(d.redraw_pending());
        d.clear_redraw();

        d.clear();
        assert!(d.redraw_pending());
    }
}
