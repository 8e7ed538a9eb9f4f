use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;

/// The drawing surface the machine renders to.
///
/// Implementations own the framebuffer; the machine only reports where to
/// blit and reads back whether a pixel was erased.
pub trait Display {
    /// XORs an 8-pixel-wide sprite with one byte per row onto the screen at
    /// `(x, y)`. Returns whether any previously set pixel was cleared.
    fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool;

    fn clear(&mut self);

    /// Called once per timer tick
    fn refresh(&mut self) {}

    /// Called when the machine is rebuilt from `config`
    fn reset(&mut self, _config: &Config) {}
}

/// # Screen
/// A monochrome framebuffer, indexed as `[y * width + x]`.
///
/// Sprite start coordinates are reduced modulo the screen size. Pixels that
/// then cross the right or bottom edge wrap around or are clipped depending
/// on `wrap_columns` and `wrap_rows`.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
    wrap_columns: bool,
    wrap_rows: bool,
    dirty: bool,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Screen {
            width,
            height,
            pixels: vec![false; width * height],
            wrap_columns: true,
            wrap_rows: true,
            dirty: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut screen = Screen::new(config.width, config.height);
        screen.set_wrapping(config.quirks.wrap_columns, config.quirks.wrap_rows);
        screen
    }

    pub fn set_wrapping(&mut self, columns: bool, rows: bool) {
        self.wrap_columns = columns;
        self.wrap_rows = rows;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width.max(1))
    }

    /// Whether anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn wrap(coordinate: usize, size: usize, wrap: bool) -> Option<usize> {
        if coordinate < size {
            Some(coordinate)
        } else if wrap {
            Some(coordinate % size)
        } else {
            None
        }
    }
}

impl Display for Screen {
    fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let x0 = x as usize % self.width;
        let y0 = y as usize % self.height;
        let mut erased = false;

        for (row, bits) in rows.iter().enumerate() {
            let py = match Self::wrap(y0 + row, self.height, self.wrap_rows) {
                Some(py) => py,
                None => break,
            };
            for bit in 0..8 {
                let px = match Self::wrap(x0 + bit, self.width, self.wrap_columns) {
                    Some(px) => px,
                    None => break,
                };
                if bits & (0x80 >> bit) != 0 {
                    let pixel = &mut self.pixels[py * self.width + px];
                    *pixel = !*pixel;
                    erased |= !*pixel;
                }
            }
        }

        self.dirty = true;
        erased
    }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.dirty = true;
    }

    fn reset(&mut self, config: &Config) {
        *self = Screen::from_config(config);
    }
}

/// A `Screen` shared between the machine thread and whatever renders it.
#[derive(Clone, Debug)]
pub struct SharedScreen(Arc<Mutex<Screen>>);

impl SharedScreen {
    pub fn new(screen: Screen) -> Self {
        SharedScreen(Arc::new(Mutex::new(screen)))
    }

    /// A poisoned lock still holds a usable framebuffer.
    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Display for SharedScreen {
    fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        self.lock().draw_sprite(x, y, rows)
    }

    fn clear(&mut self) {
        self.lock().clear()
    }

    fn reset(&mut self, config: &Config) {
        self.lock().reset(config)
    }
}

#[cfg(test)]
mod test_screen {
    use super::*;

    fn lit(screen: &Screen) -> usize {
        screen.rows().flatten().filter(|p| **p).count()
    }

    #[test]
    fn test_draw_sets_pixels() {
        let mut screen = Screen::new(64, 32);
        // the 0 glyph
        let erased = screen.draw_sprite(1, 1, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(!erased);
        assert!(screen.pixel(1, 1) && screen.pixel(4, 1));
        assert!(screen.pixel(1, 2) && !screen.pixel(2, 2) && screen.pixel(4, 2));
        assert!(!screen.pixel(5, 1));
        assert_eq!(lit(&screen), 14);
    }

    #[test]
    fn test_draw_xors_and_collides() {
        let mut screen = Screen::new(64, 32);
        assert!(!screen.draw_sprite(0, 0, &[0b0101_0000]));
        assert!(screen.draw_sprite(2, 0, &[0b1100_0000]));
        // 0 1 0 1 ^ _ _ 1 1 -> 0 1 1 0
        assert!(!screen.pixel(0, 0));
        assert!(screen.pixel(1, 0));
        assert!(screen.pixel(2, 0));
        assert!(!screen.pixel(3, 0));
    }

    #[test]
    fn test_draw_twice_erases() {
        let mut screen = Screen::new(64, 32);
        screen.draw_sprite(10, 10, &[0xFF]);
        assert!(screen.draw_sprite(10, 10, &[0xFF]));
        assert_eq!(lit(&screen), 0);
    }

    #[test]
    fn test_wraps_columns_and_rows() {
        let mut screen = Screen::new(64, 32);
        screen.draw_sprite(62, 31, &[0xF0, 0xF0]);
        assert!(screen.pixel(62, 31) && screen.pixel(63, 31));
        assert!(screen.pixel(0, 31) && screen.pixel(1, 31));
        assert!(screen.pixel(0, 0) && screen.pixel(63, 0));
    }

    #[test]
    fn test_clips_when_not_wrapping() {
        let mut screen = Screen::new(64, 32);
        screen.set_wrapping(false, false);
        screen.draw_sprite(62, 31, &[0xF0, 0xF0]);
        assert_eq!(lit(&screen), 2);
        assert!(!screen.pixel(0, 31));
        assert!(!screen.pixel(62, 0));
    }

    #[test]
    fn test_start_coordinates_wrap() {
        let mut screen = Screen::new(64, 32);
        screen.set_wrapping(false, false);
        screen.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(screen.pixel(3, 2));
    }

    #[test]
    fn test_clear() {
        let mut screen = Screen::new(64, 32);
        screen.draw_sprite(0, 0, &[0xFF]);
        screen.take_dirty();
        screen.clear();
        assert_eq!(lit(&screen), 0);
        assert!(screen.take_dirty());
        assert!(!screen.take_dirty());
    }

    #[test]
    fn test_reset_resizes() {
        let mut screen = SharedScreen::new(Screen::new(64, 32));
        let config = Config {
            width: 128,
            height: 64,
            ..Config::default()
        };
        screen.reset(&config);
        assert_eq!(screen.lock().width(), 128);
        assert_eq!(screen.lock().height(), 64);
    }
}
