use log::debug;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use emu8_core::{Config, Rgb, Screen};

/// # Window
/// Renders a Chip-8 `Screen` into an SDL2 window.
///
/// Each logical pixel is drawn as a `scale` x `scale` square in either the
/// foreground (set) or background (clear) color. The window is resized when
/// a reload changes the screen's dimensions or scale.
pub struct Window {
    canvas: WindowCanvas,
    width: usize,
    height: usize,
    scale: u32,
    background: Rgb,
    foreground: Rgb,
}

impl Window {
    /// Creates a window bound to an sdl2 context, sized from `config`.
    pub fn new(sdl: &sdl2::Sdl, config: &Config) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "Emu-8",
                config.width as u32 * config.scale,
                config.height as u32 * config.scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        Ok(Window {
            canvas,
            width: config.width,
            height: config.height,
            scale: config.scale,
            background: config.background,
            foreground: config.foreground,
        })
    }

    /// Picks up palette, scale and dimension changes.
    pub fn configure(&mut self, config: &Config) -> Result<(), String> {
        self.background = config.background;
        self.foreground = config.foreground;
        if (config.width, config.height, config.scale) != (self.width, self.height, self.scale) {
            self.scale = config.scale;
            self.resize(config.width, config.height)?;
        }
        Ok(())
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), String> {
        debug!("resizing window to {}x{} at scale {}", width, height, self.scale);
        self.width = width;
        self.height = height;
        self.canvas
            .window_mut()
            .set_size(width as u32 * self.scale, height as u32 * self.scale)
            .map_err(|e| e.to_string())
    }

    /// Formats the screen as an SDL2 RGB24 texture and renders it.
    pub fn render(&mut self, screen: &Screen) -> Result<(), String> {
        if (screen.width(), screen.height()) != (self.width, self.height) {
            self.resize(screen.width(), screen.height())?;
        }

        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                screen.width() as u32,
                screen.height() as u32,
            )
            .map_err(|e| e.to_string())?;

        let (background, foreground) = (self.background, self.foreground);
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            buffer.copy_from_slice(&frame_to_texture(screen, pitch, background, foreground));
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

/// Formats a screen as rows of RGB pixels, each row padded out to `pitch` bytes.
fn frame_to_texture(screen: &Screen, pitch: usize, background: Rgb, foreground: Rgb) -> Vec<u8> {
    let mut texture = vec![0; pitch * screen.height()];
    for (row, line) in screen.rows().zip(texture.chunks_exact_mut(pitch)) {
        for (pixel, rgb) in row.iter().zip(line.chunks_exact_mut(3)) {
            let Rgb(r, g, b) = if *pixel { foreground } else { background };
            rgb.copy_from_slice(&[r, g, b]);
        }
    }
    texture
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu8_core::Display;

    const BLACK: Rgb = Rgb(0, 0, 0);
    const WHITE: Rgb = Rgb(255, 255, 255);

    #[test]
    fn test_frame_to_texture() {
        let mut screen = Screen::new(64, 32);
        // 0b01 on the first row, 0b10 on the second
        screen.draw_sprite(0, 0, &[0x40, 0x80]);
        let frame = frame_to_texture(&screen, 192, BLACK, WHITE);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(frame, expected);
    }

    #[test]
    fn test_frame_to_texture_palette_and_pitch() {
        let mut screen = Screen::new(3, 2);
        screen.draw_sprite(2, 1, &[0x80]);
        let frame = frame_to_texture(&screen, 12, Rgb(1, 2, 3), Rgb(9, 8, 7));

        assert_eq!(frame.len(), 24);
        assert_eq!(&frame[0..9], &[1, 2, 3, 1, 2, 3, 1, 2, 3]);
        // row padding is left zeroed
        assert_eq!(&frame[9..12], &[0, 0, 0]);
        assert_eq!(&frame[12..24], &[1, 2, 3, 1, 2, 3, 9, 8, 7, 0, 0, 0]);
    }
}
