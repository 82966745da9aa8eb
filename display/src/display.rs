use sdl2::pixels::PixelFormatEnum;
use sdl2::render::WindowCanvas;

use vip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vip8_core::FrameBuffer;

/// # Display
///
/// Renders the 64x32 monochrome framebuffer into a scaled SDL2 window.
/// Pure I/O shim: it only gets a call to `render` when the interpreter
/// reports a pending draw.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Create a window bound to an sdl2 context, `scale` screen pixels per
    /// framebuffer pixel.
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, String> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "vip8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;

        let mut display = Display { canvas };
        display.render(&FrameBuffer::new())?;
        Ok(display)
    }

    /// Present one framebuffer; on pixels are white, off pixels black.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(|e| e.to_string())?;

        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (y, row) in frame.rows().iter().enumerate() {
                for (x, pixel) in row.iter().enumerate() {
                    let offset = y * pitch + x * 3;
                    let color = pixel * 255;
                    buffer[offset..offset + 3].copy_from_slice(&[color, color, color]);
                }
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}
