#![allow(dead_code)]

//---------------------------------------------------------------------------
// Texture - a FrameBuffer sampled with wrapping nearest-neighbor lookup.
//---------------------------------------------------------------------------

use crate::color::{Color, PixelFormat};
use crate::framebuffer::FrameBuffer;

pub struct Texture {
    buffer: FrameBuffer,
}

impl Texture {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Texture {
            buffer: FrameBuffer::new(width, height, format),
        }
    }

    pub fn from_buffer(buffer: FrameBuffer) -> Self {
        Texture { buffer }
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    // Wraps (u, v) into [0, 1) by simple modulo, mapping negative results
    // into 1+x, then samples nearest-neighbor. See DESIGN.md open question
    // (a): this follows the wrap-into-[0,1) contract, not the original's
    // std::remainder (which instead wraps into the asymmetric (-0.5, 0.5]).
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let mut tex_u = u % 1.0;
        let mut tex_v = v % 1.0;
        if tex_u < 0.0 {
            tex_u += 1.0;
        }
        if tex_v < 0.0 {
            tex_v += 1.0;
        }

        let x = (tex_u * (self.buffer.width() as f32 - 1.0)).floor() as usize;
        let y = (tex_v * (self.buffer.height() as f32 - 1.0)).floor() as usize;

        self.buffer.get_color_at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_wraps_negative_coordinates() {
        let mut tex = Texture::new(2, 2, PixelFormat::Rgb24);
        tex.buffer_mut().color_profile_mut().set_color_rgb(1.0, 0.0, 0.0);
        tex.buffer_mut().put_pixel(0, 0);

        let at_origin = tex.sample(0.0, 0.0);
        let wrapped = tex.sample(-1.0, -1.0);
        assert_eq!(at_origin, wrapped);
    }

    #[test]
    fn sample_wrap_is_idempotent_at_boundary() {
        let tex = Texture::new(4, 4, PixelFormat::Rgb24);
        let a = tex.sample(1.0, 1.0);
        let b = tex.sample(0.0, 0.0);
        assert_eq!(a, b);
    }
}
