#![allow(dead_code)]

//---------------------------------------------------------------------------
// Sprite - a Texture plus scale/rotation/pivot state, blit back through the
// triangle rasterizer as a two-triangle textured quad (spec 4.9).
//
// Grounded in original_source's Sprite: scale factor defaults to 1, pivot
// defaults to the sprite's center, negative rotation angles normalize into
// [0,360) by reflecting through 360 rather than just taking the modulus.
//---------------------------------------------------------------------------

use crate::color::{Color, PixelFormat};
use crate::error::RasterError;
use crate::framebuffer::{DepthBuffer, FrameBuffer};
use crate::mesh::{Camera, Face, Mesh, Vertex};
use crate::raster::{self, TriShaderData};
use crate::texture::Texture;
use crate::container;
use crate::vector::Vector;

pub struct Sprite {
    texture: Texture,
    scale_factor: f32,
    rotation_degrees: i32,
    rot_point_x: f32,
    rot_point_y: f32,
}

impl Sprite {
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Self {
        Sprite {
            texture: Texture::new(width, height, format),
            scale_factor: 1.0,
            rotation_degrees: 0,
            rot_point_x: (width as f32 - 1.0) * 0.5,
            rot_point_y: (height as f32 - 1.0) * 0.5,
        }
    }

    pub fn from_container(data: &[u8]) -> Result<Self, RasterError> {
        let buffer = container::decode_frame_buffer(data)?;
        let width = buffer.width();
        let height = buffer.height();
        Ok(Sprite {
            texture: Texture::from_buffer(buffer),
            scale_factor: 1.0,
            rotation_degrees: 0,
            rot_point_x: (width as f32 - 1.0) * 0.5,
            rot_point_y: (height as f32 - 1.0) * 0.5,
        })
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn texture_mut(&mut self) -> &mut Texture {
        &mut self.texture
    }

    pub fn width(&self) -> usize {
        self.texture.width()
    }

    pub fn height(&self) -> usize {
        self.texture.height()
    }

    pub fn scaled_width(&self) -> usize {
        (self.width() as f32 * self.scale_factor).floor() as usize
    }

    pub fn scaled_height(&self) -> usize {
        (self.height() as f32 * self.scale_factor).floor() as usize
    }

    pub fn set_scale_factor(&mut self, factor: f32) {
        self.scale_factor = factor;
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    // Negative angles reflect through 360 rather than wrapping naively, so
    // -10 becomes 350, not -10 % 360.
    pub fn set_rotation_angle(&mut self, degrees: i32) {
        self.rotation_degrees = if degrees < 0 {
            360 - (degrees.abs() % 360)
        } else {
            degrees % 360
        };
    }

    pub fn rotation_angle(&self) -> i32 {
        self.rotation_degrees
    }

    // x in [0,1], scaled to the sprite's own pixel width.
    pub fn set_rotation_point_x(&mut self, x: f32) {
        self.rot_point_x = (self.width() as f32 - 1.0) * x;
    }

    pub fn set_rotation_point_y(&mut self, y: f32) {
        self.rot_point_y = (self.height() as f32 - 1.0) * y;
    }
}

fn quad_mesh(sprite: &Sprite) -> Mesh {
    let width = sprite.width() as f32;
    let height = sprite.height() as f32;
    let normal = Vector::<4>::new([0.0, 0.0, -1.0, 0.0]);

    let p00 = Vector::<4>::point(0.0, 0.0, 0.0);
    let p10 = Vector::<4>::point(width, 0.0, 0.0);
    let p11 = Vector::<4>::point(width, height, 0.0);
    let p01 = Vector::<4>::point(0.0, height, 0.0);

    let uv00 = Vector::<2>::new([0.0, 1.0]);
    let uv10 = Vector::<2>::new([1.0, 1.0]);
    let uv11 = Vector::<2>::new([1.0, 0.0]);
    let uv01 = Vector::<2>::new([0.0, 0.0]);

    let v00 = Vertex::new(p00, normal, uv00);
    let v10 = Vertex::new(p10, normal, uv10);
    let v11 = Vertex::new(p11, normal, uv11);
    let v01 = Vertex::new(p01, normal, uv01);

    Mesh::new(vec![Face::new([v00, v10, v11]), Face::new([v00, v11, v01])])
}

// Blits `sprite` into `fb` with its top-left destination pixel at the
// normalized (x, y) coordinate, applying the sprite's current scale,
// rotation and pivot. Always draws with alpha blending (spec 4.9).
pub fn blit(
    fb: &mut FrameBuffer,
    mut depth_buffer: Option<&mut DepthBuffer>,
    sprite: &Sprite,
    x: f32,
    y: f32,
) {
    let mut mesh = quad_mesh(sprite);

    let dest_x = x * (fb.width() as f32 - 1.0);
    let dest_y = y * (fb.height() as f32 - 1.0);

    mesh.translate(-sprite.rot_point_x, -sprite.rot_point_y, 0.0);
    mesh.rotate(0.0, 0.0, sprite.rotation_degrees as f32);
    mesh.apply_transformations();
    mesh.scale(sprite.scale_factor);
    mesh.translate(sprite.rot_point_x + dest_x, sprite.rot_point_y + dest_y, 0.0);

    let top = mesh.transformed_face(0);
    let bottom = mesh.transformed_face(1);

    let fb_width = fb.width() as f32 - 1.0;
    let fb_height = fb.height() as f32 - 1.0;
    let to_normalized = |face: Face| -> Face {
        let mut out = face;
        for v in &mut out.vertices {
            *v.position.x_mut() /= fb_width;
            *v.position.y_mut() /= fb_height;
        }
        out
    };

    let camera = Camera::new(0.1, 100.0, 90.0, 1.0);
    let texture = sprite.texture();
    let mut vshader = |_: &mut ()| {};
    let mut fshader = |color: &mut Color, _: &mut (), _: f32, _: f32, _: f32, u: f32, v: f32, _: f32| {
        *color = texture.sample(u, v);
    };
    let mut shader = TriShaderData {
        textures: [Some(texture), None, None, None, None],
        camera: &camera,
        color: Color::rgba(1.0, 1.0, 1.0, 1.0),
        lights: &[],
        vertex_shader: &mut vshader,
        fragment_shader: &mut fshader,
        pass_data: (),
    };

    raster::rasterize_triangle(&to_normalized(top), &mut shader, fb, depth_buffer.as_deref_mut(), true);
    raster::rasterize_triangle(&to_normalized(bottom), &mut shader, fb, depth_buffer, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sprite_pivots_on_its_own_center() {
        let sprite = Sprite::new(10, 20, PixelFormat::Rgba32);
        assert!((sprite.rot_point_x - 4.5).abs() < 1e-5);
        assert!((sprite.rot_point_y - 9.5).abs() < 1e-5);
    }

    #[test]
    fn negative_rotation_reflects_through_360() {
        let mut sprite = Sprite::new(4, 4, PixelFormat::Rgb24);
        sprite.set_rotation_angle(-10);
        assert_eq!(sprite.rotation_angle(), 350);
    }

    #[test]
    fn positive_rotation_wraps_modulo_360() {
        let mut sprite = Sprite::new(4, 4, PixelFormat::Rgb24);
        sprite.set_rotation_angle(370);
        assert_eq!(sprite.rotation_angle(), 10);
    }

    #[test]
    fn blit_writes_pixels_into_destination() {
        let mut sprite = Sprite::new(4, 4, PixelFormat::Rgba32);
        sprite
            .texture_mut()
            .buffer_mut()
            .color_profile_mut()
            .set_color_rgba(1.0, 0.0, 0.0, 1.0);
        for yy in 0..4 {
            for xx in 0..4 {
                sprite.texture_mut().buffer_mut().put_pixel(xx, yy);
            }
        }

        let mut fb = FrameBuffer::new(16, 16, PixelFormat::Rgba32);
        blit(&mut fb, None, &sprite, 0.25, 0.25);

        assert!(fb.pixels().iter().any(|&b| b != 0));
    }
}
