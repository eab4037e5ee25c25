#![allow(dead_code)]

//---------------------------------------------------------------------------
// Graphics / Surface
//
// Graphics is the user-facing draw target: a frame buffer, an optional
// depth buffer, a font, and the full triangle pipeline (spec 4.8). Surface
// pools N Graphics instances in a ring and hands frame production off to
// worker threads (spec 5), grounded in original_source's
// SurfaceThreaded/SurfaceSingleCore split - a thread per render() call,
// joined just before its slot is reused, with a busy-wait read cursor as
// the only synchronization against the done flags.
//---------------------------------------------------------------------------

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::clip;
use crate::color::{Color, PixelFormat};
use crate::draw2d;
use crate::font::{Font, DEFAULT_FONT};
use crate::framebuffer::{DepthBuffer, FrameBuffer};
use crate::mesh::{should_cull, Camera, Face};
use crate::raster::{self, TriShaderData};
use crate::sprite::Sprite;

pub struct Graphics {
    frame_buffer: FrameBuffer,
    depth_buffer: Option<DepthBuffer>,
    font: Arc<dyn Font>,
}

impl Graphics {
    pub fn new(width: usize, height: usize, format: PixelFormat, include_3d: bool) -> Self {
        Graphics {
            frame_buffer: FrameBuffer::new(width, height, format),
            depth_buffer: include_3d.then(|| DepthBuffer::new(width, height)),
            font: Arc::new(DEFAULT_FONT),
        }
    }

    pub fn width(&self) -> usize {
        self.frame_buffer.width()
    }

    pub fn height(&self) -> usize {
        self.frame_buffer.height()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame_buffer
    }

    pub fn depth_buffer(&self) -> Option<&DepthBuffer> {
        self.depth_buffer.as_ref()
    }

    pub fn clear_depth_buffer(&mut self) {
        if let Some(db) = &mut self.depth_buffer {
            db.clear();
        }
    }

    pub fn set_color_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.frame_buffer.color_profile_mut().set_color_rgb(r, g, b);
    }

    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.frame_buffer.color_profile_mut().set_color_rgba(r, g, b, a);
    }

    pub fn set_color_mono(&mut self, on: bool, use_alpha: bool) {
        self.frame_buffer.color_profile_mut().set_color_mono(on, use_alpha);
    }

    pub fn set_font(&mut self, font: Arc<dyn Font>) {
        self.font = font;
    }

    pub fn fill(&mut self) {
        draw2d::fill(&mut self.frame_buffer);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        draw2d::draw_line(&mut self.frame_buffer, x1, y1, x2, y2);
    }

    pub fn draw_box(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        draw2d::draw_box(&mut self.frame_buffer, x1, y1, x2, y2);
    }

    pub fn draw_box_filled(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        draw2d::draw_box_filled(&mut self.frame_buffer, x1, y1, x2, y2);
    }

    pub fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        draw2d::draw_triangle(&mut self.frame_buffer, x1, y1, x2, y2, x3, y3);
    }

    pub fn draw_triangle_filled(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        draw2d::draw_triangle_filled(&mut self.frame_buffer, x1, y1, x2, y2, x3, y3);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
    ) {
        draw2d::draw_quad(&mut self.frame_buffer, x1, y1, x2, y2, x3, y3, x4, y4);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad_filled(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x4: f32,
        y4: f32,
    ) {
        draw2d::draw_quad_filled(&mut self.frame_buffer, x1, y1, x2, y2, x3, y3, x4, y4);
    }

    pub fn draw_circle(&mut self, origin_x: f32, origin_y: f32, radius: f32) {
        draw2d::draw_circle(&mut self.frame_buffer, origin_x, origin_y, radius);
    }

    pub fn draw_circle_filled(&mut self, origin_x: f32, origin_y: f32, radius: f32) {
        draw2d::draw_circle_filled(&mut self.frame_buffer, origin_x, origin_y, radius);
    }

    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: f32) {
        draw2d::draw_text(&mut self.frame_buffer, x, y, text, scale, self.font.as_ref());
    }

    pub fn draw_sprite(&mut self, x: f32, y: f32, sprite: &Sprite) {
        crate::sprite::blit(&mut self.frame_buffer, self.depth_buffer.as_mut(), sprite, x, y);
    }

    // Writes a grayscale visualization of 1 - (z-near)/(far-near) in place
    // of the color buffer; debugging aid, not part of the draw pipeline.
    pub fn draw_depth_buffer(&mut self, camera: &Camera) {
        let Some(depth_buffer) = &self.depth_buffer else {
            return;
        };
        let near = camera.near();
        let far = camera.far();
        let width = depth_buffer.width();
        let height = depth_buffer.height();

        for y in 0..height {
            for x in 0..width {
                let z = depth_buffer.get(x, y);
                let gray = if z.is_finite() {
                    (1.0 - (z - near) / (far - near)).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                self.frame_buffer.color_profile_mut().set_color_rgb(gray, gray, gray);
                self.frame_buffer.put_pixel(x, y);
            }
        }
    }

    // The full shaded-triangle pipeline: vertex shader, view transform,
    // back-face cull, homogeneous clip, then per-clipped-sub-triangle
    // perspective divide, screen-space scale, and rasterize. The caller's
    // current color is preserved across the call (spec 4.8).
    pub fn draw_triangle_shaded<P>(
        &mut self,
        face: &Face,
        shader: &mut TriShaderData<P>,
        with_transparency: bool,
    ) {
        let saved_color = self.frame_buffer.color_profile().current_color();

        (shader.vertex_shader)(&mut shader.pass_data);

        let mut viewed = *face;
        shader.camera.translate_by_camera_position(&mut viewed);

        if should_cull(&viewed, &shader.camera.position) {
            self.frame_buffer.color_profile_mut().set_color(&saved_color);
            return;
        }

        let clip_space = shader.camera.project_face(&viewed);

        for sub_face in clip::clip_face(&clip_space) {
            let divided = shader.camera.perspective_divide(&sub_face);
            let mut screen = divided;
            shader.camera.scale_xy_to_zero_to_one(&mut screen);
            raster::rasterize_triangle(
                &screen,
                shader,
                &mut self.frame_buffer,
                self.depth_buffer.as_mut(),
                with_transparency,
            );
        }

        self.frame_buffer.color_profile_mut().set_color(&saved_color);
    }
}

pub struct SurfaceConfig {
    pub width: usize,
    pub height: usize,
    pub format: PixelFormat,
    pub include_3d: bool,
    pub slot_count: usize,
}

struct Slot {
    graphics: UnsafeCell<Graphics>,
    done: AtomicBool,
}

// SAFETY: a slot's Graphics is mutated by exactly one thread at a time -
// either the worker `render()` just launched, or the surface itself before
// launching/after observing `done`. `done`'s acquire/release ordering is
// the handoff between those windows; see `Surface::render` and
// `Surface::advance_frame_buffer`.
unsafe impl Sync for Slot {}

impl Slot {
    fn new(width: usize, height: usize, format: PixelFormat, include_3d: bool) -> Self {
        Slot {
            graphics: UnsafeCell::new(Graphics::new(width, height, format, include_3d)),
            done: AtomicBool::new(true),
        }
    }

    fn graphics(&self) -> &Graphics {
        unsafe { &*self.graphics.get() }
    }

    // SAFETY: see the struct-level note above.
    #[allow(clippy::mut_from_ref)]
    unsafe fn graphics_mut(&self) -> &mut Graphics {
        &mut *self.graphics.get()
    }
}

// A ring of `slot_count` Graphics instances. `slot_count == 1` draws
// synchronously on the caller's thread (mirrors the source's
// SurfaceSingleCore); anything larger pipelines frames across worker
// threads (SurfaceThreaded), one thread per render() call, joined just
// before its slot is reused.
pub struct Surface<F: Fn(&mut Graphics) + Send + Sync + 'static> {
    slots: Vec<Arc<Slot>>,
    handles: Vec<Option<JoinHandle<()>>>,
    read_idx: usize,
    write_idx: usize,
    include_3d: bool,
    draw: Arc<F>,
}

impl<F: Fn(&mut Graphics) + Send + Sync + 'static> Surface<F> {
    pub fn new(config: SurfaceConfig, draw: F) -> Self {
        let slot_count = config.slot_count.max(1);
        let slots: Vec<Arc<Slot>> = (0..slot_count)
            .map(|_| Arc::new(Slot::new(config.width, config.height, config.format, config.include_3d)))
            .collect();

        Surface {
            handles: (0..slot_count).map(|_| None).collect(),
            slots,
            read_idx: 0,
            write_idx: 0,
            include_3d: config.include_3d,
            draw: Arc::new(draw),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn set_font(&mut self, font: Arc<dyn Font>) {
        for slot in &self.slots {
            // SAFETY: callers are expected to configure fonts before the
            // first render() call; no worker is in flight yet.
            unsafe { slot.graphics_mut() }.set_font(Arc::clone(&font));
        }
    }

    // Busy-waits until the next ring slot's worker has finished, then
    // returns its frame buffer. The only blocking point in this type.
    pub fn advance_frame_buffer(&mut self) -> &FrameBuffer {
        let next = (self.read_idx + 1) % self.slots.len();
        while !self.slots[next].done.load(Ordering::Acquire) {
            std::hint::spin_loop();
        }
        self.read_idx = next;
        self.slots[next].graphics().frame_buffer()
    }

    // Draws the next frame into the next ring slot. Returns false (no
    // blocking) if doing so would overwrite a slot the reader hasn't
    // consumed yet.
    pub fn render(&mut self) -> bool {
        let slot_count = self.slots.len();

        if slot_count == 1 {
            let slot = Arc::clone(&self.slots[0]);
            slot.done.store(false, Ordering::Release);
            // SAFETY: single-slot surfaces never spawn a worker thread, so
            // there is no concurrent access to race against.
            let graphics = unsafe { slot.graphics_mut() };
            if self.include_3d {
                graphics.clear_depth_buffer();
            }
            (self.draw)(graphics);
            slot.done.store(true, Ordering::Release);
            return true;
        }

        let next_write = (self.write_idx + 1) % slot_count;
        if next_write == self.read_idx {
            return false;
        }

        if let Some(handle) = self.handles[next_write].take() {
            let _ = handle.join();
        }

        self.write_idx = next_write;
        let slot = Arc::clone(&self.slots[next_write]);
        slot.done.store(false, Ordering::Release);

        let draw = Arc::clone(&self.draw);
        let include_3d = self.include_3d;
        let handle = std::thread::spawn(move || {
            // SAFETY: this worker holds exclusive access to `slot`'s
            // Graphics until it stores `done = true`; the capacity check
            // above and the busy-wait in `advance_frame_buffer` keep every
            // other thread out of that window.
            let graphics = unsafe { slot.graphics_mut() };
            if include_3d {
                graphics.clear_depth_buffer();
            }
            draw(graphics);
            slot.done.store(true, Ordering::Release);
        });
        self.handles[next_write] = Some(handle);

        true
    }
}

impl<F: Fn(&mut Graphics) + Send + Sync + 'static> Drop for Surface<F> {
    fn drop(&mut self) {
        for handle in self.handles.iter_mut().filter_map(|h| h.take()) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{create_cube_mesh, DirectionalLight};
    use crate::vector::Vector;

    #[test]
    fn graphics_draw_line_paints_the_color_profile() {
        let mut g = Graphics::new(8, 8, PixelFormat::Rgb24, false);
        g.set_color_rgb(1.0, 1.0, 1.0);
        g.draw_line(0.0, 0.5, 1.0, 0.5);
        assert!(g.frame_buffer().pixels().iter().any(|&b| b != 0));
    }

    #[test]
    fn draw_triangle_shaded_writes_pixels_for_a_facing_triangle() {
        let mut g = Graphics::new(16, 16, PixelFormat::Rgb24, true);
        let mut camera = Camera::new(0.1, 100.0, 90.0, 1.0);
        camera.position = Vector::<4>::point(0.0, 0.0, 3.0);

        let mesh = create_cube_mesh();
        let face = mesh.faces[0];

        let mut vshader = |_: &mut ()| {};
        let mut fshader = |color: &mut Color, _: &mut (), _: f32, _: f32, _: f32, _: f32, _: f32, light: f32| {
            *color = Color::rgb(light, light, light);
        };
        let lights = [DirectionalLight::new(Vector::<4>::new([0.0, 0.0, -1.0, 0.0]), 1.0)];
        let mut shader = TriShaderData {
            textures: [None, None, None, None, None],
            camera: &camera,
            color: Color::rgb(1.0, 1.0, 1.0),
            lights: &lights,
            vertex_shader: &mut vshader,
            fragment_shader: &mut fshader,
            pass_data: (),
        };

        g.draw_triangle_shaded(&face, &mut shader, false);
        assert!(g.frame_buffer().pixels().iter().any(|&b| b != 0));
    }

    #[test]
    fn single_slot_surface_renders_synchronously() {
        let config = SurfaceConfig {
            width: 4,
            height: 4,
            format: PixelFormat::Rgb24,
            include_3d: false,
            slot_count: 1,
        };
        let mut surface = Surface::new(config, |g: &mut Graphics| {
            g.set_color_rgb(1.0, 0.0, 0.0);
            g.fill();
        });
        assert!(surface.render());
        let fb = surface.advance_frame_buffer();
        assert_eq!(fb.get_color_at(0, 0).r, 1.0);
    }

    #[test]
    fn threaded_surface_reports_backpressure_when_ring_is_full() {
        let config = SurfaceConfig {
            width: 4,
            height: 4,
            format: PixelFormat::Rgb24,
            include_3d: false,
            slot_count: 2,
        };
        let mut surface = Surface::new(config, |g: &mut Graphics| {
            g.set_color_rgb(0.0, 1.0, 0.0);
            g.fill();
        });
        assert!(surface.render());
        // With 2 slots, a second render() before any advance should report
        // the ring as full.
        assert!(!surface.render());
        let _ = surface.advance_frame_buffer();
    }
}
