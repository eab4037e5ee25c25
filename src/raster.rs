#![allow(dead_code)]

//---------------------------------------------------------------------------
// Triangle rasterizer - the hot loop.
//
// Consumes a single already-clipped, already-projected, screen-space
// ([0,1]x[0,1], still-homogeneous-w) triangle and fills pixels through a
// user fragment shader with perspective-correct texcoord/depth/light
// interpolation. No allocation; all scratch is stack scalars.
//---------------------------------------------------------------------------

use crate::color::Color;
use crate::framebuffer::{DepthBuffer, FrameBuffer};
use crate::mesh::{Camera, DirectionalLight, Face, Vertex};
use crate::texture::Texture;

const GRADIENT_CLAMP: f32 = 100_000.0;

// Up to 5 texture references, per the source's shader-data texture slots.
pub struct TriShaderData<'a, P> {
    pub textures: [Option<&'a Texture>; 5],
    pub camera: &'a Camera,
    pub color: Color,
    pub lights: &'a [DirectionalLight],
    pub vertex_shader: &'a mut dyn FnMut(&mut P),
    pub fragment_shader:
        &'a mut dyn FnMut(&mut Color, &mut P, f32, f32, f32, f32, f32, f32),
    pub pass_data: P,
}

fn saturate(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

fn calc_incr(values: [f32; 3], xy1: f32, xy2: f32, xy3: f32, one_over_d_xy: f32) -> f32 {
    let ret = (((values[1] - values[2]) * (xy1 - xy3)) - ((values[0] - values[2]) * (xy2 - xy3)))
        * one_over_d_xy;
    if ret > GRADIENT_CLAMP || ret < -GRADIENT_CLAMP {
        0.0
    } else {
        ret
    }
}

fn floats_are_equal(x: f32, y: f32) -> bool {
    (x - y).abs() < f32::EPSILON
}

// Ascending by y, then by x for vertices sharing a scanline; mirrors the
// bubble-compare-and-swap network used by the reference sort.
fn sort_vertices(mut v1: Vertex, mut v2: Vertex, mut v3: Vertex) -> (Vertex, Vertex, Vertex) {
    if v2.position.y() > v3.position.y() {
        std::mem::swap(&mut v2, &mut v3);
    }
    if v1.position.y() > v2.position.y() {
        std::mem::swap(&mut v1, &mut v2);
    }
    if v2.position.y() > v3.position.y() {
        std::mem::swap(&mut v2, &mut v3);
    }

    let y1_ceil = v1.position.y().ceil() as i64;
    let y2_ceil = v2.position.y().ceil() as i64;
    let y3_ceil = v3.position.y().ceil() as i64;

    if y2_ceil == y3_ceil && v2.position.x() > v3.position.x() {
        std::mem::swap(&mut v2, &mut v3);
    }
    if y1_ceil == y2_ceil && v1.position.x() > v2.position.x() {
        std::mem::swap(&mut v1, &mut v2);
    }
    if y2_ceil == y3_ceil && v2.position.x() > v3.position.x() {
        std::mem::swap(&mut v2, &mut v3);
    }

    (v1, v2, v3)
}

// Aggregate light contribution for a vertex normal: the sum of each light's
// saturated diffuse term, clamped to [0,1]. With no lights configured the
// surface is fully lit (light = 1.0), matching an unlit draw.
fn vertex_light_amount(lights: &[DirectionalLight], normal: &crate::vector::Vector<4>) -> f32 {
    if lights.is_empty() {
        return 1.0;
    }
    let n = normal.normalize();
    let total: f32 = lights.iter().map(|l| l.shade(&n)).sum();
    saturate(total)
}

#[allow(clippy::too_many_arguments)]
fn render_scanlines<P>(
    start_row: i64,
    end_row_exclusive: i64,
    x1: f32,
    y1: f32,
    mut x_left_acc: f32,
    mut x_right_acc: f32,
    v1_persp_mul: f32,
    v1_depth: f32,
    x_left_incr: f32,
    x_right_incr: f32,
    tex_coord_x1: f32,
    tex_coord_y1: f32,
    tex_coord_x_x_incr: f32,
    tex_coord_x_y_incr: f32,
    tex_coord_y_x_incr: f32,
    tex_coord_y_y_incr: f32,
    persp_x_incr: f32,
    persp_y_incr: f32,
    depth_x_incr: f32,
    depth_y_incr: f32,
    v1_light: f32,
    light_x_incr: f32,
    light_y_incr: f32,
    shader: &mut TriShaderData<P>,
    framebuffer: &mut FrameBuffer,
    mut depth_buffer: Option<&mut DepthBuffer>,
    with_transparency: bool,
) -> (f32, f32) {
    let height = framebuffer.height() as i64;

    for row in start_row..end_row_exclusive.min(height) {
        if row < 0 {
            x_left_acc += x_left_incr;
            x_right_acc += x_right_incr;
            continue;
        }

        let left_x = x_left_acc.ceil();
        let right_x = x_right_acc.ceil();
        let left_x_i = left_x as i64;
        let right_x_i = right_x as i64;

        if right_x_i > left_x_i {
            let one_over_stride = 1.0 / (right_x - left_x);
            let row_f = row as f32;

            let depth_start = v1_depth + (depth_y_incr * (row_f - y1)) + (depth_x_incr * (left_x - x1));
            let depth_end = v1_depth + (depth_y_incr * (row_f - y1)) + (depth_x_incr * (right_x - x1));
            let tex_x_start = (tex_coord_x1 * v1_persp_mul)
                + (tex_coord_x_y_incr * (row_f - y1))
                + (tex_coord_x_x_incr * (left_x - x1));
            let tex_x_end = (tex_coord_x1 * v1_persp_mul)
                + (tex_coord_x_y_incr * (row_f - y1))
                + (tex_coord_x_x_incr * (right_x - x1));
            let tex_y_start = (tex_coord_y1 * v1_persp_mul)
                + (tex_coord_y_y_incr * (row_f - y1))
                + (tex_coord_y_x_incr * (left_x - x1));
            let tex_y_end = (tex_coord_y1 * v1_persp_mul)
                + (tex_coord_y_y_incr * (row_f - y1))
                + (tex_coord_y_x_incr * (right_x - x1));
            let pers_start = v1_persp_mul + (persp_y_incr * (row_f - y1)) + (persp_x_incr * (left_x - x1));
            let pers_end = v1_persp_mul + (persp_y_incr * (row_f - y1)) + (persp_x_incr * (right_x - x1));
            let light_start = v1_light + (light_y_incr * (row_f - y1)) + (light_x_incr * (left_x - x1));
            let light_end = v1_light + (light_y_incr * (row_f - y1)) + (light_x_incr * (right_x - x1));

            let depth_incr = (depth_end - depth_start) * one_over_stride;
            let pers_incr = (pers_end - pers_start) * one_over_stride;
            let tex_x_incr = (tex_x_end - tex_x_start) * one_over_stride;
            let tex_y_incr = (tex_y_end - tex_y_start) * one_over_stride;
            let light_incr = (light_end - light_start) * one_over_stride;

            let mut depth = depth_start;
            let mut tex_x = tex_x_start;
            let mut tex_y = tex_y_start;
            let mut pers = pers_start;
            let mut light = light_start;

            let width = framebuffer.width() as i64;
            let x_lo = left_x_i.max(0);
            let x_hi = right_x_i.min(width);

            // advance the interpolants to x_lo if the row was clipped on the left
            if x_lo > left_x_i {
                let skip = (x_lo - left_x_i) as f32;
                depth += depth_incr * skip;
                tex_x += tex_x_incr * skip;
                tex_y += tex_y_incr * skip;
                pers += pers_incr * skip;
                light += light_incr * skip;
            }

            for px in x_lo..x_hi {
                let has_depth = depth_buffer
                    .as_ref()
                    .map(|db| db.get(px as usize, row as usize) >= depth)
                    .unwrap_or(true);

                if has_depth {
                    let persp_offset = 1.0 / pers;
                    let u = tex_x * persp_offset;
                    let v = tex_y * persp_offset;
                    (shader.fragment_shader)(&mut shader.color, &mut shader.pass_data, 0.0, 0.0, 0.0, u, v, light);
                    framebuffer.color_profile_mut().set_color(&shader.color);

                    if with_transparency {
                        framebuffer.put_pixel_with_alpha_blending(px as usize, row as usize);
                    } else {
                        framebuffer.put_pixel(px as usize, row as usize);
                        if let Some(db) = depth_buffer.as_mut() {
                            db.test_and_write(px as usize, row as usize, depth);
                        }
                    }
                }

                depth += depth_incr;
                tex_x += tex_x_incr;
                tex_y += tex_y_incr;
                pers += pers_incr;
                light += light_incr;
            }
        }

        x_left_acc += x_left_incr;
        x_right_acc += x_right_incr;
    }

    (x_left_acc, x_right_acc)
}

// Rasterizes one screen-space triangle (x,y in pixel units is computed from
// the [0,1]x[0,1] input here; z is depth; w is the original pre-divide w).
// Dropped silently (degenerate geometry) if any gradient setup divides by
// zero in a way that would propagate NaN/Inf beyond the clamp.
pub fn rasterize_triangle<P>(
    face: &Face,
    shader: &mut TriShaderData<P>,
    framebuffer: &mut FrameBuffer,
    mut depth_buffer: Option<&mut DepthBuffer>,
    with_transparency: bool,
) {
    let width = framebuffer.width() as f32;
    let height = framebuffer.height() as f32;

    let to_screen = |v: &Vertex| -> Vertex {
        let mut out = *v;
        *out.position.x_mut() *= width - 1.0;
        *out.position.y_mut() *= height - 1.0;
        out
    };

    let (v1, v2, v3) = sort_vertices(
        to_screen(&face.vertices[0]),
        to_screen(&face.vertices[1]),
        to_screen(&face.vertices[2]),
    );

    let (x1, y1) = (v1.position.x(), v1.position.y());
    let (x2, y2) = (v2.position.x(), v2.position.y());
    let (x3, y3) = (v3.position.x(), v3.position.y());

    if y1 == y3 {
        return; // zero-height triangle
    }

    let y1_ceil = y1.ceil() as i64;
    let y2_ceil = y2.ceil() as i64;
    let y3_ceil = y3.ceil() as i64;

    let mut x_left_incr_top = (x2 - x1) / (y2 - y1);
    let mut x_right_incr_top = (x3 - x1) / (y3 - y1);
    let mut x_left_incr_bottom = (x3 - x2) / (y3 - y2);
    let mut x_right_incr_bottom = (x3 - x1) / (y3 - y1);

    let vec1 = (x3 - x1, y3 - y1);
    let vec2 = (x2 - x1, y2 - y1);
    let area = (vec1.0 * vec2.1) - (vec2.0 * vec1.1);
    let left_handed = area >= 0.0;

    if !left_handed {
        std::mem::swap(&mut x_left_incr_top, &mut x_right_incr_top);
        std::mem::swap(&mut x_left_incr_bottom, &mut x_right_incr_bottom);
    }

    let x_left_acc = x1 + ((y1_ceil as f32 - y1) * x_left_incr_top);
    let x_right_acc = x1 + ((y1_ceil as f32 - y1) * x_right_incr_top);

    let v1_persp_mul = 1.0 / v1.position.w();
    let v2_persp_mul = 1.0 / v2.position.w();
    let v3_persp_mul = 1.0 / v3.position.w();
    let v1_depth = v1.position.z();
    let v2_depth = v2.position.z();
    let v3_depth = v3.position.z();

    let v1_light = vertex_light_amount(shader.lights, &v1.normal);
    let v2_light = vertex_light_amount(shader.lights, &v2.normal);
    let v3_light = vertex_light_amount(shader.lights, &v3.normal);

    let one_over_d_x = 1.0 / (((x2 - x3) * (y1 - y3)) - ((x1 - x3) * (y2 - y3)));
    let one_over_d_y = -one_over_d_x;

    if !one_over_d_x.is_finite() {
        return; // zero-area triangle
    }

    let tex_x = [
        v1.tex_coords.x() * v1_persp_mul,
        v2.tex_coords.x() * v2_persp_mul,
        v3.tex_coords.x() * v3_persp_mul,
    ];
    let tex_y = [
        v1.tex_coords.y() * v1_persp_mul,
        v2.tex_coords.y() * v2_persp_mul,
        v3.tex_coords.y() * v3_persp_mul,
    ];
    let persps = [v1_persp_mul, v2_persp_mul, v3_persp_mul];
    let depths = [v1_depth, v2_depth, v3_depth];
    let lights = [v1_light, v2_light, v3_light];

    let tex_x_x_incr = calc_incr(tex_x, y1, y2, y3, one_over_d_x);
    let tex_x_y_incr = calc_incr(tex_x, x1, x2, x3, one_over_d_y);
    let tex_y_x_incr = calc_incr(tex_y, y1, y2, y3, one_over_d_x);
    let tex_y_y_incr = calc_incr(tex_y, x1, x2, x3, one_over_d_y);
    let persp_x_incr = calc_incr(persps, y1, y2, y3, one_over_d_x);
    let persp_y_incr = calc_incr(persps, x1, x2, x3, one_over_d_y);
    let depth_x_incr = calc_incr(depths, y1, y2, y3, one_over_d_x);
    let depth_y_incr = calc_incr(depths, x1, x2, x3, one_over_d_y);
    let light_x_incr = calc_incr(lights, y1, y2, y3, one_over_d_x);
    let light_y_incr = calc_incr(lights, x1, x2, x3, one_over_d_y);

    let (x_left_acc, x_right_acc) = render_scanlines(
        y1_ceil,
        y2_ceil,
        x1,
        y1,
        x_left_acc,
        x_right_acc,
        v1_persp_mul,
        v1_depth,
        x_left_incr_top,
        x_right_incr_top,
        v1.tex_coords.x(),
        v1.tex_coords.y(),
        tex_x_x_incr,
        tex_x_y_incr,
        tex_y_x_incr,
        tex_y_y_incr,
        persp_x_incr,
        persp_y_incr,
        depth_x_incr,
        depth_y_incr,
        v1_light,
        light_x_incr,
        light_y_incr,
        shader,
        framebuffer,
        depth_buffer.as_deref_mut(),
        with_transparency,
    );

    let (x_left_acc, x_right_acc) = if y1_ceil != y2_ceil {
        (
            x_left_acc
                + ((y2 - y2_ceil as f32) * x_left_incr_top)
                + ((y2_ceil as f32 - y2) * x_left_incr_bottom),
            x_right_acc
                + ((y2 - y2_ceil as f32) * x_right_incr_top)
                + ((y2_ceil as f32 - y2) * x_right_incr_bottom),
        )
    } else if !floats_are_equal(y1, y2) {
        (
            x1 + ((y2 - y1) * x_left_incr_top) + ((y2_ceil as f32 - y2) * x_left_incr_bottom),
            x1 + ((y2 - y1) * x_right_incr_top) + ((y2_ceil as f32 - y2) * x_right_incr_bottom),
        )
    } else {
        (
            x1 + ((y2_ceil as f32 - y2) * x_left_incr_bottom),
            x2 + ((y2_ceil as f32 - y2) * x_right_incr_bottom),
        )
    };

    render_scanlines(
        y2_ceil,
        y3_ceil,
        x1,
        y1,
        x_left_acc,
        x_right_acc,
        v1_persp_mul,
        v1_depth,
        x_left_incr_bottom,
        x_right_incr_bottom,
        v1.tex_coords.x(),
        v1.tex_coords.y(),
        tex_x_x_incr,
        tex_x_y_incr,
        tex_y_x_incr,
        tex_y_y_incr,
        persp_x_incr,
        persp_y_incr,
        depth_x_incr,
        depth_y_incr,
        v1_light,
        light_x_incr,
        light_y_incr,
        shader,
        framebuffer,
        depth_buffer,
        with_transparency,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelFormat;
    use crate::mesh::Camera;
    use crate::vector::Vector;

    fn flat_vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(
            Vector::<4>::new([x, y, z, 1.0]),
            Vector::<4>::new([0.0, 0.0, 1.0, 0.0]),
            Vector::<2>::new([0.0, 0.0]),
        )
    }

    #[test]
    fn solid_color_triangle_writes_some_pixels() {
        let camera = Camera::new(0.1, 100.0, 90.0, 1.0);
        let mut fb = FrameBuffer::new(8, 8, PixelFormat::Rgb24);
        let mut depth = DepthBuffer::new(8, 8);

        let face = Face::new([
            flat_vertex(0.0, 0.0, 0.5),
            flat_vertex(1.0, 0.0, 0.5),
            flat_vertex(0.0, 1.0, 0.5),
        ]);

        let mut vshader = |_: &mut ()| {};
        let mut fshader = |color: &mut Color, _: &mut (), _: f32, _: f32, _: f32, _: f32, _: f32, _: f32| {
            *color = Color::rgb(1.0, 0.0, 0.0);
        };
        let mut shader = TriShaderData {
            textures: [None, None, None, None, None],
            camera: &camera,
            color: Color::rgb(1.0, 0.0, 0.0),
            lights: &[],
            vertex_shader: &mut vshader,
            fragment_shader: &mut fshader,
            pass_data: (),
        };

        rasterize_triangle(&face, &mut shader, &mut fb, Some(&mut depth), false);

        let wrote_any = fb.pixels().iter().any(|&b| b != 0);
        assert!(wrote_any);
    }

    #[test]
    fn degenerate_zero_area_triangle_is_dropped_silently() {
        let camera = Camera::new(0.1, 100.0, 90.0, 1.0);
        let mut fb = FrameBuffer::new(4, 4, PixelFormat::Rgb24);

        let face = Face::new([
            flat_vertex(0.2, 0.2, 0.5),
            flat_vertex(0.2, 0.2, 0.5),
            flat_vertex(0.2, 0.2, 0.5),
        ]);

        let mut vshader = |_: &mut ()| {};
        let mut fshader = |_: &mut Color, _: &mut (), _: f32, _: f32, _: f32, _: f32, _: f32, _: f32| {};
        let mut shader = TriShaderData {
            textures: [None, None, None, None, None],
            camera: &camera,
            color: Color::rgb(1.0, 1.0, 1.0),
            lights: &[],
            vertex_shader: &mut vshader,
            fragment_shader: &mut fshader,
            pass_data: (),
        };

        rasterize_triangle(&face, &mut shader, &mut fb, None, false);
        assert!(fb.pixels().iter().all(|&b| b == 0));
    }
}
