//---------------------------------------------------------------------------
// Demo viewer - renders a spinning, lit cube plus a couple of 2D overlays
// to a Surface and reports the resulting frame buffer's checksum per frame.
//
// There is no window here (the windowing/display surface is an external
// collaborator out of scope per spec section 1); this stands in for the
// teacher's own `viewer` binary, which itself never opens a live window.
//---------------------------------------------------------------------------

use std::sync::atomic::{AtomicU32, Ordering};

use softraster::mesh::create_cube_mesh;
use softraster::{Camera, Color, DirectionalLight, PixelFormat, Surface, SurfaceConfig, TriShaderData, Vector};

fn face_colors() -> [Color; 6] {
    [
        Color::rgb(1.0, 0.2, 0.2),
        Color::rgb(0.2, 1.0, 0.2),
        Color::rgb(0.2, 0.2, 1.0),
        Color::rgb(1.0, 1.0, 0.2),
        Color::rgb(1.0, 0.2, 1.0),
        Color::rgb(0.2, 1.0, 1.0),
    ]
}

fn main() {
    let camera = Camera::new(0.1, 100.0, 90.0, 800.0 / 600.0);
    let lights = vec![DirectionalLight::new(Vector::<4>::new([-0.5, -0.5, 0.0, 0.0]), 0.8)];
    let heading = AtomicU32::new(0);

    let config = SurfaceConfig {
        width: 800,
        height: 600,
        format: PixelFormat::Rgb24,
        include_3d: true,
        slot_count: 3,
    };

    let mut surface = Surface::new(config, move |graphics| {
        graphics.fill();

        let heading_degrees = heading.fetch_add(3, Ordering::Relaxed) as f32;
        let mut mesh = create_cube_mesh();
        mesh.rotate(0.0, heading_degrees, 0.0);
        mesh.translate(0.0, 0.0, -3.0);
        mesh.apply_transformations();

        let colors = face_colors();
        for (i, face) in mesh.faces.iter().enumerate() {
            let color = colors[(i / 2) % colors.len()];
            let mut vshader = |_: &mut Color| {};
            let mut fshader =
                |out: &mut Color, data: &mut Color, _b1: f32, _b2: f32, _b3: f32, _u: f32, _v: f32, light: f32| {
                    *out = *data * light;
                };

            let mut shader = TriShaderData {
                textures: [None, None, None, None, None],
                camera: &camera,
                color,
                lights: &lights,
                vertex_shader: &mut vshader,
                fragment_shader: &mut fshader,
                pass_data: color,
            };

            graphics.draw_triangle_shaded(face, &mut shader, false);
        }

        graphics.set_color_rgb(1.0, 1.0, 1.0);
        graphics.draw_box(0.02, 0.02, 0.2, 0.1);
        graphics.draw_text(0.03, 0.03, "softraster demo", 1.0);
    });

    for _frame in 0..8 {
        if !surface.render() {
            continue;
        }
        let fb = surface.advance_frame_buffer();
        let checksum: u64 = fb.pixels().iter().map(|&b| b as u64).sum();
        println!("frame checksum = {checksum}");
    }
}
