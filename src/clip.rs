#![allow(dead_code)]

//---------------------------------------------------------------------------
// Homogeneous clipping
//
// Clips a face against all six `|x|<=w, |y|<=w, |z|<=w` half-spaces in
// clip space (before perspective divide), fan-triangulating whatever
// polygon survives. MAX_CLIP_VERTICES bounds how large the scratch
// polygon can grow (3 + 6 planes); kept as a Vec rather than the
// original's fixed array since the bound is advisory, not load-bearing,
// here (see DESIGN.md).
//---------------------------------------------------------------------------

use crate::mesh::{Face, Vertex};

const MAX_CLIP_VERTICES: usize = 36;

pub fn is_inside_view(v: &Vertex) -> bool {
    let p = v.position;
    let w = p.w();
    p.x().abs() <= w && p.y().abs() <= w && p.z().abs() <= w
}

// Returns the sub-triangles produced by clipping `face` against the six
// canonical planes, already fan-triangulated. Empty if the face is
// wholly outside.
pub fn clip_face(face: &Face) -> Vec<Face> {
    if face.vertices.iter().all(is_inside_view) {
        return vec![*face];
    }

    let mut verts: Vec<Vertex> = face.vertices.to_vec();

    for &sign in &[1.0f32, -1.0f32] {
        for axis in 0..3usize {
            let mut out: Vec<Vertex> = Vec::with_capacity(MAX_CLIP_VERTICES);
            let n = verts.len();
            if n == 0 {
                break;
            }

            for i in 0..n {
                let current = verts[i];
                let next = verts[(i + 1) % n];

                let current_value = current.position.at(axis) * sign;
                let next_value = next.position.at(axis) * sign;

                let current_inside = current_value <= current.position.w();
                let next_inside = next_value <= next.position.w();

                if next_inside {
                    if !current_inside {
                        out.push(clip_lerp(&current, &next, current_value, next_value));
                    }
                    out.push(next);
                } else if current_inside {
                    out.push(clip_lerp(&current, &next, current_value, next_value));
                }
            }

            verts = out;
        }
    }

    if verts.len() < 3 {
        return Vec::new();
    }

    let mut faces = Vec::with_capacity(verts.len() - 2);
    for i in 1..verts.len() - 1 {
        faces.push(Face::new([verts[0], verts[i], verts[i + 1]]));
    }
    faces
}

fn clip_lerp(current: &Vertex, next: &Vertex, current_value: f32, next_value: f32) -> Vertex {
    let denom = (current.position.w() - current_value) - (next.position.w() - next_value);
    let t = (current.position.w() - current_value) / denom;
    current.lerp(next, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn vert(x: f32, y: f32, z: f32, w: f32) -> Vertex {
        Vertex::new(
            Vector::<4>::new([x, y, z, w]),
            Vector::<4>::zero(),
            Vector::<2>::new([0.0, 0.0]),
        )
    }

    #[test]
    fn wholly_inside_triangle_passes_through_unsplit() {
        let face = Face::new([
            vert(0.0, 0.0, 0.0, 1.0),
            vert(0.1, 0.0, 0.0, 1.0),
            vert(0.0, 0.1, 0.0, 1.0),
        ]);
        let clipped = clip_face(&face);
        assert_eq!(clipped.len(), 1);
    }

    #[test]
    fn wholly_outside_triangle_produces_nothing() {
        let face = Face::new([
            vert(5.0, 5.0, 5.0, 1.0),
            vert(6.0, 5.0, 5.0, 1.0),
            vert(5.0, 6.0, 5.0, 1.0),
        ]);
        let clipped = clip_face(&face);
        assert!(clipped.is_empty());
    }

    #[test]
    fn straddling_triangle_is_split_into_fan() {
        let face = Face::new([
            vert(0.0, 0.0, 0.0, 1.0),
            vert(3.0, 0.0, 0.0, 1.0),
            vert(0.0, 3.0, 0.0, 1.0),
        ]);
        let clipped = clip_face(&face);
        assert!(!clipped.is_empty());
        for f in &clipped {
            for v in &f.vertices {
                assert!(v.position.x() <= v.position.w() + 1e-4);
            }
        }
    }
}
