#![allow(dead_code)]

//---------------------------------------------------------------------------
// Vertex / Face / Mesh / Camera / DirectionalLight
//
// A Mesh exclusively owns its Faces; it accumulates a model transform by
// matrix multiplication and folds it into vertex positions with
// `apply_transformations`. Camera owns clip planes, FOV, aspect ratio and
// view position, and regenerates its projection matrix lazily whenever an
// input parameter changes.
//---------------------------------------------------------------------------

use crate::matrix::Matrix;
use crate::vector::Vector;
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vector<4>,
    pub normal: Vector<4>,
    pub tex_coords: Vector<2>,
}

impl Vertex {
    pub fn new(position: Vector<4>, normal: Vector<4>, tex_coords: Vector<2>) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
        }
    }

    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: self.position.lerp(&other.position, t),
            normal: self.normal.lerp(&other.normal, t),
            tex_coords: self.tex_coords.lerp(&other.tex_coords, t),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Face {
    pub vertices: [Vertex; 3],
}

impl Face {
    pub fn new(vertices: [Vertex; 3]) -> Self {
        Face { vertices }
    }

    // Unit face normal from the cross product of two edges, per the
    // winding order of `vertices`.
    pub fn calc_normal(&self) -> Vector<4> {
        let v1 = self.vertices[0].position;
        let v2 = self.vertices[1].position;
        let v3 = self.vertices[2].position;

        let edge12 = Vector::<4>::new([
            v2.x() - v1.x(),
            v2.y() - v1.y(),
            v2.z() - v1.z(),
            1.0,
        ]);
        let edge23 = Vector::<4>::new([
            v3.x() - v2.x(),
            v3.y() - v2.y(),
            v3.z() - v2.z(),
            1.0,
        ]);

        edge12.cross_product(&edge23).normalize()
    }
}

pub struct Mesh {
    pub faces: Vec<Face>,
    pub transform: Matrix<4, 4>,
}

impl Mesh {
    pub fn new(faces: Vec<Face>) -> Self {
        Mesh {
            faces,
            transform: Matrix::<4, 4>::identity(),
        }
    }

    pub fn scale(&mut self, factor: f32) {
        *self.transform.at_mut(0, 0) *= factor;
        *self.transform.at_mut(1, 1) *= factor;
        *self.transform.at_mut(2, 2) *= factor;
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        *self.transform.at_mut(3, 0) += x;
        *self.transform.at_mut(3, 1) += y;
        *self.transform.at_mut(3, 2) += z;
    }

    pub fn rotate(&mut self, x_degrees: f32, y_degrees: f32, z_degrees: f32) {
        let rot = generate_rotation_matrix(x_degrees, y_degrees, z_degrees);
        self.transform = self.transform.mul(&rot);
    }

    // Applies the current (possibly uncommitted) transform to a single
    // face without mutating `faces` or resetting the transform. Lets a
    // caller stack several transform calls and read the result back
    // mid-sequence, the way sprite blitting does.
    pub fn transformed_face(&self, index: usize) -> Face {
        let mut face = self.faces[index];
        for vert in &mut face.vertices {
            vert.position = self.transform.mul_vector(&vert.position);
            vert.normal = self.transform.mul_vector(&vert.normal);
        }
        face
    }

    // Folds the accumulated transform into every vertex position/normal and
    // resets the transform to identity.
    pub fn apply_transformations(&mut self) {
        for face in &mut self.faces {
            for vert in &mut face.vertices {
                vert.position = self.transform.mul_vector(&vert.position);
                vert.normal = self.transform.mul_vector(&vert.normal);
            }
        }
        self.transform = Matrix::<4, 4>::identity();
    }
}

pub fn generate_rotation_matrix(x_degrees: f32, y_degrees: f32, z_degrees: f32) -> Matrix<4, 4> {
    let deg_to_rad = PI / 180.0;
    let (sin_x, cos_x) = (x_degrees * deg_to_rad).sin_cos();
    let (sin_y, cos_y) = (y_degrees * deg_to_rad).sin_cos();
    let (sin_z, cos_z) = (z_degrees * deg_to_rad).sin_cos();

    let mut m = Matrix::<4, 4>::new(0.0);
    *m.at_mut(0, 0) = cos_z * cos_y;
    *m.at_mut(0, 1) = (cos_z * sin_y * sin_x) - (sin_z * cos_x);
    *m.at_mut(0, 2) = (cos_z * sin_y * cos_x) + (sin_z * sin_x);
    *m.at_mut(1, 0) = sin_z * cos_y;
    *m.at_mut(1, 1) = (sin_z * sin_y * sin_x) + (cos_z * cos_x);
    *m.at_mut(1, 2) = (sin_z * sin_y * cos_x) - (cos_z * sin_x);
    *m.at_mut(2, 0) = -sin_y;
    *m.at_mut(2, 1) = cos_y * sin_x;
    *m.at_mut(2, 2) = cos_y * cos_x;
    *m.at_mut(3, 3) = 1.0;
    m
}

// Concrete shape of the optional light(s) a TriShaderData may reference;
// generalizes a single hard-coded direction into caller-supplied state.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub direction: Vector<4>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector<4>, intensity: f32) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            intensity,
        }
    }

    // saturate(normal . -direction) * 0.8 + 0.2, the ambient-plus-diffuse
    // term fed into the rasterizer's interpolated light attribute.
    pub fn shade(&self, normal: &Vector<4>) -> f32 {
        let facing = -normal.dot(&self.direction);
        let saturated = facing.clamp(0.0, 1.0);
        (saturated * 0.8 + 0.2) * self.intensity
    }
}

pub struct Camera {
    near: f32,
    far: f32,
    fov_degrees: f32,
    aspect: f32,
    projection: Matrix<4, 4>,
    pub position: Vector<4>,
}

impl Camera {
    pub fn new(near: f32, far: f32, fov_degrees: f32, aspect: f32) -> Self {
        let mut cam = Camera {
            near,
            far,
            fov_degrees,
            aspect,
            projection: Matrix::<4, 4>::new(0.0),
            position: Vector::<4>::zero(),
        };
        cam.regenerate_projection();
        cam
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.regenerate_projection();
    }

    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.regenerate_projection();
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_degrees = fov_degrees;
        self.regenerate_projection();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.regenerate_projection();
    }

    pub fn projection_matrix(&self) -> &Matrix<4, 4> {
        &self.projection
    }

    fn regenerate_projection(&mut self) {
        let deg_to_rad = PI / 180.0;
        let tan_half_fov = (self.fov_degrees * deg_to_rad * 0.5).tan();

        let mut p = Matrix::<4, 4>::new(0.0);
        *p.at_mut(0, 0) = 1.0 / (tan_half_fov * self.aspect);
        *p.at_mut(1, 1) = 1.0 / tan_half_fov;
        *p.at_mut(2, 2) = -(self.far + self.near) / (self.far - self.near);
        *p.at_mut(3, 2) = (-2.0 * self.far * self.near) / (self.far - self.near);
        *p.at_mut(2, 3) = 1.0;
        self.projection = p;
    }

    // Multiplies each vertex by the projection matrix only - no divide.
    // Produces the homogeneous clip-space face the clipper tests against
    // (`|x|<=w`); `perspective_divide` is a separate, later step so the
    // clip test always sees pre-divide coordinates (spec 4.4/4.5).
    pub fn project_face(&self, face: &Face) -> Face {
        let mut out = *face;
        for v in &mut out.vertices {
            v.position = self.projection.mul_vector(&v.position);
        }
        out
    }

    // Divides x,y,z by w for each vertex (when w != 0). Run once per
    // sub-triangle after clipping, never before - clipping needs the
    // pre-divide w to test against.
    pub fn perspective_divide(&self, face: &Face) -> Face {
        let mut out = *face;
        for v in &mut out.vertices {
            let p = v.position;
            if p.w() != 0.0 {
                let inv_w = 1.0 / p.w();
                v.position = Vector::<4>::new([p.x() * inv_w, p.y() * inv_w, p.z() * inv_w, p.w()]);
            }
        }
        out
    }

    // Maps NDC [-1,1] to screen [0,1] for x and y only.
    pub fn scale_xy_to_zero_to_one(&self, face: &mut Face) {
        for v in &mut face.vertices {
            *v.position.x_mut() = (v.position.x() + 1.0) * 0.5;
            *v.position.y_mut() = (v.position.y() + 1.0) * 0.5;
        }
    }

    // Folds the camera's view-space translation into a face; the source's
    // "view matrix" is translation-only, a permitted extension point.
    pub fn translate_by_camera_position(&self, face: &mut Face) {
        for v in &mut face.vertices {
            *v.position.x_mut() -= self.position.x();
            *v.position.y_mut() -= self.position.y();
            *v.position.z_mut() -= self.position.z();
        }
    }
}

// Cull (skip) the face iff normal . view > 0, i.e. the front face points
// away from the camera. Must run after the view transform but before
// perspective divide.
pub fn should_cull(face: &Face, camera_position: &Vector<4>) -> bool {
    let normal = face.calc_normal();
    let vertex = face.vertices[0].position;
    let view_x = vertex.x() - camera_position.x();
    let view_y = vertex.y() - camera_position.y();
    let view_z = vertex.z() - camera_position.z();

    let facing = normal.x() * view_x + normal.y() * view_y + normal.z() * view_z;
    facing > 0.0
}

pub fn create_cube_mesh() -> Mesh {
    // Unit cube centered at the origin, CCW winding per face when viewed
    // from outside, two triangles per face.
    let p = [
        Vector::<4>::point(-0.5, -0.5, -0.5),
        Vector::<4>::point(0.5, -0.5, -0.5),
        Vector::<4>::point(0.5, 0.5, -0.5),
        Vector::<4>::point(-0.5, 0.5, -0.5),
        Vector::<4>::point(-0.5, -0.5, 0.5),
        Vector::<4>::point(0.5, -0.5, 0.5),
        Vector::<4>::point(0.5, 0.5, 0.5),
        Vector::<4>::point(-0.5, 0.5, 0.5),
    ];

    let quad = |a: usize, b: usize, c: usize, d: usize, n: Vector<4>| -> [Face; 2] {
        let uv = [
            Vector::<2>::new([0.0, 0.0]),
            Vector::<2>::new([1.0, 0.0]),
            Vector::<2>::new([1.0, 1.0]),
            Vector::<2>::new([0.0, 1.0]),
        ];
        let va = Vertex::new(p[a], n, uv[0]);
        let vb = Vertex::new(p[b], n, uv[1]);
        let vc = Vertex::new(p[c], n, uv[2]);
        let vd = Vertex::new(p[d], n, uv[3]);
        [Face::new([va, vb, vc]), Face::new([va, vc, vd])]
    };

    let mut faces = Vec::with_capacity(12);
    faces.extend(quad(4, 5, 6, 7, Vector::<4>::new([0.0, 0.0, 1.0, 0.0]))); // +z
    faces.extend(quad(1, 0, 3, 2, Vector::<4>::new([0.0, 0.0, -1.0, 0.0]))); // -z
    faces.extend(quad(0, 4, 7, 3, Vector::<4>::new([-1.0, 0.0, 0.0, 0.0]))); // -x
    faces.extend(quad(5, 1, 2, 6, Vector::<4>::new([1.0, 0.0, 0.0, 0.0]))); // +x
    faces.extend(quad(3, 7, 6, 2, Vector::<4>::new([0.0, 1.0, 0.0, 0.0]))); // +y
    faces.extend(quad(0, 1, 5, 4, Vector::<4>::new([0.0, -1.0, 0.0, 0.0]))); // -y

    Mesh::new(faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_identity_projection_position_unmoved_at_origin() {
        let cam = Camera::new(0.1, 100.0, 90.0, 1.0);
        assert!(cam.projection_matrix().at(2, 3) == 1.0);
    }

    #[test]
    fn project_face_leaves_w_undivided() {
        let cam = Camera::new(0.1, 100.0, 90.0, 1.0);
        let v = Vertex::new(
            Vector::<4>::point(0.0, 0.0, -2.0),
            Vector::<4>::zero(),
            Vector::<2>::new([0.0, 0.0]),
        );
        let face = Face::new([v, v, v]);
        let projected = cam.project_face(&face);
        // w should carry the view-space -z (2.0 here), not 1.0 - the clip
        // test needs this pre-divide value.
        assert!((projected.vertices[0].position.w() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_divide_brings_z_into_ndc_range() {
        let cam = Camera::new(0.1, 100.0, 90.0, 1.0);
        let v = Vertex::new(
            Vector::<4>::point(0.0, 0.0, -2.0),
            Vector::<4>::zero(),
            Vector::<2>::new([0.0, 0.0]),
        );
        let face = Face::new([v, v, v]);
        let projected = cam.project_face(&face);
        let divided = cam.perspective_divide(&projected);
        assert!((divided.vertices[0].position.w() - 2.0).abs() < 1e-4);
        assert!(divided.vertices[0].position.z() > -1.1 && divided.vertices[0].position.z() < 1.1);
    }

    #[test]
    fn cube_mesh_has_twelve_triangles() {
        let mesh = create_cube_mesh();
        assert_eq!(mesh.faces.len(), 12);
    }

    #[test]
    fn should_cull_rejects_back_facing_triangle() {
        // A triangle facing -z, viewed from a camera at the origin looking
        // down -z, should be culled (its front points away from us).
        let v1 = Vertex::new(Vector::<4>::point(0.0, 0.0, -1.0), Vector::<4>::zero(), Vector::<2>::zero());
        let v2 = Vertex::new(Vector::<4>::point(1.0, 0.0, -1.0), Vector::<4>::zero(), Vector::<2>::zero());
        let v3 = Vertex::new(Vector::<4>::point(0.0, 1.0, -1.0), Vector::<4>::zero(), Vector::<2>::zero());
        let face = Face::new([v1, v2, v3]);
        let camera_pos = Vector::<4>::point(0.0, 0.0, 0.0);
        // This winding's normal points toward +z (toward the camera), so it
        // should NOT be culled.
        assert!(!should_cull(&face, &camera_pos));
    }

    #[test]
    fn directional_light_full_facing_is_brightest() {
        let light = DirectionalLight::new(Vector::<4>::new([0.0, 0.0, -1.0, 0.0]), 1.0);
        let normal = Vector::<4>::new([0.0, 0.0, 1.0, 0.0]);
        let shade = light.shade(&normal);
        assert!((shade - 1.0).abs() < 1e-5);
    }
}
