#![allow(dead_code)]

//---------------------------------------------------------------------------
// OBJ mesh loading - a supplemental leaf module (not named in the
// distilled spec but present in original_source's ObjFileLoader).
//
// Supports the common subset: v/vt/vn/f lines, f indices as bare `v`,
// `v/vt` or `v/vt/vn` triplets (1-based, negative/relative indices are not
// supported). Faces with more than three vertex references are fan
// triangulated, a supplemental robustness enhancement beyond what a
// strictly-triangulated loader would require.
//---------------------------------------------------------------------------

use debug_print::debug_println;

use crate::error::RasterError;
use crate::mesh::{Face, Mesh, Vertex};
use crate::vector::Vector;

struct RawFaceVertex {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

pub fn load_from_file(path: &str) -> Result<Mesh, RasterError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<Mesh, RasterError> {
    let mut positions: Vec<Vector<4>> = Vec::new();
    let mut tex_coords: Vec<Vector<2>> = Vec::new();
    let mut normals: Vec<Vector<4>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line_index, raw_line) in contents.lines().enumerate() {
        let line_number = line_index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("");

        match keyword {
            "v" => {
                let (x, y, z) = parse_xyz(tokens, line_number)?;
                positions.push(Vector::<4>::point(x, y, z));
            }
            "vn" => {
                let (x, y, z) = parse_xyz(tokens, line_number)?;
                normals.push(Vector::<4>::new([x, y, z, 0.0]));
            }
            "vt" => {
                let u = parse_f32(tokens.next(), line_number)?;
                let v = parse_f32(tokens.next(), line_number)?;
                tex_coords.push(Vector::<2>::new([u, v]));
            }
            "f" => {
                let refs: Vec<RawFaceVertex> = tokens
                    .map(|tok| parse_face_vertex(tok, line_number))
                    .collect::<Result<_, _>>()?;

                if refs.len() < 3 {
                    return Err(RasterError::MalformedObj {
                        line: line_number,
                        reason: "face has fewer than 3 vertices".to_string(),
                    });
                }

                for i in 1..refs.len() - 1 {
                    let tri = [&refs[0], &refs[i], &refs[i + 1]];
                    let verts = build_triangle(tri, &positions, &tex_coords, &normals, line_number)?;
                    faces.push(Face::new(verts));
                }
            }
            _ => {}
        }
    }

    debug_println!(
        "parsed obj: {} positions, {} texcoords, {} normals, {} faces",
        positions.len(),
        tex_coords.len(),
        normals.len(),
        faces.len()
    );

    Ok(Mesh::new(faces))
}

fn parse_xyz<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line_number: usize,
) -> Result<(f32, f32, f32), RasterError> {
    let x = parse_f32(tokens.next(), line_number)?;
    let y = parse_f32(tokens.next(), line_number)?;
    let z = parse_f32(tokens.next(), line_number)?;
    Ok((x, y, z))
}

fn parse_f32(token: Option<&str>, line_number: usize) -> Result<f32, RasterError> {
    token
        .ok_or_else(|| RasterError::MalformedObj {
            line: line_number,
            reason: "missing numeric component".to_string(),
        })?
        .parse::<f32>()
        .map_err(|_| RasterError::MalformedObj {
            line: line_number,
            reason: "could not parse float".to_string(),
        })
}

fn parse_face_vertex(token: &str, line_number: usize) -> Result<RawFaceVertex, RasterError> {
    let mut parts = token.split('/');
    let position = parse_index(parts.next(), line_number)?;
    let tex_coord = match parts.next() {
        Some("") | None => None,
        Some(s) => Some(parse_index(Some(s), line_number)?),
    };
    let normal = match parts.next() {
        Some("") | None => None,
        Some(s) => Some(parse_index(Some(s), line_number)?),
    };
    Ok(RawFaceVertex {
        position,
        tex_coord,
        normal,
    })
}

fn parse_index(token: Option<&str>, line_number: usize) -> Result<usize, RasterError> {
    let raw = token.ok_or_else(|| RasterError::MalformedObj {
        line: line_number,
        reason: "missing vertex index".to_string(),
    })?;
    let one_based: usize = raw.parse().map_err(|_| RasterError::MalformedObj {
        line: line_number,
        reason: format!("could not parse vertex index '{raw}'"),
    })?;
    if one_based == 0 {
        return Err(RasterError::MalformedObj {
            line: line_number,
            reason: "vertex index must be >= 1".to_string(),
        });
    }
    Ok(one_based - 1)
}

fn build_triangle(
    refs: [&RawFaceVertex; 3],
    positions: &[Vector<4>],
    tex_coords: &[Vector<2>],
    normals: &[Vector<4>],
    line_number: usize,
) -> Result<[Vertex; 3], RasterError> {
    let fetch_position = |idx: usize| -> Result<Vector<4>, RasterError> {
        positions.get(idx).copied().ok_or_else(|| RasterError::MalformedObj {
            line: line_number,
            reason: format!("position index {} out of range", idx + 1),
        })
    };

    let p0 = fetch_position(refs[0].position)?;
    let p1 = fetch_position(refs[1].position)?;
    let p2 = fetch_position(refs[2].position)?;

    let default_normal = {
        let edge1 = Vector::<4>::new([p1.x() - p0.x(), p1.y() - p0.y(), p1.z() - p0.z(), 1.0]);
        let edge2 = Vector::<4>::new([p2.x() - p0.x(), p2.y() - p0.y(), p2.z() - p0.z(), 1.0]);
        edge1.cross_product(&edge2).normalize()
    };

    let mut verts = [Vertex::new(p0, default_normal, Vector::<2>::zero()); 3];
    for (i, r) in refs.iter().enumerate() {
        let position = fetch_position(r.position)?;
        let normal = match r.normal {
            Some(idx) => *normals.get(idx).ok_or_else(|| RasterError::MalformedObj {
                line: line_number,
                reason: format!("normal index {} out of range", idx + 1),
            })?,
            None => default_normal,
        };
        let tex_coord = match r.tex_coord {
            Some(idx) => *tex_coords.get(idx).ok_or_else(|| RasterError::MalformedObj {
                line: line_number,
                reason: format!("texcoord index {} out of range", idx + 1),
            })?,
            None => Vector::<2>::zero(),
        };
        verts[i] = Vertex::new(position, normal, tex_coord);
    }

    Ok(verts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_triangle() {
        let obj = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let mesh = load_from_str(obj).unwrap();
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn fan_triangulates_quad_faces() {
        let obj = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
";
        let mesh = load_from_str(obj).unwrap();
        assert_eq!(mesh.faces.len(), 2);
    }

    #[test]
    fn parses_vertex_texcoord_normal_triplets() {
        let obj = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";
        let mesh = load_from_str(obj).unwrap();
        assert_eq!(mesh.faces.len(), 1);
        assert!((mesh.faces[0].vertices[0].normal.z() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_range_index_is_a_malformed_obj_error() {
        let obj = "\
v 0.0 0.0 0.0
f 1 2 3
";
        let result = load_from_str(obj);
        assert!(matches!(result, Err(RasterError::MalformedObj { .. })));
    }
}
