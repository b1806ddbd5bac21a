//! PLY 解析 (ASCII / 二进制小端 / 二进制大端)

use std::io::{BufRead, BufReader};
use std::path::Path;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::fan_triangulate;
use crate::core::error::MeshError;
use crate::core::models::Mesh;

pub fn load_ply(path: &Path) -> Result<Mesh, MeshError> {
    let file = std::fs::File::open(path).map_err(|e| MeshError::open(path, e))?;
    parse_ply(&mut BufReader::new(file))
}

pub(crate) fn parse_ply<R: BufRead>(reader: &mut R) -> Result<Mesh, MeshError> {
    let parser = Parser::<DefaultElement>::new();

    let header = parser
        .read_header(reader)
        .map_err(|e| MeshError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(reader, &header)
        .map_err(|e| MeshError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let mut mesh = Mesh::new();

    if let Some(vertices) = payload.get("vertex") {
        mesh.vertices.reserve(vertices.len());
        for (n, element) in vertices.iter().enumerate() {
            let coord = |key: &str| {
                scalar(element, key).ok_or_else(|| {
                    MeshError::invalid_content(format!("vertex {n} has no numeric `{key}`"))
                })
            };
            mesh.vertices.push([coord("x")?, coord("y")?, coord("z")?]);
        }
    }

    if let Some(faces) = payload.get("face") {
        mesh.faces.reserve(faces.len());
        for element in faces {
            fan_triangulate(&mut mesh, &index_list(element));
        }
    }

    Ok(mesh)
}

fn scalar(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(f64::from(*v)),
        Property::UInt(v) => Some(f64::from(*v)),
        Property::Short(v) => Some(f64::from(*v)),
        Property::UShort(v) => Some(f64::from(*v)),
        Property::Char(v) => Some(f64::from(*v)),
        Property::UChar(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// 负索引映射为 u32::MAX，由上层越界检查拒绝
fn index_list(element: &DefaultElement) -> Vec<u32> {
    for key in ["vertex_indices", "vertex_index"] {
        let Some(prop) = element.get(key) else {
            continue;
        };
        return match prop {
            Property::ListInt(v) => v.iter().map(|&i| u32::try_from(i).unwrap_or(u32::MAX)).collect(),
            Property::ListUInt(v) => v.clone(),
            Property::ListShort(v) => v.iter().map(|&i| u32::try_from(i).unwrap_or(u32::MAX)).collect(),
            Property::ListUShort(v) => v.iter().map(|&i| u32::from(i)).collect(),
            Property::ListChar(v) => v.iter().map(|&i| u32::try_from(i).unwrap_or(u32::MAX)).collect(),
            Property::ListUChar(v) => v.iter().map(|&i| u32::from(i)).collect(),
            _ => continue,
        };
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_QUAD: &str = "ply
format ascii 1.0
comment square
element vertex 4
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";

    #[test]
    fn parses_ascii_quad() {
        let mesh = parse_ply(&mut ASCII_QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.vertices[2], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn parses_binary_little_endian() {
        let mut data = b"ply
format binary_little_endian 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
"
        .to_vec();
        for f in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&f.to_le_bytes());
        }
        data.push(3);
        for i in [0i32, 1, 2] {
            data.extend_from_slice(&i.to_le_bytes());
        }

        let mesh = parse_ply(&mut data.as_slice()).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertices[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn garbage_header_is_rejected() {
        let err = parse_ply(&mut "not a ply file\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::InvalidContent(_)));
    }
}
