//! STL 解析 (二进制与 ASCII)
//!
//! 二进制布局:
//!
//! ```text
//! UINT8[80]    – 文件头
//! UINT32       – 三角形数量
//! foreach triangle
//!     REAL32[3] – 法线 (忽略)
//!     REAL32[3] – 顶点 1
//!     REAL32[3] – 顶点 2
//!     REAL32[3] – 顶点 3
//!     UINT16    – 属性字节数
//! end
//! ```

use std::path::Path;

use crate::core::error::MeshError;
use crate::core::models::Mesh;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

pub fn load_stl(path: &Path) -> Result<Mesh, MeshError> {
    let data = std::fs::read(path).map_err(|e| MeshError::open(path, e))?;
    parse_stl(&data)
}

pub(crate) fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.len() < 6 {
        return Err(MeshError::invalid_content("file too small to be valid STL"));
    }

    if is_binary(data) {
        return parse_binary(data);
    }

    let head = String::from_utf8_lossy(&data[..data.len().min(HEADER_SIZE)]);
    if head.trim_start().starts_with("solid") {
        let text = std::str::from_utf8(data)
            .map_err(|e| MeshError::invalid_content(format!("ASCII STL is not UTF-8: {e}")))?;
        parse_ascii(text)
    } else {
        parse_binary(data)
    }
}

/// 长度与三角形数量吻合，或文件头中含 NUL，即视为二进制
/// (有些二进制 STL 的文件头同样以 "solid" 开头)
fn is_binary(data: &[u8]) -> bool {
    if data.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = read_u32(&data[HEADER_SIZE..HEADER_SIZE + 4]) as usize;
    let expected = count
        .checked_mul(TRIANGLE_SIZE)
        .and_then(|n| n.checked_add(HEADER_SIZE + 4));
    expected == Some(data.len()) || data[..HEADER_SIZE].contains(&0)
}

fn parse_binary(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(MeshError::invalid_content(format!(
            "binary STL header needs {} bytes, got {}",
            HEADER_SIZE + 4,
            data.len()
        )));
    }

    let face_count = read_u32(&data[HEADER_SIZE..HEADER_SIZE + 4]);
    let body = &data[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < face_count as usize {
        return Err(MeshError::InvalidFaceCount {
            expected: face_count,
            got: u32::try_from(available).unwrap_or(u32::MAX),
        });
    }

    let mut mesh = Mesh::with_capacity(face_count as usize * 3, face_count as usize);
    for triangle in body.chunks_exact(TRIANGLE_SIZE).take(face_count as usize) {
        // 跳过法线 (12 字节)
        mesh.push_triangle(
            read_vertex(&triangle[12..24]),
            read_vertex(&triangle[24..36]),
            read_vertex(&triangle[36..48]),
        );
    }
    Ok(mesh)
}

fn read_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

fn read_f32(buf: &[u8]) -> f64 {
    f64::from(f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

fn read_vertex(buf: &[u8]) -> [f64; 3] {
    [read_f32(&buf[0..4]), read_f32(&buf[4..8]), read_f32(&buf[8..12])]
}

fn parse_ascii(text: &str) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    let mut in_loop = false;
    let mut corners: Vec<[f64; 3]> = Vec::with_capacity(3);

    for line in text.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(keyword) = parts.first() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" if in_loop => {
                if parts.len() < 4 {
                    return Err(MeshError::invalid_content(format!(
                        "vertex line has {} coordinates: {line}",
                        parts.len() - 1
                    )));
                }
                corners.push([parts[1].parse()?, parts[2].parse()?, parts[3].parse()?]);
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                if let [a, b, c] = corners.as_slice() {
                    mesh.push_triangle(*a, *b, *c);
                }
                corners.clear();
            }
            // 多实体文件: 多个 solid … endsolid 块依次排列
            "endsolid" => {
                in_loop = false;
                corners.clear();
            }
            _ => {}
        }
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_triangle(header: &[u8]) -> Vec<u8> {
        let mut data = vec![b' '; HEADER_SIZE];
        data[..header.len()].copy_from_slice(header);
        data.extend_from_slice(&1u32.to_le_bytes());
        let floats: [f32; 12] = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        for f in floats {
            data.extend_from_slice(&f.to_le_bytes());
        }
        data.extend_from_slice(&0u16.to_le_bytes());
        data
    }

    #[test]
    fn parses_ascii_facets() {
        let text = b"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test";
        let mesh = parse_stl(text).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.vertices[4], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn reads_every_solid_in_multi_body_file() {
        let text = b"solid body1
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid body1
solid body2
  facet normal 0 0 1
    outer loop
      vertex 5 0 0
      vertex 6 0 0
      vertex 5 1 0
    endloop
  endfacet
endsolid body2
";
        let mesh = parse_stl(text).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertices[3], [5.0, 0.0, 0.0]);
    }

    #[test]
    fn parses_binary_triangle() {
        let mesh = parse_stl(&binary_triangle(b"binary")).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertices[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn binary_with_solid_header_is_still_binary() {
        let mesh = parse_stl(&binary_triangle(b"solid exported by cad")).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn truncated_binary_reports_face_count() {
        let mut data = binary_triangle(b"binary");
        data[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&3u32.to_le_bytes());
        data[0] = 0;
        let err = parse_stl(&data).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidFaceCount {
                expected: 3,
                got: 1
            }
        ));
    }

    #[test]
    fn tiny_file_is_rejected() {
        assert!(parse_stl(b"sol").is_err());
    }

    #[test]
    fn bad_ascii_coordinate_is_an_error() {
        let text = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        assert!(matches!(parse_stl(text), Err(MeshError::ParseFloat(_))));
    }
}
