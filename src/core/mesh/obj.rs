//! Wavefront OBJ 解析 (仅 ASCII)
//!
//! 只读取 `v` 与 `f` 记录; 纹理、法线、材质等一律忽略。

use std::io::{BufRead, BufReader};
use std::path::Path;

use super::fan_triangulate;
use crate::core::error::MeshError;
use crate::core::models::Mesh;

pub fn load_obj(path: &Path) -> Result<Mesh, MeshError> {
    let file = std::fs::File::open(path).map_err(|e| MeshError::open(path, e))?;
    parse_obj(BufReader::new(file))
}

pub(crate) fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    let mut polygon: Vec<u32> = Vec::with_capacity(4);

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let coords = parts
                    .take(3)
                    .map(str::parse::<f64>)
                    .collect::<Result<Vec<_>, _>>()?;
                let &[x, y, z] = coords.as_slice() else {
                    return Err(MeshError::invalid_content(format!(
                        "line {}: vertex needs 3 coordinates",
                        number + 1
                    )));
                };
                mesh.vertices.push([x, y, z]);
            }
            Some("f") => {
                polygon.clear();
                for token in parts {
                    polygon.push(resolve_index(token, mesh.vertex_count(), number + 1)?);
                }
                if polygon.len() < 3 {
                    return Err(MeshError::invalid_content(format!(
                        "line {}: face needs at least 3 vertices",
                        number + 1
                    )));
                }
                fan_triangulate(&mut mesh, &polygon);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// `i`, `i/t`, `i//n`, `i/t/n`; 负数表示相对当前已读顶点的位置
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32, MeshError> {
    let raw = token.split('/').next().unwrap_or_default();
    let value: i64 = raw.parse()?;

    let zero_based = match value {
        0 => None,
        v if v > 0 => Some(v - 1),
        v => i64::try_from(vertex_count).ok().map(|count| count + v),
    };

    zero_based
        .filter(|&i| i >= 0)
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| {
            MeshError::invalid_content(format!("line {line}: invalid vertex index {token}"))
        })
}
