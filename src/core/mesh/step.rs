//! STEP (ISO 10303-21) 读取
//! 用 truck 解析 B-rep 壳体，再三角化为网格

use std::path::Path;

use truck_meshalgo::prelude::*;
use truck_polymesh::PolygonMesh;
use truck_stepio::r#in::Table;

use crate::core::error::MeshError;
use crate::core::models::Mesh;

pub fn load_step(path: &Path) -> Result<Mesh, MeshError> {
    let text = std::fs::read_to_string(path).map_err(|e| MeshError::open(path, e))?;
    parse_step(&text)
}

pub(crate) fn parse_step(text: &str) -> Result<Mesh, MeshError> {
    let exchange = truck_stepio::r#in::ruststep::parser::parse(text)
        .map_err(|e| MeshError::invalid_content(format!("failed to parse STEP file: {e}")))?;

    let Some(data) = exchange.data.first() else {
        return Err(MeshError::invalid_content(
            "STEP file contains no data sections",
        ));
    };
    let table = Table::from_data_section(data);

    let mut mesh = Mesh::new();
    for holder in table.shell.values() {
        let Ok(shell) = table.to_compressed_shell(holder) else {
            tracing::debug!("Skipping STEP shell that failed to convert");
            continue;
        };

        // 先粗分一次求包围盒，再按对角线长度确定容差
        let rough = shell.robust_triangulation(0.01).to_polygon();
        let tolerance = rough.bounding_box().diameter() * 0.001;
        let poly = shell.robust_triangulation(tolerance).to_polygon();

        append_polygon(&poly, &mut mesh);
    }

    if mesh.vertices.is_empty() {
        return Err(MeshError::invalid_content(
            "STEP file contains no geometry or tessellation failed",
        ));
    }
    Ok(mesh)
}

#[allow(clippy::cast_possible_truncation)]
fn append_polygon(poly: &PolygonMesh, mesh: &mut Mesh) {
    let offset = mesh.vertices.len() as u32;
    mesh.vertices
        .extend(poly.positions().iter().map(|p| [p.x, p.y, p.z]));

    let index = |v: &truck_polymesh::StandardVertex| v.pos as u32 + offset;
    for tri in poly.tri_faces() {
        mesh.faces.push([index(&tri[0]), index(&tri[1]), index(&tri[2])]);
    }
    for quad in poly.quad_faces() {
        mesh.faces.push([index(&quad[0]), index(&quad[1]), index(&quad[2])]);
        mesh.faces.push([index(&quad[0]), index(&quad[2]), index(&quad[3])]);
    }
    for polygon in poly.faces().other_faces() {
        let indices: Vec<u32> = polygon.iter().map(index).collect();
        super::fan_triangulate(mesh, &indices);
    }
}
