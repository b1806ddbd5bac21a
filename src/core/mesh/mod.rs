//! 网格文件解析
//!
//! - **STL**: 二进制与 ASCII
//! - **OBJ**: 仅 ASCII，多边形按扇形三角化
//! - **PLY**: 二进制与 ASCII (ply-rs)
//! - **STEP**: truck 解析 B-rep 后三角化

mod obj;
mod ply;
mod step;
mod stl;

pub use obj::load_obj;
pub use ply::load_ply;
pub use step::load_step;
pub use stl::load_stl;

use std::path::Path;

use crate::core::error::MeshError;
use crate::core::models::{Mesh, SupportedFormat};

/// 按格式解析网格，并校验面索引
pub fn load_mesh(path: &Path, format: SupportedFormat) -> Result<Mesh, MeshError> {
    let mesh = match format {
        SupportedFormat::Stl => load_stl(path)?,
        SupportedFormat::Obj => load_obj(path)?,
        SupportedFormat::Ply => load_ply(path)?,
        SupportedFormat::Step => load_step(path)?,
        SupportedFormat::Glb | SupportedFormat::Gltf => {
            return Err(MeshError::UnsupportedFormat("glTF"))
        }
    };
    validate(mesh)
}

fn validate(mesh: Mesh) -> Result<Mesh, MeshError> {
    if mesh.faces.is_empty() {
        return Err(MeshError::Empty);
    }
    if let Some(index) = mesh.first_invalid_index() {
        return Err(MeshError::IndexOutOfRange {
            index,
            vertex_count: mesh.vertex_count(),
        });
    }
    Ok(mesh)
}

/// 把多边形按扇形拆成三角形
pub(crate) fn fan_triangulate(mesh: &mut Mesh, polygon: &[u32]) {
    if polygon.len() < 3 {
        return;
    }
    for i in 1..polygon.len() - 1 {
        mesh.faces.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}
