//! 三角网格

/// 顶点坐标 + 三角面索引
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// 追加一个三角形 (三个新顶点)
    pub fn push_triangle(&mut self, a: [f64; 3], b: [f64; 3], c: [f64; 3]) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.vertices.len() as u32;
        self.vertices.extend([a, b, c]);
        self.faces.push([base, base + 1, base + 2]);
    }

    /// 第一个越界的面索引
    pub fn first_invalid_index(&self) -> Option<u32> {
        let count = self.vertices.len();
        self.faces
            .iter()
            .flatten()
            .copied()
            .find(|&i| i as usize >= count)
    }

    /// 按坐标轴拆分顶点 (x, y, z)
    pub fn axis_columns(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(self.vertices.len());
        let mut ys = Vec::with_capacity(self.vertices.len());
        let mut zs = Vec::with_capacity(self.vertices.len());
        for [x, y, z] in &self.vertices {
            xs.push(*x);
            ys.push(*y);
            zs.push(*z);
        }
        (xs, ys, zs)
    }

    /// 按角拆分面索引 (i, j, k)
    pub fn face_columns(&self) -> (Vec<u32>, Vec<u32>, Vec<u32>) {
        let mut is = Vec::with_capacity(self.faces.len());
        let mut js = Vec::with_capacity(self.faces.len());
        let mut ks = Vec::with_capacity(self.faces.len());
        for [i, j, k] in &self.faces {
            is.push(*i);
            js.push(*j);
            ks.push(*k);
        }
        (is, js, ks)
    }
}
