//! 三角网格数据结构与几何量.

mod adjacency;

pub use adjacency::AdjacencyMap;

/// 网格输入的结构性错误.
///
/// 扁平缓冲区 (3 个浮点一个顶点, 3 个索引一个面) 长度不是 3
/// 的倍数属于结构性畸形, 不是可恢复情况.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// 顶点序列为空.
    EmptyVertices,

    /// 面序列为空.
    EmptyFaces,

    /// 顶点扁平缓冲区长度不是 3 的倍数. 参数为实际长度.
    RaggedVertexBuffer(usize),

    /// 面扁平缓冲区长度不是 3 的倍数. 参数为实际长度.
    RaggedFaceBuffer(usize),

    /// 面引用了越界的顶点索引.
    FaceIndexOutOfBound {
        /// 面编号.
        face: usize,
        /// 越界的顶点索引.
        index: u32,
        /// 实际顶点数.
        vertex_count: usize,
    },
}

/// `a - b`.
#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// 向量叉积.
#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 向量点积.
#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 向量模长.
#[inline]
fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// 单个面的有符号四面体体积贡献 (除 6 之前的标量三重积).
#[inline]
fn signed_triple(verts: &[[f64; 3]], [a, b, c]: [u32; 3]) -> f64 {
    dot(
        verts[a as usize],
        cross(verts[b as usize], verts[c as usize]),
    )
}

/// 单个面的面积的两倍.
#[inline]
fn double_area(verts: &[[f64; 3]], [a, b, c]: [u32; 3]) -> f64 {
    let ab = sub(verts[b as usize], verts[a as usize]);
    let ac = sub(verts[c as usize], verts[a as usize]);
    norm(cross(ab, ac))
}

/// 网格几何能力接口.
///
/// 表面重建与指标算法只依赖该接口, 不依赖具体网格表示.
pub trait SurfaceGeometry {
    /// 顶点坐标 (毫米).
    fn vertices(&self) -> &[[f64; 3]];

    /// 表面积, 以平方毫米为单位. 退化网格返回 0.0.
    fn surface_area(&self) -> f64;

    /// 有符号四面体法 (divergence theorem) 包围体积的绝对值,
    /// 以立方毫米为单位. 空网格返回 0.0.
    ///
    /// # 注意
    ///
    /// 仅当网格封闭且朝向一致时该值才是精确体积; 对不封闭的网格,
    /// 返回值是一个近似 (已知精度限制), 不视为错误.
    /// 本库不做任何朝向修复.
    fn enclosed_volume_mm3(&self) -> f64;

    /// 顶点邻接表: 对每个顶点, 与其共享至少一个面的其它顶点索引.
    fn vertex_adjacency(&self) -> AdjacencyMap;
}

/// 三角网格: 顶点坐标 (毫米) + 三角面索引.
///
/// 允许退化 (零面积 / 零体积) 网格; 所有几何量对退化输入都有定义.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    verts: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// 以成形的顶点与面构建网格. 只校验面索引范围.
    pub fn new(verts: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        for (fi, f) in faces.iter().enumerate() {
            for &idx in f {
                if idx as usize >= verts.len() {
                    return Err(MeshError::FaceIndexOutOfBound {
                        face: fi,
                        index: idx,
                        vertex_count: verts.len(),
                    });
                }
            }
        }
        Ok(Self { verts, faces })
    }

    /// 从扁平缓冲区构建网格并做完整校验.
    ///
    /// `vertices` 按 `x, y, z` 三元组排列, `faces` 按索引三元组排列.
    /// 两个序列都不能为空, 长度都必须是 3 的倍数, 面索引必须在范围内.
    pub fn from_flat(vertices: &[f64], faces: &[u32]) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::EmptyVertices);
        }
        if vertices.len() % 3 != 0 {
            return Err(MeshError::RaggedVertexBuffer(vertices.len()));
        }
        if faces.is_empty() {
            return Err(MeshError::EmptyFaces);
        }
        if faces.len() % 3 != 0 {
            return Err(MeshError::RaggedFaceBuffer(faces.len()));
        }

        let verts = vertices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let faces = faces.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Self::new(verts, faces)
    }

    /// 提取器内部使用: 索引合法性由构造过程保证.
    #[inline]
    pub(crate) fn from_raw(verts: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| f.iter().all(|&i| (i as usize) < verts.len())));
        Self { verts, faces }
    }

    /// 展平成两个数值序列: 顶点按 `x, y, z` 三元组, 面按索引三元组.
    pub fn to_flat(&self) -> (Vec<f64>, Vec<u32>) {
        let verts = self.verts.iter().flatten().copied().collect();
        let faces = self.faces.iter().flatten().copied().collect();
        (verts, faces)
    }

    /// 顶点个数.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    /// 面个数.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// 网格是否没有任何顶点和面.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty() && self.faces.is_empty()
    }

    /// 面索引切片.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }
}

impl SurfaceGeometry for TriMesh {
    #[inline]
    fn vertices(&self) -> &[[f64; 3]] {
        &self.verts
    }

    fn surface_area(&self) -> f64 {
        self.faces
            .iter()
            .map(|&f| double_area(&self.verts, f))
            .sum::<f64>()
            / 2.0
    }

    fn enclosed_volume_mm3(&self) -> f64 {
        let signed: f64 = self
            .faces
            .iter()
            .map(|&f| signed_triple(&self.verts, f))
            .sum::<f64>()
            / 6.0;
        signed.abs()
    }

    fn vertex_adjacency(&self) -> AdjacencyMap {
        AdjacencyMap::from_faces(self.verts.len(), &self.faces)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
    }
}

/// 并行实现块. 这些归约没有跨面可变状态, 可以安全并行;
/// 正确性不依赖该 feature.
#[cfg(feature = "rayon")]
impl TriMesh {
    /// 借助 `rayon`, 并行计算表面积 (平方毫米).
    pub fn surface_area_par(&self) -> f64 {
        self.faces
            .par_iter()
            .map(|&f| double_area(&self.verts, f))
            .sum::<f64>()
            / 2.0
    }

    /// 借助 `rayon`, 并行计算包围体积绝对值 (立方毫米).
    pub fn enclosed_volume_mm3_par(&self) -> f64 {
        let signed: f64 = self
            .faces
            .par_iter()
            .map(|&f| signed_triple(&self.verts, f))
            .sum::<f64>()
            / 6.0;
        signed.abs()
    }
}
