//! 曲率变异性估计.
//!
//! 对每个至少有 2 个邻居的顶点, 以 "邻居距离的标准差 / 均值"
//! 作为局部曲率近似, 再统计全网格上这些近似值的离散程度.
//!
//! # 注意
//!
//! 该近似不是微分几何意义上的曲率, 只是一个表面不规则度信号,
//! 不应被解读为具有临床精度.

use crate::consts::metrics::{CVI_EPSILON, CVI_HIGH, CVI_MODERATE};
use crate::mesh::SurfaceGeometry;
use crate::stats::{mean, round_dp, std_pop};

/// 曲率变异性统计结果.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureStats {
    /// 曲率变异性指数: 局部曲率的标准差 / (均值 + ε), 保留 3 位小数.
    pub cvi: f64,

    /// 局部曲率的算术平均值, 保留 3 位小数.
    pub mean_curvature: f64,
}

impl CurvatureStats {
    /// 空结果: 没有任何顶点产生有效局部曲率时的定义值.
    #[inline]
    pub(crate) const fn empty() -> Self {
        Self {
            cvi: 0.0,
            mean_curvature: 0.0,
        }
    }
}

/// 曲率变异性分级.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CurvatureGrade {
    /// 平滑表面.
    Low,

    /// 中等表面变化.
    Moderate,

    /// 高变异性, 可能存在异常表面.
    High,
}

impl CurvatureGrade {
    /// 由 CVI 分级. 下界包含 (0.30 恰好属于 `High`).
    pub fn from_cvi(cvi: f64) -> Self {
        if cvi < CVI_MODERATE {
            Self::Low
        } else if cvi < CVI_HIGH {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// 人类可读类别标签.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low curvature variability (smooth)",
            Self::Moderate => "Moderate surface variation",
            Self::High => "High curvature variability (possible abnormal surface)",
        }
    }
}

/// 顶点 `v` 的局部曲率近似.
///
/// 邻居少于 2 个或邻居距离均值恰好为 0 的顶点不产生统计量
/// (返回 `None`, 不计入, 也不默认为 0).
fn local_curvature(verts: &[[f64; 3]], v: usize, neighbours: &[u32]) -> Option<f64> {
    if neighbours.len() < 2 {
        return None;
    }
    let center = verts[v];
    let dists: Vec<f64> = neighbours
        .iter()
        .map(|&n| {
            let p = verts[n as usize];
            let d = [p[0] - center[0], p[1] - center[1], p[2] - center[2]];
            (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
        })
        .collect();

    let m = mean(&dists);
    if m == 0.0 {
        return None;
    }
    Some(std_pop(&dists) / m)
}

/// 对收集到的局部曲率做汇总统计.
fn summarize(locals: &[f64]) -> CurvatureStats {
    if locals.is_empty() {
        // 空网格或所有顶点都被排除: 定义为零结果, 不是错误.
        return CurvatureStats::empty();
    }
    let mean_curvature = mean(locals);
    let cvi = std_pop(locals) / (mean_curvature + CVI_EPSILON);
    CurvatureStats {
        cvi: round_dp(cvi, 3),
        mean_curvature: round_dp(mean_curvature, 3),
    }
}

/// 计算网格的曲率变异性统计.
///
/// 邻接表在本次调用内构建并在返回后丢弃. 邻居列表有序,
/// 因此在同一网格上的重复调用得到逐位相同的结果.
pub fn curvature_variability<M: SurfaceGeometry + ?Sized>(mesh: &M) -> CurvatureStats {
    let verts = mesh.vertices();
    let adjacency = mesh.vertex_adjacency();

    let locals: Vec<f64> = (0..verts.len())
        .filter_map(|v| local_curvature(verts, v, adjacency.neighbours(v)))
        .collect();
    summarize(&locals)
}

/// 借助 `rayon` 并行计算每个顶点的局部曲率.
///
/// 逐顶点计算互相独立 (embarrassingly parallel), 收集保持顶点顺序,
/// 汇总仍为串行, 结果与串行版本逐位一致.
#[cfg(feature = "rayon")]
pub fn curvature_variability_par<M: SurfaceGeometry + Sync + ?Sized>(mesh: &M) -> CurvatureStats {
    use rayon::iter::{IntoParallelIterator, ParallelIterator};

    let verts = mesh.vertices();
    let adjacency = mesh.vertex_adjacency();

    let locals: Vec<f64> = (0..verts.len())
        .into_par_iter()
        .filter_map(|v| local_curvature(verts, v, adjacency.neighbours(v)))
        .collect();
    summarize(&locals)
}
