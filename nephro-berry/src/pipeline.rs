//! 分析流水线编排.
//!
//! 对外提供两个入口:
//!
//! 1. [`analyze_structure`]: 对已有网格 (扁平缓冲区) 的结构分析.
//! 2. [`analyze_volume`]: 分割体 -> 网格 -> 体积 -> 剂量的完整链路.
//!
//! 每次调用独立处理, 结果记录新建且不可变, 所有权交给上层
//! (例如序列化后返回给请求方); 本 crate 不保留任何分析历史.

use crate::clinical::estimate_dose;
use crate::consts::clinical::{DEFAULT_CREATININE_MG_DL, MM3_PER_CM3};
use crate::consts::RESEARCH_DISCLAIMER;
use crate::extract::{iso_surface, ExtractError, ExtractSpec};
use crate::mesh::{MeshError, SurfaceGeometry, TriMesh};
use crate::metrics::{curvature_variability, roughness, CurvatureGrade, RoughnessGrade};
use crate::stats::round_dp;
use crate::SegVolume;

/// 单次分析请求的错误. 只影响当前请求, 不影响进程.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    /// 网格输入校验失败.
    Mesh(MeshError),

    /// 等值面提取失败.
    Extract(ExtractError),

    /// 网格退化 (包围体积为 0), 粗糙度无定义.
    DegenerateMesh,
}

impl From<MeshError> for AnalyzeError {
    #[inline]
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

impl From<ExtractError> for AnalyzeError {
    #[inline]
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

/// 展平后的网格: 顶点按 `x, y, z` 三元组, 面按索引三元组.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlatMesh {
    /// 顶点坐标序列, 长度为顶点数的 3 倍.
    pub vertices: Vec<f64>,

    /// 面索引序列, 长度为面数的 3 倍.
    pub faces: Vec<u32>,
}

/// 结构分析结果.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StructuralResult {
    /// 粗糙度评分.
    pub roughness: f64,

    /// 粗糙度类别标签.
    pub structural_category: &'static str,

    /// 曲率变异性指数.
    pub cvi: f64,

    /// 曲率变异性类别标签.
    pub curvature_label: &'static str,

    /// 局部曲率均值.
    pub mean_curvature: f64,

    /// 研究用途声明.
    pub message: &'static str,
}

/// 完整流水线结果.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FullResult {
    /// 网格体积 (立方厘米), 保留 2 位小数.
    pub volume_cm3: f64,

    /// 肌酐修正后的 GFR.
    pub gfr_final: f64,

    /// 剂量估计 (mg).
    pub dose_mg: f64,

    /// 回显的血清肌酐输入 (未修约).
    pub creatinine: f64,

    /// 提取出的网格.
    pub mesh: FlatMesh,
}

/// 对已三角化的网格做结构分析.
///
/// `vertices` 与 `faces` 为扁平缓冲区; 任何一个为空或长度不是 3
/// 的倍数时立即返回校验错误, 不产生部分结果.
/// 网格退化 (体积为 0) 时返回 [`AnalyzeError::DegenerateMesh`].
pub fn analyze_structure(
    vertices: &[f64],
    faces: &[u32],
) -> Result<StructuralResult, AnalyzeError> {
    let mesh = TriMesh::from_flat(vertices, faces)?;

    let score = roughness(&mesh).ok_or(AnalyzeError::DegenerateMesh)?;
    let stats = curvature_variability(&mesh);

    Ok(StructuralResult {
        roughness: score,
        structural_category: RoughnessGrade::from_score(score).label(),
        cvi: stats.cvi,
        curvature_label: CurvatureGrade::from_cvi(stats.cvi).label(),
        mean_curvature: stats.mean_curvature,
        message: RESEARCH_DISCLAIMER,
    })
}

/// 对分割体运行完整链路: 提取网格, 计算体积, 估算剂量.
///
/// 体数据过小无法采样时返回 [`AnalyzeError::Extract`].
/// 返回值包含展平的网格, 供上层序列化或继续做结构分析.
pub fn analyze_volume(seg: &SegVolume, creatinine_mg_dl: f64) -> Result<FullResult, AnalyzeError> {
    let mesh = iso_surface(seg, &ExtractSpec::default())?;

    let volume_cm3 = mesh.enclosed_volume_mm3() / MM3_PER_CM3;
    let dose = estimate_dose(volume_cm3, creatinine_mg_dl);
    let (vertices, faces) = mesh.to_flat();

    Ok(FullResult {
        volume_cm3: round_dp(volume_cm3, 2),
        gfr_final: dose.gfr_final,
        dose_mg: dose.dose_mg,
        creatinine: creatinine_mg_dl,
        mesh: FlatMesh { vertices, faces },
    })
}

/// 同 [`analyze_volume`], 使用默认血清肌酐 (1.0 mg/dL).
#[inline]
pub fn analyze_volume_default(seg: &SegVolume) -> Result<FullResult, AnalyzeError> {
    analyze_volume(seg, DEFAULT_CREATININE_MG_DL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// 正四面体的扁平缓冲区.
    fn tetra_flat() -> (Vec<f64>, Vec<u32>) {
        let vertices = vec![
            1.0, 1.0, 1.0, //
            1.0, -1.0, -1.0, //
            -1.0, 1.0, -1.0, //
            -1.0, -1.0, 1.0,
        ];
        let faces = vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2];
        (vertices, faces)
    }

    /// 0/1 球形分割体.
    fn ball_volume(dim: usize, r: f64) -> SegVolume {
        let c = dim as f64 / 2.0;
        let data = Array3::from_shape_fn((dim, dim, dim), |(z, h, w)| {
            let d = [z as f64 - c, h as f64 - c, w as f64 - c];
            if (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt() <= r {
                1.0
            } else {
                0.0
            }
        });
        SegVolume::new(data, [1.0; 3]).unwrap()
    }

    #[test]
    fn test_structure_on_tetrahedron() {
        let (v, f) = tetra_flat();
        let r = analyze_structure(&v, &f).unwrap();

        assert!(r.roughness > 1.0);
        assert_eq!(
            r.structural_category,
            RoughnessGrade::from_score(r.roughness).label()
        );
        // 正四面体完全规则: 所有邻居距离相等.
        assert_eq!(r.cvi, 0.0);
        assert_eq!(r.mean_curvature, 0.0);
        assert_eq!(r.curvature_label, "Low curvature variability (smooth)");
        assert_eq!(r.message, RESEARCH_DISCLAIMER);
    }

    #[test]
    fn test_structure_validation_errors() {
        let (v, f) = tetra_flat();

        let err = analyze_structure(&[], &f).unwrap_err();
        assert_eq!(err, AnalyzeError::Mesh(MeshError::EmptyVertices));

        let err = analyze_structure(&v, &[]).unwrap_err();
        assert_eq!(err, AnalyzeError::Mesh(MeshError::EmptyFaces));

        // 长度 10: 不是 3 的倍数.
        let err = analyze_structure(&v, &[0; 10]).unwrap_err();
        assert_eq!(err, AnalyzeError::Mesh(MeshError::RaggedFaceBuffer(10)));

        let err = analyze_structure(&v[..10], &f).unwrap_err();
        assert_eq!(err, AnalyzeError::Mesh(MeshError::RaggedVertexBuffer(10)));
    }

    #[test]
    fn test_structure_degenerate_mesh() {
        // 单个退化三角形: 体积为 0, 粗糙度无定义.
        let v = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        let err = analyze_structure(&v, &[0, 1, 2]).unwrap_err();
        assert_eq!(err, AnalyzeError::DegenerateMesh);
    }

    #[test]
    fn test_full_pipeline_on_ball() {
        let seg = ball_volume(24, 8.0);
        let r = analyze_volume(&seg, 1.0).unwrap();

        assert!(r.volume_cm3 > 0.0);
        assert_eq!(r.creatinine, 1.0);
        assert_eq!(r.mesh.vertices.len() % 3, 0);
        assert_eq!(r.mesh.faces.len() % 3, 0);
        assert!(!r.mesh.vertices.is_empty());

        // 所有面索引都在范围内.
        let n = (r.mesh.vertices.len() / 3) as u32;
        assert!(r.mesh.faces.iter().all(|&i| i < n));

        // 剂量链与 clinical 模块一致 (剂量由未修约的体积推出).
        let mesh = iso_surface(&seg, &ExtractSpec::default()).unwrap();
        let vol = mesh.enclosed_volume_mm3() / MM3_PER_CM3;
        let d = estimate_dose(vol, 1.0);
        assert_eq!(r.volume_cm3, round_dp(vol, 2));
        assert_eq!(r.gfr_final, d.gfr_final);
        assert_eq!(r.dose_mg, d.dose_mg);
    }

    #[test]
    fn test_full_then_structural() {
        // 完整链路输出的网格可以直接喂给结构分析.
        let seg = ball_volume(24, 8.0);
        let full = analyze_volume_default(&seg).unwrap();
        let s = analyze_structure(&full.mesh.vertices, &full.mesh.faces).unwrap();

        // marching cubes 出的球应当接近光滑.
        assert!(s.roughness < 1.5, "roughness = {}", s.roughness);
    }

    #[test]
    fn test_full_pipeline_volume_too_small() {
        let seg = SegVolume::new(Array3::zeros((1, 4, 4)), [1.0; 3]).unwrap();
        let err = analyze_volume(&seg, 1.0).unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::Extract(ExtractError::VolumeTooSmall((1, 4, 4)))
        );
    }

    #[test]
    fn test_concurrent_requests_agree() {
        // 分析调用之间没有共享可变状态: 并发运行结果一致.
        use std::sync::mpsc;

        let seg = ball_volume(20, 7.0);
        let want = analyze_volume(&seg, 1.0).unwrap();

        let workers = num_cpus::get().max(2);
        let pool = threadpool::ThreadPool::new(workers);
        let (tx, rx) = mpsc::channel();
        for _ in 0..workers {
            let tx = tx.clone();
            let seg = seg.clone();
            pool.execute(move || {
                tx.send(analyze_volume(&seg, 1.0).unwrap()).unwrap();
            });
        }
        drop(tx);

        for got in rx.iter() {
            assert_eq!(got, want);
        }
        pool.join();
    }
}
