//! 网格表面不规则度指标.
//!
//! 两个互相独立的指标, 顺序无关:
//!
//! 1. 粗糙度 (roughness): 表面积与等体积球面积之比.
//! 2. 曲率变异性指数 (CVI): 顶点局部曲率近似的归一化离散程度.

mod curvature;
mod roughness;

pub use curvature::{curvature_variability, CurvatureGrade, CurvatureStats};
pub use roughness::{roughness, RoughnessGrade};

#[cfg(feature = "rayon")]
pub use curvature::curvature_variability_par;
