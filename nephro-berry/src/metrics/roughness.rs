//! 粗糙度评分.

use crate::consts::metrics::{ROUGHNESS_HIGH, ROUGHNESS_MODERATE};
use crate::mesh::SurfaceGeometry;
use crate::stats::round_dp;

/// 粗糙度分级.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoughnessGrade {
    /// 接近球形, 表面平滑.
    Low,

    /// 中等不规则.
    Moderate,

    /// 高度结构性不规则.
    High,
}

impl RoughnessGrade {
    /// 由粗糙度评分分级. 下界包含 (1.2 恰好属于 `Moderate`).
    pub fn from_score(score: f64) -> Self {
        if score < ROUGHNESS_MODERATE {
            Self::Low
        } else if score < ROUGHNESS_HIGH {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// 人类可读类别标签.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low irregularity",
            Self::Moderate => "Moderate irregularity",
            Self::High => "High structural irregularity",
        }
    }
}

/// 计算粗糙度: `表面积 / 等体积球面积`, 保留 2 位小数.
///
/// 等体积球面积为 `(36 * pi * volume^2)^(1/3)`. 评分约为 1.0
/// 说明表面接近球形; 超过约 1.5 说明结构性不规则程度较高.
///
/// 包围体积为 0 (退化网格) 时该比值无定义, 返回 `None`;
/// 由调用方决定上报方式, 这里不视为可恐慌情况.
pub fn roughness<M: SurfaceGeometry + ?Sized>(mesh: &M) -> Option<f64> {
    let area = mesh.surface_area();
    let volume = mesh.enclosed_volume_mm3();

    let expected_area = (36.0 * std::f64::consts::PI * volume * volume).cbrt();
    if expected_area <= 0.0 || !expected_area.is_finite() {
        return None;
    }
    Some(round_dp(area / expected_area, 2))
}
