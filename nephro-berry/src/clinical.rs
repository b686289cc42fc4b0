//! 由肾体积推出 GFR 估计与剂量的线性确定性链.
//!
//! 这里的 GFR 是由器官体积与临床输入推导的标量,
//! 不是经过医学验证的测量值.

use crate::consts::clinical::{
    DOSE_GFR_OFFSET, DOSE_SLOPE_MG, GFR_PER_CM3, MIN_CREATININE_MG_DL,
};
use crate::stats::round_dp;

/// 剂量估算结果. 所有字段保留 2 位小数.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoseEstimate {
    /// 体积直接换算出的 GFR 估计.
    pub gfr_estimate: f64,

    /// 实际参与计算的血清肌酐 (已应用下限).
    pub safe_creatinine: f64,

    /// 肌酐修正后的 GFR.
    pub gfr_final: f64,

    /// 剂量估计 (mg).
    pub dose_mg: f64,
}

/// 由体积 (立方厘米) 与血清肌酐 (mg/dL) 估算剂量.
///
/// 低于 [`MIN_CREATININE_MG_DL`] 的肌酐输入被静默抬高到下限,
/// 以避免被很小的分母放大; 这是定义好的行为, 不是错误.
/// 除非数输入外没有其它失败模式 (非数输入属于调用方校验范畴).
pub fn estimate_dose(volume_cm3: f64, creatinine_mg_dl: f64) -> DoseEstimate {
    let gfr_estimate = volume_cm3 * GFR_PER_CM3;
    let safe_creatinine = creatinine_mg_dl.max(MIN_CREATININE_MG_DL);
    let factor = 1.0 / safe_creatinine;
    let gfr_final = gfr_estimate * factor;
    let dose_mg = DOSE_SLOPE_MG * (gfr_final + DOSE_GFR_OFFSET);

    DoseEstimate {
        gfr_estimate: round_dp(gfr_estimate, 2),
        safe_creatinine: round_dp(safe_creatinine, 2),
        gfr_final: round_dp(gfr_final, 2),
        dose_mg: round_dp(dose_mg, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_scenario() {
        // 100 cm^3, 肌酐 1.0: gfr 80, 剂量 5 * (80 + 25) = 525.
        let d = estimate_dose(100.0, 1.0);
        assert!(f64_eq(d.gfr_estimate, 80.0));
        assert!(f64_eq(d.safe_creatinine, 1.0));
        assert!(f64_eq(d.gfr_final, 80.0));
        assert!(f64_eq(d.dose_mg, 525.0));
    }

    #[test]
    fn test_creatinine_floor_applied() {
        // 0.1 被抬高到 0.5, 而不是按原值计算.
        let d = estimate_dose(100.0, 0.1);
        assert!(f64_eq(d.safe_creatinine, 0.5));
        assert!(f64_eq(d.gfr_final, 160.0));
        assert!(f64_eq(d.dose_mg, 5.0 * (160.0 + 25.0)));
    }

    #[test]
    fn test_zero_volume() {
        let d = estimate_dose(0.0, 1.0);
        assert!(f64_eq(d.gfr_final, 0.0));
        assert!(f64_eq(d.dose_mg, 125.0));
    }

    #[test]
    fn test_rounding_two_decimals() {
        let d = estimate_dose(1.234, 1.0);
        assert!(f64_eq(d.gfr_estimate, 0.99));
        assert!(f64_eq(d.gfr_final, 0.99));
    }
}
