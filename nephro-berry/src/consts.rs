//! 通用常量.
//!
//! 所有对结果有影响的阈值、下限与 ε 守卫都集中在这里并配有说明,
//! 以便审计其边界行为.

/// 等值面提取参数.
pub mod extract {
    /// 等值面阈值. 分割标量场中 0.5 水平集即组织边界.
    pub const ISO_LEVEL: f32 = 0.5;

    /// 空间均匀采样步长 (每个轴), 用于限制输出网格规模.
    pub const SAMPLE_STRIDE: usize = 2;
}

/// 表面指标的分级阈值与数值守卫.
pub mod metrics {
    /// 粗糙度分级下界: 低于该值为 "Low irregularity".
    pub const ROUGHNESS_MODERATE: f64 = 1.2;

    /// 粗糙度分级下界: 达到该值为 "High structural irregularity".
    pub const ROUGHNESS_HIGH: f64 = 1.5;

    /// CVI 分级下界: 低于该值为 "Low curvature variability".
    pub const CVI_MODERATE: f64 = 0.15;

    /// CVI 分级下界: 达到该值为 "High curvature variability".
    pub const CVI_HIGH: f64 = 0.30;

    /// CVI 分母的 ε 守卫. 仅防止除以零,
    /// 量级上不会把非零结果有偏地推离真实值.
    pub const CVI_EPSILON: f64 = 1e-8;
}

/// 用药估算的线性链常量.
pub mod clinical {
    /// 每立方厘米肾体积对应的 GFR 估计系数.
    pub const GFR_PER_CM3: f64 = 0.8;

    /// 血清肌酐下限 (mg/dL). 低于该值的输入会被静默抬高到此值,
    /// 以避免被很小的分母放大 (属于定义好的行为, 不是错误).
    pub const MIN_CREATININE_MG_DL: f64 = 0.5;

    /// 未提供血清肌酐时的默认值 (mg/dL).
    pub const DEFAULT_CREATININE_MG_DL: f64 = 1.0;

    /// 剂量公式斜率: `dose = DOSE_SLOPE_MG * (gfr + DOSE_GFR_OFFSET)`.
    pub const DOSE_SLOPE_MG: f64 = 5.0;

    /// 剂量公式中 GFR 的偏移量.
    pub const DOSE_GFR_OFFSET: f64 = 25.0;

    /// 立方毫米到立方厘米 (mL) 的换算分母.
    pub const MM3_PER_CM3: f64 = 1000.0;
}

/// 研究用途声明. 随结构分析结果原样返回.
pub const RESEARCH_DISCLAIMER: &str =
    "Structural analysis is for research use only and is not a diagnostic measurement.";
