//! 基于 TKV (total kidney volume) 的药物剂量调整.
//!
//! 由病人画像推出期望肾体积, 与实测体积之比 (kidney ratio)
//! 用于调整按体重计算的标准剂量.

use ordered_float::OrderedFloat;

/// 病人性别.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Sex {
    /// 男性.
    Male,

    /// 女性.
    Female,
}

/// 病人画像.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatientProfile {
    /// 年龄 (岁).
    pub age: u32,

    /// 性别.
    pub sex: Sex,

    /// 体重 (kg).
    pub weight_kg: f64,

    /// 血清肌酐 (mg/dL). 仅随报告回显, 不参与 TKV 调整.
    pub serum_creatinine_mg_dl: f64,

    /// 实测 TKV (mL), 通常来自网格体积.
    pub tkv_measured_ml: f64,
}

/// 药物预设: 标准剂量按 `体重 * mg_per_kg` 计算.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DrugSpec {
    /// 标识符.
    pub id: &'static str,

    /// 展示名.
    pub display_name: &'static str,

    /// 类别.
    pub category: &'static str,

    /// 标准剂量系数 (mg/kg). 区间型药物取区间中值.
    pub mg_per_kg: f64,
}

/// 内置的五种药物预设.
pub const DRUG_PRESETS: [DrugSpec; 5] = [
    DrugSpec {
        id: "cyclophosphamide",
        display_name: "Cyclophosphamide",
        category: "chemo",
        mg_per_kg: 12.5,
    },
    DrugSpec {
        id: "vancomycin",
        display_name: "Vancomycin",
        category: "antibiotic",
        mg_per_kg: 17.5,
    },
    DrugSpec {
        id: "amikacin",
        display_name: "Amikacin",
        category: "antibiotic",
        mg_per_kg: 15.0,
    },
    DrugSpec {
        id: "enoxaparin",
        display_name: "Enoxaparin",
        category: "anticoagulant",
        mg_per_kg: 1.0,
    },
    DrugSpec {
        id: "ketamine",
        display_name: "Ketamine",
        category: "anesthesia",
        mg_per_kg: 1.25,
    },
];

/// 按标识符或展示名查找预设 (大小写不敏感).
pub fn drug_by_id(id: &str) -> Option<&'static DrugSpec> {
    let lower = id.to_lowercase();
    DRUG_PRESETS
        .iter()
        .find(|d| d.id == lower || d.display_name.to_lowercase() == lower)
}

/// 期望 TKV (mL): `base * sexF * ageF * wtF`.
///
/// `base` 为 170 (男) / 150 (女) mL; `sexF` 为 1.0 / 0.90;
/// `ageF = 1 - max(0, age - 40) * 0.01`;
/// `wtF = 1 + 0.003 * (weight_kg - 70)`.
pub fn expected_tkv_ml(p: &PatientProfile) -> f64 {
    let (base, sex_f) = match p.sex {
        Sex::Male => (170.0, 1.0),
        Sex::Female => (150.0, 0.90),
    };
    let age_f = 1.0 - (p.age.saturating_sub(40)) as f64 * 0.01;
    let wt_f = 1.0 + 0.003 * (p.weight_kg - 70.0);
    base * sex_f * age_f * wt_f
}

/// kidney ratio: 实测 TKV / 期望 TKV.
#[inline]
pub fn kidney_ratio(p: &PatientProfile) -> f64 {
    p.tkv_measured_ml / expected_tkv_ml(p)
}

/// 单种药物的剂量报告.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoseReport {
    /// 药物预设.
    pub drug: &'static DrugSpec,

    /// 按体重的标准剂量 (mg).
    pub dose_std_mg: f64,

    /// 期望 TKV (mL).
    pub tkv_expected_ml: f64,

    /// kidney ratio.
    pub kidney_ratio: f64,

    /// TKV 调整后的剂量 (mg): `dose_std * kidney_ratio`.
    pub dose_tkv_mg: f64,
}

/// 计算单种药物的剂量报告.
pub fn dose_for(drug: &'static DrugSpec, p: &PatientProfile) -> DoseReport {
    let dose_std_mg = p.weight_kg * drug.mg_per_kg;
    let tkv_expected_ml = expected_tkv_ml(p);
    let kidney_ratio = p.tkv_measured_ml / tkv_expected_ml;
    DoseReport {
        drug,
        dose_std_mg,
        tkv_expected_ml,
        kidney_ratio,
        dose_tkv_mg: dose_std_mg * kidney_ratio,
    }
}

/// 计算全部预设药物的剂量报告, 按调整后剂量降序排列.
pub fn dose_all(p: &PatientProfile) -> Vec<DoseReport> {
    let mut reports: Vec<DoseReport> = DRUG_PRESETS.iter().map(|d| dose_for(d, p)).collect();
    reports.sort_by_key(|r| std::cmp::Reverse(OrderedFloat(r.dose_tkv_mg)));
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample_patient() -> PatientProfile {
        PatientProfile {
            age: 45,
            sex: Sex::Male,
            weight_kg: 80.0,
            serum_creatinine_mg_dl: 1.1,
            tkv_measured_ml: 340.0,
        }
    }

    #[test]
    fn test_expected_tkv() {
        // 170 * 1.0 * 0.95 * 1.03 = 166.345.
        let p = sample_patient();
        assert!(f64_eq(expected_tkv_ml(&p), 166.345));
    }

    #[test]
    fn test_age_factor_clamped_below_forty() {
        let mut p = sample_patient();
        p.age = 30;
        // 40 岁以下不打折.
        assert!(f64_eq(expected_tkv_ml(&p), 170.0 * 1.03));
    }

    #[test]
    fn test_female_factors() {
        let mut p = sample_patient();
        p.sex = Sex::Female;
        assert!(f64_eq(expected_tkv_ml(&p), 150.0 * 0.90 * 0.95 * 1.03));
    }

    #[test]
    fn test_dose_for_vancomycin() {
        let p = sample_patient();
        let drug = drug_by_id("Vancomycin").unwrap();
        let r = dose_for(drug, &p);
        assert!(f64_eq(r.dose_std_mg, 80.0 * 17.5));
        assert!(f64_eq(r.kidney_ratio, 340.0 / 166.345));
        assert!(f64_eq(r.dose_tkv_mg, r.dose_std_mg * r.kidney_ratio));
    }

    #[test]
    fn test_dose_all_sorted_descending() {
        let reports = dose_all(&sample_patient());
        assert_eq!(reports.len(), DRUG_PRESETS.len());
        for w in reports.windows(2) {
            assert!(w[0].dose_tkv_mg >= w[1].dose_tkv_mg);
        }
        // 最大 mg/kg 的药物排最前.
        assert_eq!(reports[0].drug.id, "vancomycin");
    }

    #[test]
    fn test_drug_lookup_case_insensitive() {
        assert!(drug_by_id("KETAMINE").is_some());
        assert!(drug_by_id("ketamine").is_some());
        assert!(drug_by_id("aspirin").is_none());
    }
}
