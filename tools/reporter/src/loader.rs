//! 输入参数加载. 命令行参数优先, 其次环境变量, 最后主目录默认路径.

use nephro_berry::consts::clinical::DEFAULT_CREATININE_MG_DL;
use nephro_berry::dosing::{PatientProfile, Sex};
use std::env;
use std::path::PathBuf;

/// 获取分割文件路径.
///
/// 1. 若存在第一个命令行参数, 则返回其值;
/// 2. 若环境变量 `$NEPHRO_SEG_FILE` 非空, 则返回其值;
/// 3. 否则, 返回 `$HOME/dataset/seg.nii.gz`.
pub fn seg_file_from_args_or_env() -> PathBuf {
    if let Some(p) = env::args().nth(1) {
        return PathBuf::from(p);
    }
    if let Ok(p) = env::var("NEPHRO_SEG_FILE") {
        return PathBuf::from(p);
    }
    let mut p = dirs::home_dir().expect("无法定位用户主目录");
    p.extend(["dataset", "seg.nii.gz"]);
    p
}

/// 获取血清肌酐输入 (mg/dL).
///
/// 1. 若存在第二个命令行参数, 则解析其值;
/// 2. 若环境变量 `$NEPHRO_CREATININE` 非空, 则解析其值;
/// 3. 否则, 返回默认值 1.0.
pub fn creatinine_from_args_or_env() -> f64 {
    if let Some(c) = env::args().nth(2) {
        return c.parse().expect("肌酐参数必须是数字");
    }
    match env::var("NEPHRO_CREATININE") {
        Ok(c) => c.parse().expect("$NEPHRO_CREATININE 必须是数字"),
        Err(_) => DEFAULT_CREATININE_MG_DL,
    }
}

/// 从环境变量组装病人画像. 任何一项缺失或非法都返回 `None`
/// (此时跳过 TKV 剂量调整部分).
///
/// 读取 `$NEPHRO_PATIENT_AGE`, `$NEPHRO_PATIENT_SEX` (male/female),
/// `$NEPHRO_PATIENT_WEIGHT_KG`.
pub fn patient_from_env(tkv_measured_ml: f64, serum_creatinine_mg_dl: f64) -> Option<PatientProfile> {
    let age = env::var("NEPHRO_PATIENT_AGE").ok()?.parse().ok()?;
    let sex = match env::var("NEPHRO_PATIENT_SEX").ok()?.to_lowercase().as_str() {
        "male" | "m" => Sex::Male,
        "female" | "f" => Sex::Female,
        _ => return None,
    };
    let weight_kg = env::var("NEPHRO_PATIENT_WEIGHT_KG").ok()?.parse().ok()?;

    Some(PatientProfile {
        age,
        sex,
        weight_kg,
        serum_creatinine_mg_dl,
        tkv_measured_ml,
    })
}
