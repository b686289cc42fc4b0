//! 命令行报告工具.
//!
//! 加载一个 nii 分割文件, 运行完整分析链路并打印人类可读的报告.
//! 若环境变量提供了病人画像, 额外打印 TKV 调整后的药物剂量表.

mod loader;

use nephro_berry::prelude::*;
use std::process::ExitCode;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
fn sep() {
    println!("{SEP}");
}

fn main() -> ExitCode {
    let seg_path = loader::seg_file_from_args_or_env();
    let creatinine = loader::creatinine_from_args_or_env();

    println!("Loading segmentation: {}", seg_path.display());
    let seg = match SegVolume::open(&seg_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Cannot open segmentation file: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    let (z, h, w) = seg.shape();
    let [zm, hm, wm] = seg.spacing();
    println!("Shape: {z} x {h} x {w}, voxel: {zm} x {hm} x {wm} mm");

    let full = match analyze_volume(&seg, creatinine) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Analysis failed: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    sep();
    println!("Volume: {} cm^3", full.volume_cm3);
    println!("GFR (creatinine-adjusted): {}", full.gfr_final);
    println!("Dose estimate: {} mg", full.dose_mg);
    println!("Serum creatinine input: {} mg/dL", full.creatinine);
    println!(
        "Mesh: {} vertices, {} faces",
        full.mesh.vertices.len() / 3,
        full.mesh.faces.len() / 3
    );

    sep();
    match analyze_structure(&full.mesh.vertices, &full.mesh.faces) {
        Ok(s) => {
            println!("Roughness: {} ({})", s.roughness, s.structural_category);
            println!("CVI: {} ({})", s.cvi, s.curvature_label);
            println!("Mean local curvature: {}", s.mean_curvature);
            println!("{}", s.message);
        }
        Err(AnalyzeError::DegenerateMesh) => {
            println!("Mesh is degenerate; structural metrics unavailable.");
        }
        Err(e) => {
            eprintln!("Structural analysis failed: {e:?}");
            return ExitCode::FAILURE;
        }
    }

    // 体积以 mL 计即实测 TKV.
    if let Some(patient) = loader::patient_from_env(full.volume_cm3, full.creatinine) {
        sep();
        println!(
            "TKV-adjusted dosing (expected TKV {:.2} mL, kidney ratio {:.3}):",
            nephro_berry::dosing::expected_tkv_ml(&patient),
            nephro_berry::dosing::kidney_ratio(&patient),
        );
        for r in dose_all(&patient) {
            println!(
                "    {} [{}]: standard {:.1} mg -> adjusted {:.1} mg",
                r.drug.display_name, r.drug.category, r.dose_std_mg, r.dose_tkv_mg
            );
        }
    }

    sep();
    ExitCode::SUCCESS
}
