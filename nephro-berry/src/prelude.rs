//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::volume::{OpenVolumeError, SegVolume, VolumeError};

pub use crate::mesh::{AdjacencyMap, MeshError, SurfaceGeometry, TriMesh};

pub use crate::extract::{iso_surface, ExtractError, ExtractSpec};

pub use crate::metrics::{
    curvature_variability, roughness, CurvatureGrade, CurvatureStats, RoughnessGrade,
};

pub use crate::clinical::{estimate_dose, DoseEstimate};

pub use crate::dosing::{dose_all, dose_for, DoseReport, DrugSpec, PatientProfile, Sex};

pub use crate::pipeline::{
    analyze_structure, analyze_volume, analyze_volume_default, AnalyzeError, FlatMesh, FullResult,
    StructuralResult,
};

pub use crate::consts::RESEARCH_DISCLAIMER;
