#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 从 3D 肾脏分割体数据 (nii 标量场) 重建三角网格表面,
//! 并在网格上计算体积、粗糙度、曲率变异性等结构指标,
//! 最终给出基于体积的用药估算.
//!
//! 该 crate 目前仅提供 `safe` 接口. 所有分析调用互相独立,
//! 不共享任何可变状态, 可以安全地被上层服务并发调用.
//!
//! # 注意
//!
//! 1. 上游的影像转换与 AI 分割不在本 crate 范围内.
//!   本 crate 只接受已经就绪的标量体数据 (含体素物理分辨率).
//! 2. 在非期望情况下 (编程错误), 程序会直接 panic, 而不会导致内存错误.
//!   As what Rust promises. 可恢复的输入错误一律以 `Result` 返回.
//!
//! # 功能一览
//!
//! ### 等值面提取 (marching cubes) ✅
//!
//! 以 0.5 为阈值、2 为采样步长, 从分割标量场提取三角网格.
//! 输出顶点坐标以毫米为单位.
//!
//! 实现位于 `nephro-berry/src/extract`.
//!
//! ### 网格几何 ✅
//!
//! 三角网格数据结构、扁平缓冲区校验、表面积与有符号体积
//! (divergence theorem)、顶点邻接表.
//!
//! 实现位于 `nephro-berry/src/mesh`.
//!
//! ### 表面不规则度指标 ✅
//!
//! 1. 粗糙度: 网格表面积与等体积球面积之比.
//! 2. 曲率变异性指数 (CVI): 基于顶点邻居距离的局部曲率近似的离散程度.
//!
//! 这两个指标都是近似量, 不是微分几何意义上的精确曲率,
//! 仅作为研究用途的结构信号.
//!
//! 实现位于 `nephro-berry/src/metrics`.
//!
//! ### 用药估算 ✅
//!
//! 1. 由网格体积推出 GFR 估计与剂量 (线性确定性链).
//! 2. 基于 TKV 的五种药物剂量调整 (病人画像 -> kidney ratio).
//!
//! 实现位于 `nephro-berry/src/{clinical, dosing}`.
//!
//! ### 分析流水线 ✅
//!
//! 1. `analyze_structure`: 对已有网格的结构分析 (粗糙度 + CVI).
//! 2. `analyze_volume`: 标量体 -> 网格 -> 体积 -> 剂量的完整链路.
//!
//! 实现位于 `nephro-berry/src/pipeline`.

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

pub mod consts;

mod stats;

mod volume;

pub use volume::{OpenVolumeError, SegVolume, VolumeError};

pub mod mesh;

pub use mesh::{AdjacencyMap, MeshError, SurfaceGeometry, TriMesh};

pub mod extract;

pub use extract::{ExtractError, ExtractSpec};

pub mod metrics;

pub mod clinical;

pub mod dosing;

pub mod pipeline;

pub use pipeline::{analyze_structure, analyze_volume, AnalyzeError, FullResult, StructuralResult};

pub mod prelude;
