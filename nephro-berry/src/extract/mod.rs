//! 等值面提取 (marching cubes).
//!
//! 对分割标量场在固定阈值处提取三角网格: 每个由 8 个相邻采样点构成的
//! 基本单元, 查表确定被水平集穿过的边, 线性插值出交点, 再把逐单元的
//! 三角形拼接成单一网格. 共享边上的交点会被焊接, 输出索引化网格.

mod tables;

use std::collections::HashMap;
use std::mem;

use itertools::iproduct;

use crate::consts::extract::{ISO_LEVEL, SAMPLE_STRIDE};
use crate::{Idx3d, SegVolume, TriMesh};
use tables::{EDGE_ENDPOINTS, EDGE_TABLE, TRI_TABLE};

/// 等值面提取错误.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// 某个轴上的采样点少于 2 个 (marching cubes 需要 2x2x2 邻域).
    /// 参数为实际形状.
    VolumeTooSmall(Idx3d),
}

/// 提取参数: 阈值与采样步长.
#[derive(Debug, Clone, Copy)]
pub struct ExtractSpec {
    level: f32,
    stride: usize,
}

impl ExtractSpec {
    /// 构建提取参数. `level` 必须有限, `stride` 至少为 1, 否则 panic.
    pub fn new(level: f32, stride: usize) -> Self {
        assert!(level.is_finite(), "阈值必须是有限值");
        assert!(stride >= 1, "步长至少为 1");
        Self { level, stride }
    }

    /// 等值面阈值.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// 采样步长.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl Default for ExtractSpec {
    /// 流水线使用的固定参数: 阈值 0.5, 步长 2.
    #[inline]
    fn default() -> Self {
        Self::new(ISO_LEVEL, SAMPLE_STRIDE)
    }
}

/// 在 `spec` 参数下提取 `seg` 的等值面网格.
///
/// 顶点坐标为 `原始索引 * 体素分辨率`, 即毫米单位, 按 `(z, H, W)`
/// 轴顺序给出. 整体高于或低于阈值的体数据产生空网格 (不是错误).
///
/// 任何轴上的采样点少于 2 个时返回 [`ExtractError::VolumeTooSmall`].
pub fn iso_surface(seg: &SegVolume, spec: &ExtractSpec) -> Result<TriMesh, ExtractError> {
    let (z, h, w) = seg.shape();
    if z < 2 || h < 2 || w < 2 {
        return Err(ExtractError::VolumeTooSmall((z, h, w)));
    }
    Ok(IsoSurfaceImp::new(seg, spec).run())
}

/// 单次提取所维护的状态. 随调用结束丢弃.
struct IsoSurfaceImp<'a> {
    seg: &'a SegVolume,
    level: f32,
    stride: usize,
    verts: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    /// 网格边 (规范化端点对) 到已焊接顶点的映射.
    edge_cache: HashMap<(Idx3d, Idx3d), u32>,
}

impl<'a> IsoSurfaceImp<'a> {
    fn new(seg: &'a SegVolume, spec: &ExtractSpec) -> Self {
        Self {
            seg,
            level: spec.level,
            stride: spec.stride,
            verts: Vec::with_capacity(256),
            faces: Vec::with_capacity(512),
            edge_cache: HashMap::with_capacity(256),
        }
    }

    fn run(mut self) -> TriMesh {
        let (z, h, w) = self.seg.shape();
        let zs: Vec<usize> = (0..z).step_by(self.stride).collect();
        let hs: Vec<usize> = (0..h).step_by(self.stride).collect();
        let ws: Vec<usize> = (0..w).step_by(self.stride).collect();

        for (zw, hw, ww) in iproduct!(zs.windows(2), hs.windows(2), ws.windows(2)) {
            self.march_cell((zw[0], zw[1]), (hw[0], hw[1]), (ww[0], ww[1]));
        }

        TriMesh::from_raw(self.verts, self.faces)
    }

    /// 处理一个基本单元.
    fn march_cell(&mut self, (z0, z1): (usize, usize), (h0, h1): (usize, usize), (w0, w1): (usize, usize)) {
        // 经典角编号: 0..=3 在下层 (z0), 4..=7 在上层 (z1).
        let corners: [Idx3d; 8] = [
            (z0, h0, w0),
            (z0, h0, w1),
            (z0, h1, w1),
            (z0, h1, w0),
            (z1, h0, w0),
            (z1, h0, w1),
            (z1, h1, w1),
            (z1, h1, w0),
        ];

        let mut vals = [0.0f32; 8];
        let mut cube_index = 0usize;
        for (i, &c) in corners.iter().enumerate() {
            vals[i] = self.seg[c];
            if vals[i] < self.level {
                cube_index |= 1 << i;
            }
        }

        let crossed = EDGE_TABLE[cube_index];
        if crossed == 0 {
            // 整个单元在同一侧.
            return;
        }

        let mut edge_verts = [u32::MAX; 12];
        for (e, slot) in edge_verts.iter_mut().enumerate() {
            if crossed & (1 << e) != 0 {
                *slot = self.edge_vertex(&corners, &vals, e);
            }
        }

        for tri in TRI_TABLE[cube_index].chunks_exact(3) {
            if tri[0] < 0 {
                break;
            }
            self.faces.push([
                edge_verts[tri[0] as usize],
                edge_verts[tri[1] as usize],
                edge_verts[tri[2] as usize],
            ]);
        }
    }

    /// 取得边 `e` 上的交点顶点索引, 必要时插值并登记.
    ///
    /// 端点按网格索引升序规范化, 使相邻单元对同一条边得到
    /// 同一个顶点 (焊接), 且结果与单元遍历顺序无关.
    fn edge_vertex(&mut self, corners: &[Idx3d; 8], vals: &[f32; 8], e: usize) -> u32 {
        let (a, b) = EDGE_ENDPOINTS[e];
        let (mut ga, mut gb) = (corners[a], corners[b]);
        let (mut va, mut vb) = (vals[a], vals[b]);
        if gb < ga {
            mem::swap(&mut ga, &mut gb);
            mem::swap(&mut va, &mut vb);
        }

        if let Some(&idx) = self.edge_cache.get(&(ga, gb)) {
            return idx;
        }

        let t = if (vb - va).abs() < 1e-6 {
            0.5
        } else {
            ((self.level - va) / (vb - va)) as f64
        };
        let pa = self.to_mm(ga);
        let pb = self.to_mm(gb);
        let p = [
            pa[0] + t * (pb[0] - pa[0]),
            pa[1] + t * (pb[1] - pa[1]),
            pa[2] + t * (pb[2] - pa[2]),
        ];

        let idx = self.verts.len() as u32;
        self.verts.push(p);
        self.edge_cache.insert((ga, gb), idx);
        idx
    }

    /// 网格索引 -> 毫米坐标.
    #[inline]
    fn to_mm(&self, (z, h, w): Idx3d) -> [f64; 3] {
        let [zm, hm, wm] = self.seg.spacing();
        [z as f64 * zm, h as f64 * hm, w as f64 * wm]
    }
}
