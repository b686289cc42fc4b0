//! 3D 分割标量体数据结构.

use std::ops::Index;
use std::path::Path;

use ndarray::{Array3, ArrayView3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::Idx3d;

/// 构建 [`SegVolume`] 时的输入错误.
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// 存在长度为 0 的维度. 参数为实际形状.
    EmptyAxis(Idx3d),

    /// 体素分辨率存在非正分量. 参数为实际分辨率.
    NonPositiveSpacing([f64; 3]),

    /// 源数据不是三维体. 参数为实际维数.
    NotThreeDimensional(usize),
}

/// 打开 nii 分割文件的错误.
#[derive(Debug)]
pub enum OpenVolumeError {
    /// nifti 文件读取/解码错误.
    Nifti(nifti::NiftiError),

    /// 文件能读取, 但内容不构成合法的分割体.
    Malformed(VolumeError),
}

impl From<nifti::NiftiError> for OpenVolumeError {
    #[inline]
    fn from(e: nifti::NiftiError) -> Self {
        Self::Nifti(e)
    }
}

impl From<VolumeError> for OpenVolumeError {
    #[inline]
    fn from(e: VolumeError) -> Self {
        Self::Malformed(e)
    }
}

/// 3D 分割标量场, 按 `(z, H, W)` 顺序存储, 附带体素物理分辨率.
///
/// 标量值通常是分割模型输出的概率或 0/1 标签. 本结构不关心其语义,
/// 只要求等值面阈值对它有意义.
#[derive(Debug, Clone)]
pub struct SegVolume {
    data: Array3<f32>,
    /// `[z_mm, height_mm, width_mm]`, 均为正数.
    spacing: [f64; 3],
}

/// 将 (W, H, z) 转换成 (z, H, W). 以后均按照该模式访问.
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    // [W, H, z]. 体素个数数组.
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

/// 从 header 读取体素分辨率. 任何非正或非有限分量回退到 1.0 mm.
#[inline]
fn get_spacing_from_header(h: &NiftiHeader) -> [f64; 3] {
    let [_, w, h, z, ..] = h.pixdim;
    [z, h, w].map(|raw| {
        let mm = raw as f64;
        if mm.is_finite() && mm > 0.0 {
            mm
        } else {
            1.0
        }
    })
}

impl SegVolume {
    /// 以 `(z, H, W)` 数据和毫米分辨率构建分割体.
    ///
    /// 三个维度都必须非空, 分辨率分量都必须为正.
    pub fn new(data: Array3<f32>, spacing: [f64; 3]) -> Result<Self, VolumeError> {
        let (z, h, w) = data.dim();
        if z == 0 || h == 0 || w == 0 {
            return Err(VolumeError::EmptyAxis((z, h, w)));
        }
        if spacing.iter().any(|&mm| !mm.is_finite() || mm <= 0.0) {
            return Err(VolumeError::NonPositiveSpacing(spacing));
        }
        Ok(Self { data, spacing })
    }

    /// 打开 nii (或 nii.gz) 格式的 3D 分割文件. `path` 为本地路径.
    ///
    /// 体素分辨率取自 header 的 `pixdim`; 缺失或非法分量回退到 1.0 mm.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenVolumeError> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = obj.header().clone();

        let raw = obj.into_volume().into_ndarray()?;
        if raw.ndim() != 3 {
            return Err(VolumeError::NotThreeDimensional(raw.ndim()).into());
        }

        // [W, H, z] -> [z, H, W].
        let raw = raw.permuted_axes([2, 1, 0].as_slice());

        // The nature of nifti data field layout.
        debug_assert!(raw.is_standard_layout());

        // 该操作不会生成 `Err`, 可直接 unwrap.
        let data =
            Array3::<f32>::from_shape_vec(get_shape_from_header(&header), raw.into_raw_vec())
                .unwrap();

        Ok(Self::new(data, get_spacing_from_header(&header))?)
    }

    /// 获取数据形状大小.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取体素分辨率 `[z_mm, height_mm, width_mm]`, 以毫米为单位.
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// 获取空间方向 (相邻 2D 切片的方向) 体素分辨率, 以毫米为单位.
    #[inline]
    pub fn z_mm(&self) -> f64 {
        self.spacing[0]
    }

    /// 获取 height 方向体素分辨率, 以毫米为单位.
    #[inline]
    pub fn height_mm(&self) -> f64 {
        self.spacing[1]
    }

    /// 获取 width 方向体素分辨率, 以毫米为单位.
    #[inline]
    pub fn width_mm(&self) -> f64 {
        self.spacing[2]
    }

    /// 获取体素的实际体积值, 以立方毫米为单位.
    #[inline]
    pub fn voxel(&self) -> f64 {
        self.spacing.iter().product()
    }

    /// 获取数据体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 只读视图.
    #[inline]
    pub fn values(&self) -> ArrayView3<f32> {
        self.data.view()
    }
}

impl Index<Idx3d> for SegVolume {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_seg_volume_invalid_shape() {
        let arr = Array3::<f32>::zeros((0, 4, 4));
        let err = SegVolume::new(arr, [1.0, 1.0, 1.0]).unwrap_err();
        assert_eq!(err, VolumeError::EmptyAxis((0, 4, 4)));
    }

    #[test]
    fn test_seg_volume_invalid_spacing() {
        let arr = Array3::<f32>::zeros((4, 4, 4));
        let err = SegVolume::new(arr, [1.0, 0.0, 1.0]).unwrap_err();
        assert_eq!(err, VolumeError::NonPositiveSpacing([1.0, 0.0, 1.0]));

        let arr = Array3::<f32>::zeros((4, 4, 4));
        let err = SegVolume::new(arr, [1.0, 1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, VolumeError::NonPositiveSpacing(_)));
    }

    #[test]
    fn test_seg_volume_accessors() {
        let arr = Array3::<f32>::zeros((2, 3, 4));
        let v = SegVolume::new(arr, [5.0, 0.7, 0.7]).unwrap();
        assert_eq!(v.shape(), (2, 3, 4));
        assert_eq!(v.size(), 24);
        assert_eq!(v.z_mm(), 5.0);
        assert_eq!(v.height_mm(), 0.7);
        assert_eq!(v.width_mm(), 0.7);
        assert!((v.voxel() - 5.0 * 0.7 * 0.7).abs() < 1e-12);
    }
}
