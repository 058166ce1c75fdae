/*
 * DynamicShape: 支持动态维度的形状系统
 *
 * 类似 TensorFlow 占位符的 (None, 28, 28, 3) 设计：batch 维度在建图时未知，
 * 空间维度与通道数必须是确定的（它们决定了参数形状）。
 *
 * # 示例
 * ```
 * use spectral_arch::nn::DynamicShape;
 *
 * let images = DynamicShape::with_dynamic_batch(&[28, 28, 3]);
 * assert_eq!(images.to_string(), "[?, 28, 28, 3]");
 * assert_eq!(images.channels(), Some(3));
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 维度值：Some(n) 表示固定值 n，None 表示动态（任意值）
pub type Dim = Option<usize>;

/// 动态形状：支持动态维度的形状表示
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicShape {
    dims: Vec<Dim>,
}

impl DynamicShape {
    pub fn new(dims: &[Dim]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// 从固定形状创建（所有维度都是确定的）
    pub fn fixed(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().map(|&d| Some(d)).collect(),
        }
    }

    /// 创建一个动态 batch 的形状：第一维是 None，其余维度固定
    pub fn with_dynamic_batch(feature_dims: &[usize]) -> Self {
        let mut dims = vec![None];
        dims.extend(feature_dims.iter().map(|&d| Some(d)));
        Self { dims }
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// 获取指定维度的值（动态维度或越界都返回 None）
    pub fn dim(&self, index: usize) -> Dim {
        self.dims.get(index).copied().flatten()
    }

    /// batch 维度（第一维）
    pub fn batch(&self) -> Dim {
        self.dim(0)
    }

    /// 通道维度（NHWC 的最后一维）
    pub fn channels(&self) -> Dim {
        self.dims.last().copied().flatten()
    }

    /// 非 batch 维度的元素个数；任一特征维度是动态的则返回 None
    pub fn feature_len(&self) -> Option<usize> {
        self.dims
            .iter()
            .skip(1)
            .try_fold(1usize, |acc, d| d.map(|n| acc * n))
    }

    /// 转换为固定形状向量（如果有任何动态维度，返回 None）
    pub fn to_vec_fixed(&self) -> Option<Vec<usize>> {
        self.dims.iter().copied().collect()
    }

    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// 转换为用于显示的字符串（动态维度显示为 ?）
    pub fn to_display_string(&self) -> String {
        let parts: Vec<String> = self
            .dims
            .iter()
            .map(|d| match d {
                Some(n) => n.to_string(),
                None => "?".to_string(),
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

impl fmt::Display for DynamicShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&[usize]> for DynamicShape {
    fn from(shape: &[usize]) -> Self {
        DynamicShape::fixed(shape)
    }
}

impl From<Vec<usize>> for DynamicShape {
    fn from(shape: Vec<usize>) -> Self {
        DynamicShape::fixed(&shape)
    }
}

/// 卷积 / 池化的填充方式（TensorFlow 语义）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Padding {
    /// 输出尺寸 = ceil(输入 / 步长)
    #[default]
    Same,
    /// 输出尺寸 = floor((输入 - 窗口) / 步长) + 1，窗口必须落在输入内
    Valid,
}

impl Padding {
    /// 计算单个空间维度的输出尺寸；窗口放不下时返回 None
    pub fn output_len(self, input: usize, window: usize, stride: usize) -> Option<usize> {
        if stride == 0 || window == 0 || input == 0 {
            return None;
        }
        match self {
            Self::Same => Some(input.div_ceil(stride)),
            Self::Valid => input.checked_sub(window).map(|rest| rest / stride + 1),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Same => write!(f, "SAME"),
            Self::Valid => write!(f, "VALID"),
        }
    }
}
