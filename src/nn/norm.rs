/*
 * @Date         : 2026-03-02
 * @Description  : 单层归一化模式与层构建选项
 *
 * 一层只能选择一种归一化（由枚举保证互斥），L2 权重衰减是独立的附加项，
 * 但不能与谱归一化叠加在同一层上。
 */

use super::param_store::Reuse;
use super::updates::UpdateCollection;
use super::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单层的归一化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NormMode {
    #[default]
    None,
    BatchNorm,
    SpectralNorm,
}

impl fmt::Display for NormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::BatchNorm => write!(f, "batch_norm"),
            Self::SpectralNorm => write!(f, "spectral_norm"),
        }
    }
}

/// 归一化模式 + 可选的 L2 权重衰减系数
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerNorm {
    pub mode: NormMode,
    pub weight_decay: Option<f32>,
}

impl LayerNorm {
    pub const fn none() -> Self {
        Self {
            mode: NormMode::None,
            weight_decay: None,
        }
    }

    pub const fn batch_norm() -> Self {
        Self {
            mode: NormMode::BatchNorm,
            weight_decay: None,
        }
    }

    pub const fn spectral_norm() -> Self {
        Self {
            mode: NormMode::SpectralNorm,
            weight_decay: None,
        }
    }

    pub const fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = Some(weight_decay);
        self
    }

    /// 检查组合是否合法
    pub fn validate(&self, scope: &str) -> Result<(), GraphError> {
        match self.weight_decay {
            Some(wd) if !wd.is_finite() || wd < 0.0 => Err(GraphError::InvalidPolicy(format!(
                "层`{scope}`的权重衰减系数必须是非负有限数，得到{wd}"
            ))),
            Some(wd) if wd > 0.0 && self.mode == NormMode::SpectralNorm => {
                Err(GraphError::InvalidPolicy(format!(
                    "层`{scope}`不能同时使用谱归一化和 L2 权重衰减"
                )))
            }
            _ => Ok(()),
        }
    }

    /// 实际生效的 L2 系数（0 视为未启用）
    pub fn l2_coefficient(&self) -> Option<f32> {
        self.weight_decay.filter(|&wd| wd > 0.0)
    }
}

impl fmt::Display for LayerNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.l2_coefficient() {
            Some(wd) => write!(f, "{}+l2({wd})", self.mode),
            None => write!(f, "{}", self.mode),
        }
    }
}

/// `normalized_conv2d` / `normalized_linear` 的公共选项
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOptions {
    pub norm: LayerNorm,
    /// 批归一化是否处于训练模式（更新滑动统计）
    pub training: bool,
    pub reuse: Reuse,
    pub update_collection: UpdateCollection,
    /// 奇异向量估计的滑动系数，1 表示直接替换
    pub beta: f32,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            norm: LayerNorm::none(),
            training: false,
            reuse: Reuse::Create,
            update_collection: UpdateCollection::Inline,
            beta: 1.0,
        }
    }
}

impl LayerOptions {
    pub fn with_norm(mut self, norm: LayerNorm) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_reuse(mut self, reuse: Reuse) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn with_update_collection(mut self, update_collection: UpdateCollection) -> Self {
        self.update_collection = update_collection;
        self
    }

    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }

    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }
}
