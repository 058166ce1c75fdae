/*
 * @Date         : 2026-03-02
 * @Description  : 建图过程中产生的延迟状态更新与正则化惩罚项
 */

use super::NodeId;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 谱归一化状态更新的去向
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UpdateCollection {
    /// 构建该层时立即写回 u
    #[default]
    Inline,
    /// 收集到指定名称的集合中，由调用方择机执行
    Named(String),
    /// 丢弃更新，u 保持不变
    NoOps,
}

impl UpdateCollection {
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for UpdateCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => write!(f, "inline"),
            Self::Named(name) => write!(f, "{name}"),
            Self::NoOps => write!(f, "no_ops"),
        }
    }
}

/// 一次尚未执行的奇异向量估计更新：`u ← β·target + (1−β)·u`
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralUpdate {
    pub scope: String,
    pub collection: String,
    /// 被更新的 u 参数节点
    pub u: NodeId,
    /// 本次幂迭代得到的新估计 u'
    pub target: Tensor,
    pub beta: f32,
    /// 本次前向估计的最大奇异值
    pub sigma: f32,
}

/// 某层权重上的 L2 惩罚项：`coefficient · Σw² / 2`
#[derive(Debug, Clone, PartialEq)]
pub struct WeightPenalty {
    pub scope: String,
    pub weights: NodeId,
    pub coefficient: f32,
}
