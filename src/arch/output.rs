/*
 * @Date         : 2026-03-02
 * @Description  : 结构构建的输出：logits + 延迟更新 + 惩罚项 + 逐层记录
 */

use crate::nn::{
    DynamicShape, Graph, GraphError, LayerNorm, Module, SpectralUpdate, Var, WeightPenalty,
};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Conv2d,
    Linear,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conv2d => write!(f, "Conv2d"),
            Self::Linear => write!(f, "Linear"),
        }
    }
}

/// 一个带参层的构建记录
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecord {
    pub scope: String,
    pub kind: LayerKind,
    pub norm: LayerNorm,
    /// 层输出形状（卷积层为激活前）
    pub output_shape: DynamicShape,
    /// 谱归一化估计的最大奇异值
    pub sigma: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct ArchOutput {
    pub logits: Var,
    /// 按构建顺序排列的延迟 u 更新
    pub updates: Vec<SpectralUpdate>,
    /// 本次构建登记的 L2 惩罚
    pub penalties: Vec<WeightPenalty>,
    pub layers: Vec<LayerRecord>,
}

impl ArchOutput {
    pub fn graph(&self) -> Graph {
        self.logits.get_graph()
    }

    pub fn layer(&self, scope: &str) -> Option<&LayerRecord> {
        self.layers.iter().find(|l| l.scope == scope)
    }

    /// 属于集合 `collection` 的延迟更新
    pub fn updates_in(&self, collection: &str) -> Vec<&SpectralUpdate> {
        self.updates
            .iter()
            .filter(|u| u.collection == collection)
            .collect()
    }

    /// 执行本次构建收集到的全部延迟更新
    pub fn apply_updates(&self) -> Result<(), GraphError> {
        self.graph().apply_updates(&self.updates)
    }

    /// 本次构建登记的 L2 惩罚之和，与主损失分开计算
    pub fn regularization_loss(&self) -> Result<f32, GraphError> {
        let graph = self.graph();
        self.penalties.iter().map(|p| graph.penalty_value(p)).sum()
    }
}

impl Module for ArchOutput {
    fn parameters(&self) -> Vec<Var> {
        let graph = self.graph();
        self.layers
            .iter()
            .filter_map(|layer| graph.param_set(&layer.scope))
            .flat_map(|set| set.node_ids())
            .map(|id| graph.wrap_node_id(id))
            .collect()
    }
}

/// mini-Inception 的输出：两个占位符 + 网络输出
#[derive(Debug, Clone)]
pub struct InceptionOutput {
    /// `in_data`：f32 [?, 28, 28, 3]
    pub input: Var,
    /// `in_labels`：i64 [?]
    pub labels: Var,
    pub output: ArchOutput,
}

impl InceptionOutput {
    pub fn logits(&self) -> &Var {
        &self.output.logits
    }

    pub fn graph(&self) -> Graph {
        self.output.graph()
    }
}
