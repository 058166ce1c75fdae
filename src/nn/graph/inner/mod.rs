/*
 * @Date         : 2026-03-02
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、访问器、ID/名称生成、层分组
 * - node_builders.rs: new_*_node
 * - params.rs: 参数作用域、谱归一化状态更新、权重惩罚
 * - describe.rs: describe/summary
 */

mod core;
mod describe;
mod node_builders;
mod params;

use super::types::LayerGroup;
use crate::nn::nodes::NodeHandle;
use crate::nn::param_store::ParamStore;
use crate::nn::updates::WeightPenalty;
use crate::nn::NodeId;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    pub(in crate::nn::graph) next_id: u64,
    /// 图级别的随机数生成器（用于参数初始化）
    /// None 表示使用 thread_rng（非确定性）
    pub(in crate::nn::graph) rng: Option<StdRng>,
    /// 作用域名 -> 参数集合
    pub(in crate::nn::graph) params: ParamStore,
    /// L2 权重惩罚集合（对应 TF 的 REGULARIZATION_LOSSES）
    pub(in crate::nn::graph) penalties: Vec<WeightPenalty>,
    pub(in crate::nn::graph) layer_groups: Vec<LayerGroup>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
