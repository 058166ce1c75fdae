/*
 * @Date         : 2026-03-02
 * @Description  : GraphInner 核心操作
 */

use super::super::error::GraphError;
use super::super::types::LayerGroup;
use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::param_store::ParamStore;
use crate::nn::shape::DynamicShape;
use crate::nn::var::Init;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    /// 创建一个带固定种子的计算图（参数初始化可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_name_and_seed("default_graph", seed)
    }

    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        let mut graph = Self::with_name(name);
        graph.set_seed(seed);
        graph
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            forward_edges: HashMap::new(),
            next_id: 0,
            rng: None,
            params: ParamStore::new(),
            penalties: Vec::new(),
            layer_groups: Vec::new(),
        }
    }

    // ========== 基础访问器 ==========

    /// 设置/重置图的随机种子
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = Some(StdRng::seed_from_u64(seed));
    }

    pub const fn has_seed(&self) -> bool {
        self.rng.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按创建顺序返回所有节点 ID
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.get_node(id)?.parents().to_vec())
    }

    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    /// 按名称查找节点
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.name() == name)
            .map(NodeHandle::id)
    }

    pub fn get_node_shape(&self, id: NodeId) -> Result<DynamicShape, GraphError> {
        Ok(self.get_node(id)?.expected_shape().clone())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Tensor) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    /// 所有参数节点的元素总数（含不可训练状态）
    pub fn param_count(&self) -> usize {
        self.nodes.values().map(NodeHandle::param_count).sum()
    }

    /// 可训练参数的元素总数
    pub fn trainable_param_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.is_trainable())
            .map(NodeHandle::param_count)
            .sum()
    }

    /// 按 `init` 生成参数值：有种子时使用图的 RNG，否则使用 thread_rng
    pub(in crate::nn::graph) fn init_tensor(
        &mut self,
        init: &Init,
        shape: &[usize],
    ) -> Result<Tensor, GraphError> {
        match self.rng.as_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate_with_rng(shape, &mut rand::thread_rng()),
        }
    }

    // ========== ID/名称生成 ==========

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        // 先递增再返回，第一个节点 ID 是 1
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn is_node_name_taken(&self, name: &str) -> bool {
        self.nodes.values().any(|node| node.name() == name)
    }

    /// 生成不重名的节点名
    ///
    /// 复用参数的第二次构建会产生同名的计算节点，此时追加 `_1`、`_2` 等后缀。
    pub(in crate::nn::graph) fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> String {
        if !base_name.is_empty() && !self.is_node_name_taken(base_name) {
            return base_name.to_string();
        }
        let stem = if base_name.is_empty() { node_type } else { base_name };
        let mut counter = 1;
        loop {
            let name = format!("{stem}_{counter}");
            if !self.is_node_name_taken(&name) {
                return name;
            }
            counter += 1;
        }
    }

    // ========== 层分组相关 ==========

    pub fn layer_groups(&self) -> &[LayerGroup] {
        &self.layer_groups
    }

    /// 注册一个层分组（同名分组只保留第一次注册的）
    pub fn register_layer_group(
        &mut self,
        name: &str,
        layer_type: &str,
        description: &str,
        node_ids: Vec<NodeId>,
    ) {
        if self.layer_groups.iter().any(|g| g.name == name) {
            return;
        }
        self.layer_groups.push(LayerGroup {
            name: name.to_string(),
            layer_type: layer_type.to_string(),
            description: description.to_string(),
            node_ids,
        });
    }
}
