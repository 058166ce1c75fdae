/*
 * @Date         : 2026-03-02
 * @Description  : GraphInner 节点构建方法（new_*_node）
 *
 * 每个构建方法先用父节点推断并校验输出形状，校验通过后才把节点加入图中，
 * 因此失败的构建不会留下半成品节点。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::raw_node::{
    BatchNorm, Concat, Conv2d, Flatten, Input, Linear, NodeType, Parameter, Pool2d, ReLU,
};
use crate::nn::nodes::{DType, NodeHandle, PoolKind};
use crate::nn::param_store::BatchNormParams;
use crate::nn::shape::{DynamicShape, Padding};
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl GraphInner {
    /// 添加节点到列表
    pub(in crate::nn::graph) fn add_node_to_list(
        &mut self,
        raw_node: NodeType,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> NodeId {
        let node_id = self.generate_valid_node_id();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type);

        for &parent_id in parents {
            self.forward_edges
                .entry(parent_id)
                .or_default()
                .push(node_id);
        }

        self.nodes
            .insert(node_id, NodeHandle::new(node_id, &node_name, parents, raw_node));
        node_id
    }

    /// 创建输入（占位符）节点
    pub fn new_input_node(
        &mut self,
        shape: DynamicShape,
        dtype: DType,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if shape.ndim() == 0 {
            return Err(GraphError::InvalidOperation(
                "输入节点至少需要 1 维".to_string(),
            ));
        }
        let node = Input::new(shape, dtype);
        Ok(self.add_node_to_list(node.into(), name, "input", &[]))
    }

    /// 创建参数节点
    pub fn new_parameter_node(
        &mut self,
        value: Tensor,
        trainable: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Parameter::new(value, trainable);
        Ok(self.add_node_to_list(node.into(), name, "parameter", &[]))
    }

    /// 创建卷积节点；`spectral_sigma` 为该次前向估计的最大奇异值
    pub fn new_conv2d_node(
        &mut self,
        input: NodeId,
        weights: NodeId,
        bias: NodeId,
        stride: usize,
        padding: Padding,
        spectral_sigma: Option<f32>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [input, weights, bias];
        let node = Conv2d::new(&self.get_nodes(&parents)?, stride, padding, spectral_sigma)?;
        Ok(self.add_node_to_list(node.into(), name, "conv2d", &parents))
    }

    pub fn new_linear_node(
        &mut self,
        input: NodeId,
        weights: NodeId,
        bias: NodeId,
        spectral_sigma: Option<f32>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [input, weights, bias];
        let node = Linear::new(&self.get_nodes(&parents)?, spectral_sigma)?;
        Ok(self.add_node_to_list(node.into(), name, "linear", &parents))
    }

    pub fn new_batch_norm_node(
        &mut self,
        input: NodeId,
        state: &BatchNormParams,
        training: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [
            input,
            state.gamma,
            state.beta,
            state.moving_mean,
            state.moving_variance,
        ];
        let node = BatchNorm::new(&self.get_nodes(&parents)?, training)?;
        Ok(self.add_node_to_list(node.into(), name, "batch_norm", &parents))
    }

    pub fn new_relu_node(&mut self, parent: NodeId, name: Option<&str>) -> Result<NodeId, GraphError> {
        let node = ReLU::new(&self.get_nodes(&[parent])?)?;
        Ok(self.add_node_to_list(node.into(), name, "relu", &[parent]))
    }

    pub fn new_pool2d_node(
        &mut self,
        parent: NodeId,
        kind: PoolKind,
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Pool2d::new(&self.get_nodes(&[parent])?, kind, window, stride, padding)?;
        let node_type = match kind {
            PoolKind::Max => "max_pool",
            PoolKind::Avg => "avg_pool",
        };
        Ok(self.add_node_to_list(node.into(), name, node_type, &[parent]))
    }

    /// 沿通道维拼接
    pub fn new_concat_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Concat::new(&self.get_nodes(parents)?)?;
        Ok(self.add_node_to_list(node.into(), name, "concat", parents))
    }

    pub fn new_flatten_node(
        &mut self,
        parent: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = Flatten::new(&self.get_nodes(&[parent])?)?;
        Ok(self.add_node_to_list(node.into(), name, "flatten", &[parent]))
    }
}
