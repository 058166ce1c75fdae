/*
 * @Date         : 2026-03-02
 * @Description  : 节点句柄：节点在图中的身份（ID、名称、父节点）+ 原始节点
 */

use super::raw_node::{NodeType, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    parents: Vec<NodeId>,
    raw_node: NodeType,
}

impl NodeHandle {
    pub(crate) fn new(id: NodeId, name: &str, parents: &[NodeId], raw_node: NodeType) -> Self {
        Self {
            id,
            name: name.to_string(),
            parents: parents.to_vec(),
            raw_node,
        }
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(crate) fn expected_shape(&self) -> &DynamicShape {
        self.raw_node.expected_shape()
    }

    pub(crate) fn descriptor(&self) -> NodeTypeDescriptor {
        self.raw_node.descriptor()
    }

    pub(crate) fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub(crate) fn set_value(&mut self, value: Tensor) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub(crate) fn param_count(&self) -> usize {
        self.raw_node.param_count()
    }

    pub(crate) fn is_trainable(&self) -> bool {
        self.raw_node.is_trainable()
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[id={}, name={}]", self.id.0, self.name)
    }
}
