/*
 * @Date         : 2026-03-02
 * @Description  : 图描述符（Graph Descriptor）
 *                 与参数取值无关的结构 IR：用于摘要输出、JSON 导出，
 *                 以及比较两次构建出的结构是否一致
 */

use crate::nn::nodes::DType;
use crate::nn::shape::{DynamicShape, Padding};
use serde::{Deserialize, Serialize};

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub name: String,
    pub nodes: Vec<NodeDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: u64,
    pub name: String,
    pub node_type: NodeTypeDescriptor,
    /// 输出形状（动态 batch 维序列化为 null）
    pub output_shape: DynamicShape,
    /// 父节点 ID 列表（定义拓扑）
    pub parents: Vec<u64>,
    /// 参数数量（仅 Parameter 类型有意义）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_count: Option<usize>,
}

/// 节点类型描述（包含类型特定参数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeTypeDescriptor {
    Input {
        dtype: DType,
    },
    Parameter {
        trainable: bool,
    },
    Conv2d {
        filter: [usize; 4],
        stride: usize,
        padding: Padding,
        spectral_norm: bool,
    },
    Linear {
        in_features: usize,
        out_features: usize,
        spectral_norm: bool,
    },
    BatchNorm {
        training: bool,
    },
    ReLU,
    MaxPool2d {
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    },
    AvgPool2d {
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    },
    Concat,
    Flatten,
}

impl NodeTypeDescriptor {
    /// 摘要中显示的类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "Input",
            Self::Parameter { .. } => "Parameter",
            Self::Conv2d { .. } => "Conv2d",
            Self::Linear { .. } => "Linear",
            Self::BatchNorm { .. } => "BatchNorm",
            Self::ReLU => "ReLU",
            Self::MaxPool2d { .. } => "MaxPool2d",
            Self::AvgPool2d { .. } => "AvgPool2d",
            Self::Concat => "Concat",
            Self::Flatten => "Flatten",
        }
    }
}

impl GraphDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    /// 获取总参数量
    pub fn total_params(&self) -> usize {
        self.nodes.iter().filter_map(|n| n.param_count).sum()
    }

    /// 按名称查找节点
    pub fn node(&self, name: &str) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl NodeDescriptor {
    pub fn new(
        id: u64,
        name: &str,
        node_type: NodeTypeDescriptor,
        output_shape: DynamicShape,
        parents: Vec<u64>,
    ) -> Self {
        let param_count = match node_type {
            NodeTypeDescriptor::Parameter { .. } => output_shape.to_vec_fixed().map(|s| s.iter().product()),
            _ => None,
        };

        Self {
            id,
            name: name.to_string(),
            node_type,
            output_shape,
            parents,
            param_count,
        }
    }
}
