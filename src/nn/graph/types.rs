/*
 * @Date         : 2026-03-02
 * @Description  : Graph 模块的类型定义
 */

use crate::nn::NodeId;

/// 层分组信息：把属于同一层的节点归在一起，供摘要和调试使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGroup {
    /// 层名称（即参数作用域，如 "conv1", "incept2/conv_ch1"）
    pub name: String,
    /// 层类型（如 "NormConv2d", "NormLinear"）
    pub layer_type: String,
    /// 层的描述信息（如 "3→64 spectral_norm"）
    pub description: String,
    /// 属于该层的节点 ID 列表
    pub node_ids: Vec<NodeId>,
}
