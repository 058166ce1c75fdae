/*
 * @Date         : 2026-03-02
 * @Description  : Graph 模块的错误类型
 *
 * 建图阶段的错误都是致命的：没有重试，也没有恢复路径，
 * 调用方拿到 Err 后应放弃本次构建。
 */

use crate::errors::TensorError;
use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("找不到节点{0:?}")]
    NodeNotFound(NodeId),
    #[error("无效操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配（期望{expected:?}，得到{got:?}）：{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("维度数不匹配（期望{expected}，得到{got}）：{message}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    /// `Reuse::Create` 下参数作用域已存在
    #[error("参数作用域`{0}`已存在；如需绑定已有参数请使用 Reuse::Reuse")]
    ScopeCollision(String),
    /// `Reuse::Reuse` 下参数作用域不存在
    #[error("参数作用域`{0}`不存在，无法复用")]
    ScopeNotFound(String),
    /// 单层上互斥的归一化/正则化组合
    #[error("非法的归一化策略：{0}")]
    InvalidPolicy(String),
    #[error("非法的结构配置：{0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Tensor(#[from] TensorError),
}
