/*
 * @Date         : 2026-03-02
 * @Description  : 计算图节点：句柄 + 各类原始节点
 */

mod node_handle;
pub(crate) mod raw_node;

pub use node_handle::NodeId;
pub(crate) use node_handle::NodeHandle;
pub use raw_node::{DType, PoolKind};
