/*
 * @Date         : 2026-03-02
 * @Description  : Var - 符号变量句柄
 *
 * Var 只携带节点 ID 和图引用；激活值不会被求出，
 * 形状在建图时就已经由各节点推断确定。
 */

use super::graph::{Graph, GraphInner};
use super::shape::DynamicShape;
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Xavier/Glorot 均匀分布：limit = sqrt(6 / (fan_in + fan_out))
    Xavier,
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        rng: &mut R,
    ) -> Result<Tensor, GraphError> {
        let tensor = match self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::new_normal_with_rng(*mean, *std, shape, rng)?,
            Self::Xavier => {
                let (fan_in, fan_out) = Self::fans(shape);
                let limit = (6.0 / (fan_in + fan_out).max(1) as f32).sqrt();
                Tensor::new_uniform_with_rng(-limit, limit, shape, rng)
            }
        };
        Ok(tensor)
    }

    /// 计算 (fan_in, fan_out)
    ///
    /// 2D 权重 [in, out] 直接取两维；卷积核 [kH, kW, C_in, C_out] 的扇入扇出
    /// 都乘上感受野大小 kH*kW。
    pub fn fans(shape: &[usize]) -> (usize, usize) {
        match shape.len() {
            0 => (1, 1),
            1 => (shape[0], shape[0]),
            2 => (shape[0], shape[1]),
            n => {
                let receptive: usize = shape[..n - 2].iter().product();
                (shape[n - 2] * receptive, shape[n - 1] * receptive)
            }
        }
    }
}

// ==================== Var 结构 ====================

/// 符号变量句柄：持有图引用，用于链式构建网络
///
/// Clone 语义（非 Copy），开销只是一次 Rc clone。
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    /// 获取内部图引用（供 trait 和内部模块使用）
    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 节点的输出形状（batch 维可能是动态的）
    pub fn shape(&self) -> Result<DynamicShape, GraphError> {
        self.graph.borrow().get_node_shape(self.id)
    }

    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    /// 参数节点的当前值（非参数节点返回 None）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    pub fn set_value(&self, value: Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, value)
    }
}
