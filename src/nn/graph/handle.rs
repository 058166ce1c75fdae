/*
 * @Date         : 2026-03-02
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use super::types::LayerGroup;
use crate::nn::descriptor::GraphDescriptor;
use crate::nn::nodes::DType;
use crate::nn::norm::NormMode;
use crate::nn::param_store::{ParamSet, Reuse};
use crate::nn::shape::DynamicShape;
use crate::nn::updates::{SpectralUpdate, WeightPenalty};
use crate::nn::var::{Init, Var};
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装，因此不能跨线程（`!Send`）
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Graph {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带种子的图（参数初始化可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    pub fn with_name(name: &str) -> Self {
        Self::from_inner(GraphInner::with_name(name))
    }

    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, Rc::clone(&self.inner))
    }

    /// `var` 是否属于本图
    pub fn owns(&self, var: &Var) -> bool {
        Rc::ptr_eq(&self.inner, var.graph())
    }

    /// 设置/重置随机种子，只影响之后新建的参数
    pub fn set_seed(&self, seed: u64) {
        self.inner.borrow_mut().set_seed(seed);
    }

    // ==================== 创建变量 ====================

    /// 创建输入占位符（如 `[?, 28, 28, 3]`）
    pub fn input(&self, shape: DynamicShape, dtype: DType, name: &str) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_input_node(shape, dtype, Some(name))?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 创建独立的参数节点（不属于任何作用域）
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str) -> Result<Var, GraphError> {
        let mut g = self.inner.borrow_mut();
        let value = g.init_tensor(&init, shape)?;
        let node_id = g.new_parameter_node(value, true, Some(name))?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    // ==================== 参数与状态 ====================

    /// 作用域对应的参数集合
    pub fn param_set(&self, scope: &str) -> Option<ParamSet> {
        self.inner.borrow().param_set(scope).cloned()
    }

    /// 按 `reuse` 语义试查作用域，不新建任何参数
    pub fn check_scope(
        &self,
        scope: &str,
        reuse: Reuse,
        weight_shape: &[usize],
        mode: NormMode,
    ) -> Result<(), GraphError> {
        let g = self.inner.borrow();
        g.params().resolve(scope, reuse, weight_shape, mode)?;
        Ok(())
    }

    pub fn scopes(&self) -> Vec<String> {
        self.inner
            .borrow()
            .params()
            .scopes()
            .map(str::to_string)
            .collect()
    }

    /// 参数节点的当前值
    pub fn value_of(&self, node_id: NodeId) -> Result<Option<Tensor>, GraphError> {
        Ok(self.inner.borrow().get_node_value(node_id)?.cloned())
    }

    /// 依次执行延迟的谱归一化状态更新
    pub fn apply_updates(&self, updates: &[SpectralUpdate]) -> Result<(), GraphError> {
        let mut g = self.inner.borrow_mut();
        for update in updates {
            g.apply_spectral_update(update)?;
        }
        Ok(())
    }

    pub fn penalties(&self) -> Vec<WeightPenalty> {
        self.inner.borrow().penalties().to_vec()
    }

    pub fn penalty_value(&self, penalty: &WeightPenalty) -> Result<f32, GraphError> {
        self.inner.borrow().penalty_value(penalty)
    }

    /// 图中全部 L2 惩罚之和
    pub fn regularization_loss(&self) -> Result<f32, GraphError> {
        self.inner.borrow().regularization_loss()
    }

    pub fn param_count(&self) -> usize {
        self.inner.borrow().param_count()
    }

    pub fn trainable_param_count(&self) -> usize {
        self.inner.borrow().trainable_param_count()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.borrow().nodes_count()
    }

    // ==================== 描述 ====================

    pub fn describe(&self) -> GraphDescriptor {
        self.inner.borrow().describe()
    }

    pub fn summary_string(&self) -> String {
        self.inner.borrow().summary_string()
    }

    pub fn layer_groups(&self) -> Vec<LayerGroup> {
        self.inner.borrow().layer_groups().to_vec()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
