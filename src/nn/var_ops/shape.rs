/*
 * @Date         : 2026-03-02
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 形状变换扩展 trait
///
/// - `flatten()`: 展平为 `[batch, 其余维度之积]`
/// - `concat(others)`: 沿最后一维（通道）拼接
pub trait VarShapeOps {
    fn flatten(&self) -> Result<Var, GraphError>;

    /// 与 `others` 依次沿通道维拼接，除通道外的维度必须一致
    fn concat(&self, others: &[&Var], name: Option<&str>) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn flatten(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_flatten_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn concat(&self, others: &[&Var], name: Option<&str>) -> Result<Var, GraphError> {
        if let Some(other) = others.iter().find(|o| !self.same_graph(o)) {
            return Err(GraphError::InvalidOperation(format!(
                "不能拼接来自不同 Graph 的 Var（{:?}）",
                other.node_id()
            )));
        }
        let mut ids = vec![self.node_id()];
        ids.extend(others.iter().map(|o| o.node_id()));
        let id = self.graph().borrow_mut().new_concat_node(&ids, name)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
