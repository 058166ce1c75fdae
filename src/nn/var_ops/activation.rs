/*
 * @Date         : 2026-03-02
 * @Description  : Var 激活函数扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 激活函数扩展 trait
///
/// ```ignore
/// use spectral_arch::nn::VarActivationOps;
///
/// let h = conv_out.relu()?;
/// ```
pub trait VarActivationOps {
    /// `ReLU` 激活：max(0, x)
    fn relu(&self) -> Result<Var, GraphError>;
}

impl VarActivationOps for Var {
    fn relu(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_relu_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
