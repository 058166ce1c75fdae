mod input;
mod ops;
mod parameter;

pub(crate) use input::Input;
pub use input::DType;
pub use ops::PoolKind;
pub(crate) use ops::{BatchNorm, Concat, Conv2d, Flatten, Linear, Pool2d, ReLU};
pub(crate) use parameter::Parameter;

use super::NodeHandle;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub(crate) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Conv2d(Conv2d),
    Linear(Linear),
    BatchNorm(BatchNorm),
    ReLU(ReLU),
    Pool2d(Pool2d),
    Concat(Concat),
    Flatten(Flatten),
}

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    /// 建图时即确定的输出形状（batch 维可以是动态的）
    fn expected_shape(&self) -> &DynamicShape;

    /// 节点类型及其静态属性（用于描述/摘要）
    fn descriptor(&self) -> NodeTypeDescriptor;

    fn value(&self) -> Option<&Tensor> {
        None
    }

    fn set_value(&mut self, _value: Tensor) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(
            "该类型节点的值不应该被手动设置".to_string(),
        ))
    }

    /// 本节点持有的参数元素个数（只有参数节点非零）
    fn param_count(&self) -> usize {
        0
    }

    /// 返回该节点的参数是否应该在训练过程中被更新
    fn is_trainable(&self) -> bool {
        false
    }
}

/// 校验父节点数量
pub(crate) fn expect_parents(
    parents: &[&NodeHandle],
    expected: usize,
    node_type: &str,
) -> Result<(), GraphError> {
    if parents.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{node_type}节点需要{expected}个父节点，实际得到{}个",
            parents.len()
        )));
    }
    Ok(())
}

/// 取出 NHWC 激活的静态空间尺寸和通道数
pub(crate) fn spatial_dims(
    shape: &DynamicShape,
    node_type: &str,
) -> Result<(usize, usize, usize), GraphError> {
    if shape.ndim() != 4 {
        return Err(GraphError::DimensionMismatch {
            expected: 4,
            got: shape.ndim(),
            message: format!("{node_type}的输入必须是 4D [batch, H, W, C]，得到{shape}"),
        });
    }
    match (shape.dim(1), shape.dim(2), shape.dim(3)) {
        (Some(h), Some(w), Some(c)) => Ok((h, w, c)),
        _ => Err(GraphError::InvalidOperation(format!(
            "{node_type}的输入除 batch 外的维度必须是静态的，得到{shape}"
        ))),
    }
}
