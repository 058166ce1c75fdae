/*
 * @Date         : 2026-03-02
 * @Description  : 批归一化节点（按最后一维，即通道/特征维归一化）
 *
 * 父节点：[x, gamma, beta, moving_mean, moving_variance]，后四者都是 [C]。
 * `training` 为 true 时使用 batch 统计量并更新滑动统计，否则冻结。
 */

use super::super::{expect_parents, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;

pub(crate) struct BatchNorm {
    shape: DynamicShape,
    training: bool,
}

impl BatchNorm {
    pub(crate) fn new(parents: &[&NodeHandle], training: bool) -> Result<Self, GraphError> {
        expect_parents(parents, 5, "BatchNorm")?;

        let input_shape = parents[0].expected_shape();
        let Some(channels) = input_shape.channels() else {
            return Err(GraphError::InvalidOperation(format!(
                "BatchNorm 的通道维必须是静态的，得到{input_shape}"
            )));
        };

        for state in &parents[1..] {
            let state_shape = state.expected_shape().to_vec_fixed().unwrap_or_default();
            if state_shape != [channels] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![channels],
                    got: state_shape,
                    message: format!("BatchNorm 状态{}的形状必须是 [C]", state.name()),
                });
            }
        }

        Ok(Self {
            shape: input_shape.clone(),
            training,
        })
    }
}

impl TraitNode for BatchNorm {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::BatchNorm {
            training: self.training,
        }
    }
}
