/*
 * @Date         : 2026-03-02
 * @Description  : Flatten 节点：[batch, d1, d2, ...] -> [batch, d1*d2*...]
 */

use super::super::{expect_parents, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;

pub(crate) struct Flatten {
    shape: DynamicShape,
}

impl Flatten {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        expect_parents(parents, 1, "Flatten")?;

        let input_shape = parents[0].expected_shape();
        if input_shape.ndim() < 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: input_shape.ndim(),
                message: "Flatten 的输入至少需要 2 维".to_string(),
            });
        }
        let Some(features) = input_shape.feature_len() else {
            return Err(GraphError::InvalidOperation(format!(
                "Flatten 的输入除 batch 外的维度必须是静态的，得到{input_shape}"
            )));
        };

        Ok(Self {
            shape: DynamicShape::new(&[input_shape.batch(), Some(features)]),
        })
    }
}

impl TraitNode for Flatten {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Flatten
    }
}
