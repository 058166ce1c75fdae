use super::super::{expect_parents, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;

pub(crate) struct ReLU {
    shape: DynamicShape,
}

impl ReLU {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        expect_parents(parents, 1, "ReLU")?;
        Ok(Self {
            shape: parents[0].expected_shape().clone(),
        })
    }
}

impl TraitNode for ReLU {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::ReLU
    }
}
