/*
 * @Date         : 2026-03-02
 * @Description  : 参数节点：持有真实的参数值
 *
 * 可训练参数（权重、偏置、BN 的 gamma/beta）与不可训练状态
 * （BN 滑动均值/方差、谱归一化的奇异向量估计 u）都用该节点表示，
 * 以 `trainable` 区分。
 */

use super::TraitNode;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;
use crate::tensor::Tensor;

pub(crate) struct Parameter {
    shape: DynamicShape,
    value: Tensor,
    trainable: bool,
}

impl Parameter {
    pub(crate) fn new(value: Tensor, trainable: bool) -> Self {
        Self {
            shape: DynamicShape::fixed(value.shape()),
            value,
            trainable,
        }
    }
}

impl TraitNode for Parameter {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Parameter {
            trainable: self.trainable,
        }
    }

    fn value(&self) -> Option<&Tensor> {
        Some(&self.value)
    }

    fn set_value(&mut self, value: Tensor) -> Result<(), GraphError> {
        if value.shape() != self.value.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: self.value.shape().to_vec(),
                got: value.shape().to_vec(),
                message: "参数的新值必须与原形状一致".to_string(),
            });
        }
        self.value = value;
        Ok(())
    }

    fn param_count(&self) -> usize {
        self.value.size()
    }

    fn is_trainable(&self) -> bool {
        self.trainable
    }
}
