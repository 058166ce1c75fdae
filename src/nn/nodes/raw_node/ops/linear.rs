/*
 * @Date         : 2026-03-02
 * @Description  : 全连接节点：output = x @ W + b
 *
 * 父节点：[x [batch, in], W [in, out], b [out]]
 */

use super::super::{expect_parents, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::DynamicShape;
use crate::nn::GraphError;

pub(crate) struct Linear {
    shape: DynamicShape,
    in_features: usize,
    out_features: usize,
    spectral_sigma: Option<f32>,
}

impl Linear {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        spectral_sigma: Option<f32>,
    ) -> Result<Self, GraphError> {
        expect_parents(parents, 3, "Linear")?;

        let input_shape = parents[0].expected_shape();
        if input_shape.ndim() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: input_shape.ndim(),
                message: format!("Linear 的输入必须先展平为 [batch, features]，得到{input_shape}"),
            });
        }

        let weight_shape = parents[1].expected_shape().to_vec_fixed().unwrap_or_default();
        let [w_in, w_out] = <[usize; 2]>::try_from(weight_shape.as_slice()).map_err(|_| {
            GraphError::DimensionMismatch {
                expected: 2,
                got: weight_shape.len(),
                message: "Linear 权重必须是 [in, out]".to_string(),
            }
        })?;

        let in_features = input_shape.dim(1);
        if in_features != Some(w_in) {
            return Err(GraphError::ShapeMismatch {
                expected: vec![w_in],
                got: in_features.into_iter().collect(),
                message: "输入特征数与权重输入维度不匹配".to_string(),
            });
        }

        let bias_shape = parents[2].expected_shape();
        if bias_shape.to_vec_fixed() != Some(vec![w_out]) {
            return Err(GraphError::ShapeMismatch {
                expected: vec![w_out],
                got: bias_shape.to_vec_fixed().unwrap_or_default(),
                message: "Linear 偏置必须是 [out]".to_string(),
            });
        }

        Ok(Self {
            shape: DynamicShape::new(&[input_shape.batch(), Some(w_out)]),
            in_features: w_in,
            out_features: w_out,
            spectral_sigma,
        })
    }
}

impl TraitNode for Linear {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Linear {
            in_features: self.in_features,
            out_features: self.out_features,
            spectral_norm: self.spectral_sigma.is_some(),
        }
    }
}
