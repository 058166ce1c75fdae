/*
 * @Date         : 2026-03-02
 * @Description  : 2D 卷积节点（TensorFlow 风格，NHWC）
 *
 * 父节点：
 * - parents[0]: 输入数据 [batch, H, W, C_in]
 * - parents[1]: 卷积核参数 [kH, kW, C_in, C_out]
 * - parents[2]: 偏置参数 [C_out]
 *
 * 输出：[batch, H', W', C_out]，H' 由 `Padding` 决定。
 * 谱归一化时节点记录本次前向使用的 σ（实际权重为 W / σ）。
 */

use super::super::{expect_parents, spatial_dims, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::{DynamicShape, Padding};
use crate::nn::GraphError;

pub(crate) struct Conv2d {
    shape: DynamicShape,
    filter: [usize; 4],
    stride: usize,
    padding: Padding,
    spectral_sigma: Option<f32>,
}

impl Conv2d {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        stride: usize,
        padding: Padding,
        spectral_sigma: Option<f32>,
    ) -> Result<Self, GraphError> {
        expect_parents(parents, 3, "Conv2d")?;

        let kernel_shape = parents[1].expected_shape().to_vec_fixed().unwrap_or_default();
        let [k_h, k_w, k_in, k_out] = <[usize; 4]>::try_from(kernel_shape.as_slice())
            .map_err(|_| GraphError::DimensionMismatch {
                expected: 4,
                got: kernel_shape.len(),
                message: "卷积核必须是静态的 4D [kH, kW, C_in, C_out]".to_string(),
            })?;

        let input_shape = parents[0].expected_shape();
        let (in_h, in_w, in_c) = spatial_dims(input_shape, "Conv2d")?;
        if in_c != k_in {
            return Err(GraphError::ShapeMismatch {
                expected: vec![k_in],
                got: vec![in_c],
                message: format!("输入通道数{in_c}与卷积核输入通道数{k_in}不匹配"),
            });
        }

        let bias_shape = parents[2].expected_shape();
        if bias_shape.to_vec_fixed() != Some(vec![k_out]) {
            return Err(GraphError::ShapeMismatch {
                expected: vec![k_out],
                got: bias_shape.to_vec_fixed().unwrap_or_default(),
                message: "卷积偏置必须是 [C_out]".to_string(),
            });
        }

        let (out_h, out_w) = match (
            padding.output_len(in_h, k_h, stride),
            padding.output_len(in_w, k_w, stride),
        ) {
            (Some(h), Some(w)) => (h, w),
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "卷积输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，步长 {stride}，填充 {padding}"
                )));
            }
        };

        Ok(Self {
            shape: DynamicShape::new(&[input_shape.batch(), Some(out_h), Some(out_w), Some(k_out)]),
            filter: [k_h, k_w, k_in, k_out],
            stride,
            padding,
            spectral_sigma,
        })
    }
}

impl TraitNode for Conv2d {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Conv2d {
            filter: self.filter,
            stride: self.stride,
            padding: self.padding,
            spectral_norm: self.spectral_sigma.is_some(),
        }
    }
}
