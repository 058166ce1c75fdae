/*
 * @Date         : 2026-03-02
 * @Description  : 沿最后一维（通道）拼接
 *
 * 除最后一维外各输入的形状必须一致（动态维与任意值兼容），
 * 输出通道数为各输入通道数之和。
 */

use super::super::TraitNode;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::{Dim, DynamicShape};
use crate::nn::GraphError;

pub(crate) struct Concat {
    shape: DynamicShape,
}

impl Concat {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        let Some(first) = parents.first() else {
            return Err(GraphError::InvalidOperation(
                "Concat 节点至少需要 1 个父节点".to_string(),
            ));
        };

        let first_shape = first.expected_shape();
        let ndim = first_shape.ndim();
        if ndim == 0 {
            return Err(GraphError::InvalidOperation(
                "Concat 不支持标量输入".to_string(),
            ));
        }

        let mut leading: Vec<Dim> = first_shape.dims()[..ndim - 1].to_vec();
        let mut channels = 0;
        for parent in parents {
            let shape = parent.expected_shape();
            if shape.ndim() != ndim {
                return Err(GraphError::DimensionMismatch {
                    expected: ndim,
                    got: shape.ndim(),
                    message: format!("Concat 的输入{}维数不一致", parent.name()),
                });
            }
            for (merged, dim) in leading.iter_mut().zip(&shape.dims()[..ndim - 1]) {
                match (*merged, *dim) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(GraphError::ShapeMismatch {
                            expected: first_shape.to_vec_fixed().unwrap_or_default(),
                            got: shape.to_vec_fixed().unwrap_or_default(),
                            message: format!(
                                "Concat 的输入{}与{}除通道外的尺寸不一致（{first_shape} vs {shape}）",
                                first.name(),
                                parent.name()
                            ),
                        });
                    }
                    (None, b) => *merged = b,
                    _ => {}
                }
            }
            let Some(c) = shape.channels() else {
                return Err(GraphError::InvalidOperation(format!(
                    "Concat 的输入{}通道数必须是静态的",
                    parent.name()
                )));
            };
            channels += c;
        }

        leading.push(Some(channels));
        Ok(Self {
            shape: DynamicShape::new(&leading),
        })
    }
}

impl TraitNode for Concat {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Concat
    }
}
