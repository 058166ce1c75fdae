/*
 * @Date         : 2026-03-02
 * @Description  : 2D 池化节点（最大 / 平均），NHWC，通道数不变
 */

use super::super::{expect_parents, spatial_dims, TraitNode};
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::nodes::NodeHandle;
use crate::nn::shape::{DynamicShape, Padding};
use crate::nn::GraphError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolKind {
    Max,
    Avg,
}

pub(crate) struct Pool2d {
    shape: DynamicShape,
    kind: PoolKind,
    window: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
}

impl Pool2d {
    pub(crate) fn new(
        parents: &[&NodeHandle],
        kind: PoolKind,
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, GraphError> {
        expect_parents(parents, 1, "Pool2d")?;

        let input_shape = parents[0].expected_shape();
        let (in_h, in_w, channels) = spatial_dims(input_shape, "Pool2d")?;

        let (out_h, out_w) = match (
            padding.output_len(in_h, window.0, stride.0),
            padding.output_len(in_w, window.1, stride.1),
        ) {
            (Some(h), Some(w)) => (h, w),
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "池化输出尺寸无效：输入 {in_h}x{in_w}，窗口 {window:?}，步长 {stride:?}，填充 {padding}"
                )));
            }
        };

        Ok(Self {
            shape: DynamicShape::new(&[input_shape.batch(), Some(out_h), Some(out_w), Some(channels)]),
            kind,
            window,
            stride,
            padding,
        })
    }
}

impl TraitNode for Pool2d {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        match self.kind {
            PoolKind::Max => NodeTypeDescriptor::MaxPool2d {
                window: self.window,
                stride: self.stride,
                padding: self.padding,
            },
            PoolKind::Avg => NodeTypeDescriptor::AvgPool2d {
                window: self.window,
                stride: self.stride,
                padding: self.padding,
            },
        }
    }
}
