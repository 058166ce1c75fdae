/*
 * @Date         : 2026-03-02
 * @Description  : 输入（占位符）节点：图的外部接口，只有形状和数据类型
 */

use super::TraitNode;
use crate::nn::descriptor::NodeTypeDescriptor;
use crate::nn::shape::DynamicShape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 占位符的数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DType {
    #[default]
    F32,
    /// 类别标签
    I64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32 => write!(f, "f32"),
            Self::I64 => write!(f, "i64"),
        }
    }
}

pub(crate) struct Input {
    shape: DynamicShape,
    dtype: DType,
}

impl Input {
    pub(crate) const fn new(shape: DynamicShape, dtype: DType) -> Self {
        Self { shape, dtype }
    }
}

impl TraitNode for Input {
    fn expected_shape(&self) -> &DynamicShape {
        &self.shape
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Input { dtype: self.dtype }
    }
}
