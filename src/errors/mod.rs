use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("数据长度{data_len}与形状{shape:?}的元素个数不一致")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    #[error("无法将形状{from:?}重塑为{to:?}")]
    IncompatibleReshape { from: Vec<usize>, to: Vec<usize> },
    #[error("张量形状不兼容")]
    IncompatibleShape,
}
