mod batch_norm;
mod concat;
mod conv2d;
mod flatten;
mod linear;
mod pool2d;
mod relu;

pub(crate) use batch_norm::BatchNorm;
pub(crate) use concat::Concat;
pub(crate) use conv2d::Conv2d;
pub(crate) use flatten::Flatten;
pub(crate) use linear::Linear;
pub use pool2d::PoolKind;
pub(crate) use pool2d::Pool2d;
pub(crate) use relu::ReLU;
