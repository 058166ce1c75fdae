/*
 * @Date         : 2026-03-02
 * @Description  : 负责神经网络结构（符号计算图）的构建
 */

mod descriptor;
mod graph;
pub mod layer;
mod module;
mod nodes;
mod norm;
mod param_store;
mod shape;
pub mod spectral;
mod updates;
mod var;
mod var_ops;

pub use descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
pub use graph::{Graph, GraphError, GraphInner, LayerGroup};
pub use layer::{
    normalized_conv2d, normalized_linear, AvgPool2d, LayerOutput, MaxPool2d, NormConv2d, NormLinear,
};
pub use module::Module;
pub use nodes::{DType, NodeId, PoolKind};
pub use norm::{LayerNorm, LayerOptions, NormMode};
pub use param_store::{BatchNormParams, ParamSet, ParamStore, Reuse};
pub use shape::{Dim, DynamicShape, Padding};
pub use updates::{SpectralUpdate, UpdateCollection, WeightPenalty};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarShapeOps};

#[cfg(test)]
mod tests;
