/*
 * @Date         : 2026-03-02
 * @Description  : Layer 模块：组合 Node 构建带归一化的卷积 / 全连接层与池化层
 *
 * Layer 不是新的抽象层，只是对 node_builders 的组合：
 * 参数按作用域从参数存储中获取或新建，归一化方式由 `LayerOptions` 决定。
 */

mod conv2d;
mod linear;
mod normalized;
mod pool2d;

pub use conv2d::{normalized_conv2d, NormConv2d};
pub use linear::{normalized_linear, NormLinear};
pub use normalized::LayerOutput;
pub use pool2d::{AvgPool2d, MaxPool2d};
