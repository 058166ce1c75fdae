/*
 * @Date         : 2026-03-02
 * @Description  : 2D 池化层（最大 / 平均），NHWC，无可学习参数
 *
 * 输出尺寸（每个空间维度）：
 * - VALID: (H - window) / stride + 1
 * - SAME:  ceil(H / stride)
 */

use crate::nn::nodes::PoolKind;
use crate::nn::shape::Padding;
use crate::nn::{GraphError, Var};
use std::rc::Rc;

fn pool(
    x: &Var,
    kind: PoolKind,
    window: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
    name: &str,
) -> Result<Var, GraphError> {
    let id = x
        .graph()
        .borrow_mut()
        .new_pool2d_node(x.node_id(), kind, window, stride, padding, Some(name))?;
    Ok(Var::new(id, Rc::clone(x.graph())))
}

/// `MaxPool2d` 层
///
/// ```ignore
/// // VGG：2x2/2 VALID，空间尺寸减半
/// let pooled = MaxPool2d::new((2, 2), (2, 2), Padding::Valid, "pool3").forward(&h)?;
/// ```
#[derive(Debug, Clone)]
pub struct MaxPool2d {
    window: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
    name: String,
}

impl MaxPool2d {
    pub fn new(window: (usize, usize), stride: (usize, usize), padding: Padding, name: &str) -> Self {
        Self {
            window,
            stride,
            padding,
            name: name.to_string(),
        }
    }

    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        pool(x, PoolKind::Max, self.window, self.stride, self.padding, &self.name)
    }
}

/// `AvgPool2d` 层
#[derive(Debug, Clone)]
pub struct AvgPool2d {
    window: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
    name: String,
}

impl AvgPool2d {
    pub fn new(window: (usize, usize), stride: (usize, usize), padding: Padding, name: &str) -> Self {
        Self {
            window,
            stride,
            padding,
            name: name.to_string(),
        }
    }

    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        pool(x, PoolKind::Avg, self.window, self.stride, self.padding, &self.name)
    }
}
