/*
 * @Date         : 2026-03-02
 * @Description  : 带归一化的 2D 卷积层（NHWC，SAME 填充）
 *
 * 输入/输出形状：
 * - 输入：[batch, H, W, C_in]
 * - 输出：[batch, ceil(H/stride), ceil(W/stride), C_out]
 *
 * 计算：output = conv2d(x, W / σ) + b，随后按需接批归一化。
 * σ 只在谱归一化时存在。
 */

use super::normalized::{prepare_params, validate_options, LayerOutput};
use crate::nn::norm::{LayerOptions, NormMode};
use crate::nn::shape::Padding;
use crate::nn::{Graph, GraphError, Module, Var};

/// 带归一化的 Conv2d 层
///
/// ```ignore
/// let conv = NormConv2d::new(&graph, [3, 3, 3, 64], 1, "conv1", LayerOptions::default());
/// let h = conv.forward(&x)?.output.relu()?;
/// ```
pub struct NormConv2d {
    graph: Graph,
    /// [kH, kW, C_in, C_out]
    filter_shape: [usize; 4],
    stride: usize,
    scope: String,
    options: LayerOptions,
}

impl NormConv2d {
    pub fn new(
        graph: &Graph,
        filter_shape: [usize; 4],
        stride: usize,
        scope: &str,
        options: LayerOptions,
    ) -> Self {
        Self {
            graph: graph.clone(),
            filter_shape,
            stride,
            scope: scope.to_string(),
            options,
        }
    }

    pub fn in_channels(&self) -> usize {
        self.filter_shape[2]
    }

    pub fn out_channels(&self) -> usize {
        self.filter_shape[3]
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 只做校验，不改动图
    ///
    /// 核对归一化选项、输入通道数、卷积核与步长、输出尺寸以及作用域是否可用。
    /// 多分支模块在新建任何分支的参数前先对所有分支调用它。
    pub fn check_input(&self, x: &Var) -> Result<(), GraphError> {
        validate_options(&self.scope, &self.options)?;
        if !self.graph.owns(x) {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的输入来自另一个 Graph",
                self.scope
            )));
        }

        let in_shape = x.shape()?;
        let declared = self.in_channels();
        if in_shape.ndim() != 4 || in_shape.channels() != Some(declared) {
            return Err(GraphError::ShapeMismatch {
                expected: vec![declared],
                got: in_shape.channels().into_iter().collect(),
                message: format!(
                    "层`{}`声明的输入通道数为{declared}，实际输入为{in_shape}",
                    self.scope
                ),
            });
        }
        if self.stride == 0 || self.filter_shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的卷积核{:?}与步长{}必须为正",
                self.scope, self.filter_shape, self.stride
            )));
        }

        let [k_h, k_w, _, _] = self.filter_shape;
        let out_h = in_shape.dim(1).and_then(|h| Padding::Same.output_len(h, k_h, self.stride));
        let out_w = in_shape.dim(2).and_then(|w| Padding::Same.output_len(w, k_w, self.stride));
        if out_h.is_none() || out_w.is_none() {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的输出尺寸无效：输入{in_shape}，卷积核{:?}，步长{}",
                self.scope, self.filter_shape, self.stride
            )));
        }

        self.graph.check_scope(
            &self.scope,
            self.options.reuse,
            &self.filter_shape,
            self.options.norm.mode,
        )
    }

    pub fn forward(&self, x: &Var) -> Result<LayerOutput, GraphError> {
        // 参数创建前完成全部校验，失败时不留下参数
        self.check_input(x)?;

        let mut g = self.graph.inner_mut();
        let prepared = prepare_params(&mut g, &self.scope, &self.filter_shape, &self.options)?;
        let params = &prepared.params;

        let conv = g.new_conv2d_node(
            x.node_id(),
            params.weights,
            params.bias,
            self.stride,
            Padding::Same,
            prepared.sigma,
            Some(&format!("{}/conv", self.scope)),
        )?;
        let mut node_ids = vec![conv];

        let output = match (&self.options.norm.mode, &params.batch_norm) {
            (NormMode::BatchNorm, Some(bn)) => {
                let bn_id = g.new_batch_norm_node(
                    conv,
                    bn,
                    self.options.training,
                    Some(&format!("{}/bn", self.scope)),
                )?;
                node_ids.push(bn_id);
                bn_id
            }
            _ => conv,
        };

        node_ids.extend(params.node_ids());
        g.register_layer_group(
            &self.scope,
            "NormConv2d",
            &format!(
                "{}→{} {}",
                self.in_channels(),
                self.out_channels(),
                self.options.norm
            ),
            node_ids,
        );
        log::debug!(
            "卷积层`{}`：{:?}/{}，{}，输出{}",
            self.scope,
            self.filter_shape,
            self.stride,
            self.options.norm,
            g.get_node_shape(output)?
        );
        drop(g);

        Ok(LayerOutput::new(self.graph.wrap_node_id(output), prepared))
    }
}

impl Module for NormConv2d {
    fn parameters(&self) -> Vec<Var> {
        self.graph
            .param_set(&self.scope)
            .map(|set| {
                set.node_ids()
                    .into_iter()
                    .map(|id| self.graph.wrap_node_id(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// 函数式入口：在 `input` 所在的图上构建一个带归一化的卷积层
///
/// `filter_shape = [kH, kW, C_in, C_out]`，`stride` 同时作用于两个空间维度。
pub fn normalized_conv2d(
    input: &Var,
    filter_shape: [usize; 4],
    stride: usize,
    scope: &str,
    options: &LayerOptions,
) -> Result<LayerOutput, GraphError> {
    NormConv2d::new(&input.get_graph(), filter_shape, stride, scope, options.clone()).forward(input)
}
