/*
 * @Date         : 2026-03-02
 * @Description  : 带归一化的全连接层
 *
 * 输入若不是 2D，先展平除 batch 外的所有维度：
 * [batch, H, W, C] -> [batch, H*W*C] -> [batch, out]
 *
 * 支持与卷积层相同的归一化方式，另可附加 L2 权重衰减（不能与谱归一化叠加）。
 */

use super::normalized::{prepare_params, validate_options, LayerOutput};
use crate::nn::norm::{LayerOptions, NormMode};
use crate::nn::{Graph, GraphError, Module, Var, VarShapeOps};

/// 带归一化的 Linear 层：`output = flatten(x) @ (W / σ) + b`
pub struct NormLinear {
    graph: Graph,
    out_features: usize,
    scope: String,
    options: LayerOptions,
}

impl NormLinear {
    pub fn new(graph: &Graph, out_features: usize, scope: &str, options: LayerOptions) -> Self {
        Self {
            graph: graph.clone(),
            out_features,
            scope: scope.to_string(),
            options,
        }
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn forward(&self, x: &Var) -> Result<LayerOutput, GraphError> {
        validate_options(&self.scope, &self.options)?;
        if !self.graph.owns(x) {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的输入来自另一个 Graph",
                self.scope
            )));
        }
        if self.out_features == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的输出维度不能为 0",
                self.scope
            )));
        }

        let in_shape = x.shape()?;
        let Some(in_features) = in_shape.feature_len().filter(|_| in_shape.ndim() >= 2) else {
            return Err(GraphError::InvalidOperation(format!(
                "层`{}`的输入特征数必须是静态的，得到{in_shape}",
                self.scope
            )));
        };
        let weight_shape = [in_features, self.out_features];
        // 展平节点也要等作用域确认可用后再建
        self.graph.check_scope(
            &self.scope,
            self.options.reuse,
            &weight_shape,
            self.options.norm.mode,
        )?;
        let flat = if in_shape.ndim() > 2 { x.flatten()? } else { x.clone() };

        let mut g = self.graph.inner_mut();
        let prepared = prepare_params(&mut g, &self.scope, &weight_shape, &self.options)?;
        let params = &prepared.params;

        let linear = g.new_linear_node(
            flat.node_id(),
            params.weights,
            params.bias,
            prepared.sigma,
            Some(&format!("{}/linear", self.scope)),
        )?;
        let mut node_ids = vec![linear];

        let output = match (&self.options.norm.mode, &params.batch_norm) {
            (NormMode::BatchNorm, Some(bn)) => {
                let bn_id = g.new_batch_norm_node(
                    linear,
                    bn,
                    self.options.training,
                    Some(&format!("{}/bn", self.scope)),
                )?;
                node_ids.push(bn_id);
                bn_id
            }
            _ => linear,
        };

        node_ids.extend(params.node_ids());
        g.register_layer_group(
            &self.scope,
            "NormLinear",
            &format!("{in_features}→{} {}", self.out_features, self.options.norm),
            node_ids,
        );
        log::debug!(
            "全连接层`{}`：{in_features}→{}，{}",
            self.scope,
            self.out_features,
            self.options.norm
        );
        drop(g);

        Ok(LayerOutput::new(self.graph.wrap_node_id(output), prepared))
    }
}

impl Module for NormLinear {
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

/// 函数式入口：在 `input` 所在的图上构建一个带归一化的全连接层
pub fn normalized_linear(
    input: &Var,
    output_dim: usize,
    scope: &str,
    options: &LayerOptions,
) -> Result<LayerOutput, GraphError> {
    NormLinear::new(&input.get_graph(), output_dim, scope, options.clone()).forward(input)
}
