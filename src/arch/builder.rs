/*
 * @Date         : 2026-03-02
 * @Description  : 结构构建器：按策略为每个带参层选择归一化方式，并汇总各层的副作用
 */

use super::config::ArchConfig;
use super::output::{ArchOutput, LayerKind, LayerRecord};
use super::policy::{LayerRole, NormPolicy};
use crate::nn::{
    AvgPool2d, Graph, GraphError, LayerNorm, LayerOptions, LayerOutput, MaxPool2d, NormConv2d,
    NormLinear, Padding, SpectralUpdate, Var, VarActivationOps, WeightPenalty,
};

pub struct ArchBuilder<'a> {
    name: String,
    graph: Graph,
    config: &'a ArchConfig,
    policy: &'a NormPolicy,
    updates: Vec<SpectralUpdate>,
    penalties: Vec<WeightPenalty>,
    layers: Vec<LayerRecord>,
}

impl<'a> ArchBuilder<'a> {
    /// 校验配置与策略；配置中带种子时重置图的随机数生成器
    pub fn new(
        name: &str,
        graph: &Graph,
        config: &'a ArchConfig,
        policy: &'a NormPolicy,
    ) -> Result<Self, GraphError> {
        config.validate()?;
        policy.validate()?;
        if let Some(seed) = config.seed {
            graph.set_seed(seed);
        }
        log::debug!("开始构建{name}：策略{}，{} 类", policy.kind(), config.num_classes);
        Ok(Self {
            name: name.to_string(),
            graph: graph.clone(),
            config,
            policy,
            updates: Vec::new(),
            penalties: Vec::new(),
            layers: Vec::new(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn config(&self) -> &ArchConfig {
        self.config
    }

    /// 作用域 `scope` 的构建选项
    pub fn options_for(&self, scope: &str, role: LayerRole) -> LayerOptions {
        self.config.layer_options(self.policy.norm_for(scope, role))
    }

    /// 按策略试查作用域 `scope` 是否可用，不新建参数
    pub fn check_scope(
        &self,
        scope: &str,
        weight_shape: &[usize],
        role: LayerRole,
    ) -> Result<(), GraphError> {
        let options = self.options_for(scope, role);
        self.graph
            .check_scope(scope, options.reuse, weight_shape, options.norm.mode)
    }

    /// 卷积 + ReLU
    pub fn conv_relu(
        &mut self,
        x: &Var,
        filter_shape: [usize; 4],
        stride: usize,
        scope: &str,
        role: LayerRole,
    ) -> Result<Var, GraphError> {
        let options = self.options_for(scope, role);
        let norm = options.norm;
        let out = NormConv2d::new(&self.graph, filter_shape, stride, scope, options).forward(x)?;
        self.record(LayerKind::Conv2d, norm, out)?.relu()
    }

    /// 全连接（不接激活）
    pub fn linear(
        &mut self,
        x: &Var,
        out_features: usize,
        scope: &str,
        role: LayerRole,
    ) -> Result<Var, GraphError> {
        let options = self.options_for(scope, role);
        let norm = options.norm;
        let out = NormLinear::new(&self.graph, out_features, scope, options).forward(x)?;
        self.record(LayerKind::Linear, norm, out)
    }

    pub fn max_pool(
        &self,
        x: &Var,
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        name: &str,
    ) -> Result<Var, GraphError> {
        MaxPool2d::new(window, stride, padding, name).forward(x)
    }

    pub fn avg_pool(
        &self,
        x: &Var,
        window: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        name: &str,
    ) -> Result<Var, GraphError> {
        AvgPool2d::new(window, stride, padding, name).forward(x)
    }

    /// 记录一层的输出，收集其延迟更新与惩罚项，返回层输出
    pub fn record(
        &mut self,
        kind: LayerKind,
        norm: LayerNorm,
        out: LayerOutput,
    ) -> Result<Var, GraphError> {
        self.layers.push(LayerRecord {
            scope: out.params.scope.clone(),
            kind,
            norm,
            output_shape: out.output.shape()?,
            sigma: out.sigma,
        });
        self.updates.extend(out.update);
        self.penalties.extend(out.penalty);
        Ok(out.output)
    }

    pub fn finish(self, logits: Var) -> Result<ArchOutput, GraphError> {
        log::info!(
            "{}构建完成：{} 个带参层，参数元素 {} 个，待执行更新 {} 个，L2 惩罚 {} 项，输出{}",
            self.name,
            self.layers.len(),
            self.graph.param_count(),
            self.updates.len(),
            self.penalties.len(),
            logits.shape()?
        );
        Ok(ArchOutput {
            logits,
            updates: self.updates,
            penalties: self.penalties,
            layers: self.layers,
        })
    }
}
