/*
 * @Date         : 2026-03-02
 * @Description  : 卷积层与全连接层共用的参数准备流程
 *
 * 1. 校验归一化组合与滑动系数
 * 2. 按作用域获取或新建参数集合
 * 3. 谱归一化：做一步幂迭代，按 `UpdateCollection` 处理 u 的更新
 * 4. 新建参数且启用 L2 时登记权重惩罚
 */

use crate::nn::norm::{LayerOptions, NormMode};
use crate::nn::param_store::ParamSet;
use crate::nn::updates::{SpectralUpdate, UpdateCollection, WeightPenalty};
use crate::nn::{GraphError, GraphInner, Var};

/// `normalized_conv2d` / `normalized_linear` 的输出
#[derive(Debug, Clone)]
pub struct LayerOutput {
    /// 层输出（卷积层未经激活）
    pub output: Var,
    pub params: ParamSet,
    /// 参数是否由本次调用新建
    pub created: bool,
    /// 谱归一化估计的最大奇异值
    pub sigma: Option<f32>,
    /// 延迟执行的 u 更新（仅 `UpdateCollection::Named`）
    pub update: Option<SpectralUpdate>,
    /// 本次新登记的 L2 惩罚
    pub penalty: Option<WeightPenalty>,
}

pub(super) struct PreparedParams {
    pub params: ParamSet,
    pub created: bool,
    pub sigma: Option<f32>,
    pub update: Option<SpectralUpdate>,
    pub penalty: Option<WeightPenalty>,
}

pub(super) fn validate_options(scope: &str, options: &LayerOptions) -> Result<(), GraphError> {
    if scope.is_empty() {
        return Err(GraphError::InvalidOperation(
            "层的作用域名不能为空".to_string(),
        ));
    }
    options.norm.validate(scope)?;
    if !(options.beta > 0.0 && options.beta <= 1.0) {
        return Err(GraphError::InvalidConfig(format!(
            "层`{scope}`的 beta 必须在 (0, 1] 内，得到{}",
            options.beta
        )));
    }
    Ok(())
}

pub(super) fn prepare_params(
    graph: &mut GraphInner,
    scope: &str,
    weight_shape: &[usize],
    options: &LayerOptions,
) -> Result<PreparedParams, GraphError> {
    let mode = options.norm.mode;
    let (params, created) = graph.get_or_create_params(scope, weight_shape, mode, options.reuse)?;

    let mut sigma = None;
    let mut update = None;
    if mode == NormMode::SpectralNorm {
        let step = graph.spectral_step(&params)?;
        sigma = Some(step.sigma);
        if let Some(u) = params.spectral_u {
            let pending = SpectralUpdate {
                scope: scope.to_string(),
                collection: options.update_collection.to_string(),
                u,
                target: step.u,
                beta: options.beta,
                sigma: step.sigma,
            };
            match &options.update_collection {
                UpdateCollection::Inline => graph.apply_spectral_update(&pending)?,
                UpdateCollection::Named(name) => {
                    log::debug!("层`{scope}`的 u 更新已加入集合`{name}`（σ={:.4}）", step.sigma);
                    update = Some(pending);
                }
                UpdateCollection::NoOps => {
                    log::warn!("层`{scope}`使用 NoOps 集合，u 的更新被丢弃");
                }
            }
        }
    }

    let mut penalty = None;
    // 复用的参数不重复登记惩罚
    if let Some(coefficient) = options.norm.l2_coefficient().filter(|_| created) {
        let term = WeightPenalty {
            scope: scope.to_string(),
            weights: params.weights,
            coefficient,
        };
        graph.add_weight_penalty(term.clone());
        penalty = Some(term);
    }

    Ok(PreparedParams {
        params,
        created,
        sigma,
        update,
        penalty,
    })
}

impl LayerOutput {
    pub(super) fn new(output: Var, prepared: PreparedParams) -> Self {
        Self {
            output,
            params: prepared.params,
            created: prepared.created,
            sigma: prepared.sigma,
            update: prepared.update,
            penalty: prepared.penalty,
        }
    }

    /// 该层全部参数节点对应的 Var
    pub fn parameters(&self) -> Vec<Var> {
        let graph = self.output.get_graph();
        self.params
            .node_ids()
            .into_iter()
            .map(|id| graph.wrap_node_id(id))
            .collect()
    }
}
