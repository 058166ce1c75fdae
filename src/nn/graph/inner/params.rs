/*
 * @Date         : 2026-03-02
 * @Description  : GraphInner 参数作用域管理、谱归一化状态更新与权重惩罚
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::norm::NormMode;
use crate::nn::param_store::{BatchNormParams, ParamSet, ParamStore, Reuse};
use crate::nn::spectral::{power_iteration, PowerIteration};
use crate::nn::updates::{SpectralUpdate, WeightPenalty};
use crate::nn::var::Init;
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl GraphInner {
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn param_set(&self, scope: &str) -> Option<&ParamSet> {
        self.params.get(scope)
    }

    /// 按作用域获取（或新建）一层的参数集合
    ///
    /// 返回 `(参数集合, 是否为本次新建)`。权重形状的最后一维是输出维度，
    /// 偏置、BN 状态与谱归一化的 u 都由它决定。
    pub fn get_or_create_params(
        &mut self,
        scope: &str,
        weight_shape: &[usize],
        mode: NormMode,
        reuse: Reuse,
    ) -> Result<(ParamSet, bool), GraphError> {
        if let Some(existing) = self.params.resolve(scope, reuse, weight_shape, mode)? {
            log::debug!("复用参数作用域`{scope}`");
            return Ok((existing.clone(), false));
        }

        let Some(&out_dim) = weight_shape.last() else {
            return Err(GraphError::InvalidOperation(format!(
                "作用域`{scope}`的权重形状不能为空"
            )));
        };
        if weight_shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "作用域`{scope}`的权重形状{weight_shape:?}含有 0"
            )));
        }

        let weights = self.new_initialized_param(scope, "weights", weight_shape, &Init::Xavier, true)?;
        let bias = self.new_initialized_param(scope, "biases", &[out_dim], &Init::Zeros, true)?;

        let batch_norm = match mode {
            NormMode::BatchNorm => Some(BatchNormParams {
                gamma: self.new_initialized_param(scope, "bn/gamma", &[out_dim], &Init::Ones, true)?,
                beta: self.new_initialized_param(scope, "bn/beta", &[out_dim], &Init::Zeros, true)?,
                moving_mean: self.new_initialized_param(
                    scope,
                    "bn/moving_mean",
                    &[out_dim],
                    &Init::Zeros,
                    false,
                )?,
                moving_variance: self.new_initialized_param(
                    scope,
                    "bn/moving_variance",
                    &[out_dim],
                    &Init::Ones,
                    false,
                )?,
            }),
            _ => None,
        };

        let spectral_u = match mode {
            NormMode::SpectralNorm => Some(self.new_initialized_param(
                scope,
                "u",
                &[1, out_dim],
                &Init::Normal { mean: 0.0, std: 1.0 },
                false,
            )?),
            _ => None,
        };

        let set = ParamSet {
            scope: scope.to_string(),
            weights,
            bias,
            weight_shape: weight_shape.to_vec(),
            mode,
            batch_norm,
            spectral_u,
        };
        self.params.insert(set.clone())?;
        log::debug!("新建参数作用域`{scope}`：权重{weight_shape:?}，归一化{mode}");
        Ok((set, true))
    }

    fn new_initialized_param(
        &mut self,
        scope: &str,
        suffix: &str,
        shape: &[usize],
        init: &Init,
        trainable: bool,
    ) -> Result<NodeId, GraphError> {
        let value = self.init_tensor(init, shape)?;
        self.new_parameter_node(value, trainable, Some(&format!("{scope}/{suffix}")))
    }

    /// 以当前的 u 对该层权重做一步幂迭代
    pub fn spectral_step(&self, set: &ParamSet) -> Result<PowerIteration, GraphError> {
        let Some(u_id) = set.spectral_u else {
            return Err(GraphError::InvalidOperation(format!(
                "作用域`{}`不是谱归一化层",
                set.scope
            )));
        };
        let weights = self.param_value(set.weights)?;
        let u = self.param_value(u_id)?;
        Ok(power_iteration(weights, u, 1)?)
    }

    /// 执行一次延迟的奇异向量更新
    pub fn apply_spectral_update(&mut self, update: &SpectralUpdate) -> Result<(), GraphError> {
        let next = self.param_value(update.u)?.lerp_towards(&update.target, update.beta)?;
        self.set_node_value(update.u, next)
    }

    fn param_value(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        self.get_node_value(id)?.ok_or_else(|| {
            GraphError::InvalidOperation(format!("节点{id}不是参数节点，没有值"))
        })
    }

    // ========== 权重惩罚 ==========

    pub fn add_weight_penalty(&mut self, penalty: WeightPenalty) {
        self.penalties.push(penalty);
    }

    pub fn penalties(&self) -> &[WeightPenalty] {
        &self.penalties
    }

    /// 单个惩罚项的当前取值：`coefficient · Σw² / 2`
    pub fn penalty_value(&self, penalty: &WeightPenalty) -> Result<f32, GraphError> {
        let weights = self.param_value(penalty.weights)?;
        Ok(penalty.coefficient * weights.sum_squares() / 2.0)
    }

    /// 所有惩罚项之和
    pub fn regularization_loss(&self) -> Result<f32, GraphError> {
        self.penalties
            .iter()
            .map(|p| self.penalty_value(p))
            .sum()
    }
}
