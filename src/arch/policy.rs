/*
 * @Date         : 2026-03-02
 * @Description  : 归一化策略：层角色 -> 单层归一化方式
 *
 * | 角色       | AllSpectral | AllBatchNorm | SpectralExceptLast |
 * |------------|-------------|--------------|--------------------|
 * | Conv       | 谱归一化    | 批归一化     | 谱归一化           |
 * | Hidden     | 谱归一化    | 无           | 谱归一化           |
 * | Classifier | 谱归一化    | 无           | 无 + L2(wd)        |
 *
 * 预设之外可以按作用域名覆盖单层的设置。
 */

use crate::nn::{GraphError, LayerNorm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    AllSpectral,
    AllBatchNorm,
    SpectralExceptLast,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllSpectral => write!(f, "all_spectral"),
            Self::AllBatchNorm => write!(f, "all_batch_norm"),
            Self::SpectralExceptLast => write!(f, "spectral_except_last"),
        }
    }
}

/// 带参层在拓扑中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerRole {
    /// 卷积层（含 Inception / 下采样模块中的分支）
    Conv,
    /// 分类层之前的全连接层
    Hidden,
    /// 输出 logits 的最后一层
    Classifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormPolicy {
    kind: PolicyKind,
    weight_decay: f32,
    overrides: BTreeMap<String, LayerNorm>,
}

impl NormPolicy {
    pub fn new(kind: PolicyKind, weight_decay: f32) -> Self {
        Self {
            kind,
            weight_decay,
            overrides: BTreeMap::new(),
        }
    }

    pub fn all_spectral() -> Self {
        Self::new(PolicyKind::AllSpectral, 0.0)
    }

    pub fn all_batch_norm() -> Self {
        Self::new(PolicyKind::AllBatchNorm, 0.0)
    }

    pub fn spectral_except_last(weight_decay: f32) -> Self {
        Self::new(PolicyKind::SpectralExceptLast, weight_decay)
    }

    /// 覆盖指定作用域的归一化方式
    pub fn with_override(mut self, scope: &str, norm: LayerNorm) -> Self {
        self.overrides.insert(scope.to_string(), norm);
        self
    }

    pub const fn kind(&self) -> PolicyKind {
        self.kind
    }

    pub const fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    /// 预设表中某角色的归一化方式
    pub fn preset(&self, role: LayerRole) -> LayerNorm {
        match (self.kind, role) {
            (PolicyKind::AllSpectral, _) => LayerNorm::spectral_norm(),
            (PolicyKind::AllBatchNorm, LayerRole::Conv) => LayerNorm::batch_norm(),
            (PolicyKind::AllBatchNorm, _) => LayerNorm::none(),
            (PolicyKind::SpectralExceptLast, LayerRole::Classifier) => {
                LayerNorm::none().with_weight_decay(self.weight_decay)
            }
            (PolicyKind::SpectralExceptLast, _) => LayerNorm::spectral_norm(),
        }
    }

    /// 作用域 `scope` 上实际使用的归一化方式（覆盖优先）
    pub fn norm_for(&self, scope: &str, role: LayerRole) -> LayerNorm {
        self.overrides
            .get(scope)
            .copied()
            .unwrap_or_else(|| self.preset(role))
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.weight_decay.is_finite() || self.weight_decay < 0.0 {
            return Err(GraphError::InvalidPolicy(format!(
                "{}策略的权重衰减系数必须是非负有限数，得到{}",
                self.kind, self.weight_decay
            )));
        }
        for (scope, norm) in &self.overrides {
            norm.validate(scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err;
    use crate::nn::NormMode;

    #[test]
    fn test_preset_table() {
        let sn = NormPolicy::all_spectral();
        for role in [LayerRole::Conv, LayerRole::Hidden, LayerRole::Classifier] {
            assert_eq!(sn.preset(role).mode, NormMode::SpectralNorm);
            assert_eq!(sn.preset(role).l2_coefficient(), None);
        }

        let bn = NormPolicy::all_batch_norm();
        assert_eq!(bn.preset(LayerRole::Conv).mode, NormMode::BatchNorm);
        assert_eq!(bn.preset(LayerRole::Hidden).mode, NormMode::None);
        assert_eq!(bn.preset(LayerRole::Classifier).mode, NormMode::None);

        let sar = NormPolicy::spectral_except_last(1e-4);
        assert_eq!(sar.preset(LayerRole::Conv).mode, NormMode::SpectralNorm);
        assert_eq!(sar.preset(LayerRole::Hidden).mode, NormMode::SpectralNorm);
        let last = sar.preset(LayerRole::Classifier);
        assert_eq!(last.mode, NormMode::None);
        assert_eq!(last.l2_coefficient(), Some(1e-4));
    }

    #[test]
    fn test_zero_weight_decay_disables_l2() {
        let sar = NormPolicy::spectral_except_last(0.0);
        assert_eq!(sar.preset(LayerRole::Classifier).l2_coefficient(), None);
    }

    #[test]
    fn test_override_wins() {
        let policy = NormPolicy::all_batch_norm().with_override("conv1", LayerNorm::none());
        assert_eq!(policy.norm_for("conv1", LayerRole::Conv), LayerNorm::none());
        assert_eq!(policy.norm_for("incept2", LayerRole::Conv), LayerNorm::batch_norm());
    }

    #[test]
    fn test_validate_rejects_spectral_with_l2() {
        let policy = NormPolicy::all_spectral()
            .with_override("fc", LayerNorm::spectral_norm().with_weight_decay(1e-4));
        assert_err!(policy.validate(), GraphError::InvalidPolicy(msg) if msg.contains("fc"));

        assert_err!(
            NormPolicy::spectral_except_last(-1.0).validate(),
            GraphError::InvalidPolicy(_)
        );
        assert!(NormPolicy::spectral_except_last(1e-4).validate().is_ok());
    }
}
