/*
 * @Date         : 2026-03-02
 * @Description  : 参数存储：作用域名 -> 该层的参数集合
 *
 * 每层的参数在 `Reuse::Create` 时新建，在 `Reuse::Reuse` 时按作用域名绑定到
 * 已有集合。重复创建或复用不存在的作用域都是错误，不做静默回退。
 */

use super::norm::NormMode;
use super::{GraphError, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 参数的创建/复用语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reuse {
    #[default]
    Create,
    Reuse,
}

/// 批归一化的可训练参数与滑动统计量，形状都是 [C]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchNormParams {
    pub gamma: NodeId,
    pub beta: NodeId,
    pub moving_mean: NodeId,
    pub moving_variance: NodeId,
}

/// 一层的全部参数节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSet {
    pub scope: String,
    pub weights: NodeId,
    pub bias: NodeId,
    pub weight_shape: Vec<usize>,
    pub mode: NormMode,
    pub batch_norm: Option<BatchNormParams>,
    /// 谱归一化的右奇异向量估计 u [1, out]
    pub spectral_u: Option<NodeId>,
}

impl ParamSet {
    /// 该层持有的所有参数节点（含不可训练状态）
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.weights, self.bias];
        if let Some(bn) = &self.batch_norm {
            ids.extend([bn.gamma, bn.beta, bn.moving_mean, bn.moving_variance]);
        }
        ids.extend(self.spectral_u);
        ids
    }

    /// 可训练的参数节点
    pub fn trainable_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.weights, self.bias];
        if let Some(bn) = &self.batch_norm {
            ids.extend([bn.gamma, bn.beta]);
        }
        ids
    }
}

#[derive(Debug, Default)]
pub struct ParamStore {
    sets: BTreeMap<String, ParamSet>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &str) -> Option<&ParamSet> {
        self.sets.get(scope)
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.sets.contains_key(scope)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// 按字典序返回所有作用域名
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSet> {
        self.sets.values()
    }

    pub fn insert(&mut self, set: ParamSet) -> Result<(), GraphError> {
        if self.sets.contains_key(&set.scope) {
            return Err(GraphError::ScopeCollision(set.scope));
        }
        self.sets.insert(set.scope.clone(), set);
        Ok(())
    }

    /// 按 `reuse` 语义查找作用域
    ///
    /// - `Create`：作用域必须不存在，返回 `Ok(None)`，由调用方新建
    /// - `Reuse`：作用域必须存在，且权重形状与归一化模式一致
    pub fn resolve(
        &self,
        scope: &str,
        reuse: Reuse,
        weight_shape: &[usize],
        mode: NormMode,
    ) -> Result<Option<&ParamSet>, GraphError> {
        match reuse {
            Reuse::Create => {
                if self.contains(scope) {
                    return Err(GraphError::ScopeCollision(scope.to_string()));
                }
                Ok(None)
            }
            Reuse::Reuse => {
                let set = self
                    .get(scope)
                    .ok_or_else(|| GraphError::ScopeNotFound(scope.to_string()))?;
                if set.weight_shape != weight_shape {
                    return Err(GraphError::ShapeMismatch {
                        expected: set.weight_shape.clone(),
                        got: weight_shape.to_vec(),
                        message: format!("复用作用域`{scope}`时权重形状不一致"),
                    });
                }
                if set.mode != mode {
                    return Err(GraphError::InvalidOperation(format!(
                        "作用域`{scope}`以{}模式创建，不能以{mode}模式复用",
                        set.mode
                    )));
                }
                Ok(Some(set))
            }
        }
    }
}
