/*
 * @Date         : 2026-03-02
 * @Description  : 结构构建配置
 */

use crate::nn::{GraphError, LayerNorm, LayerOptions, Reuse, UpdateCollection};
use serde::{Deserialize, Serialize};

/// 传给结构构建函数的静态配置
///
/// 可以从 JSON 读取，缺省字段取默认值：
/// ```
/// use spectral_arch::arch::ArchConfig;
///
/// let config = ArchConfig::from_json(r#"{ "num_classes": 100, "weight_decay": 1e-4 }"#).unwrap();
/// assert_eq!(config.num_classes, 100);
/// assert_eq!(config.beta, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchConfig {
    pub num_classes: usize,
    /// L2 权重衰减系数，只在带 L2 的预设中生效
    pub weight_decay: f32,
    pub update_collection: UpdateCollection,
    /// 奇异向量估计的滑动系数
    pub beta: f32,
    pub reuse: Reuse,
    /// 批归一化是否更新滑动统计
    pub training: bool,
    /// 参数初始化的随机种子
    pub seed: Option<u64>,
}

impl Default for ArchConfig {
    fn default() -> Self {
        Self {
            num_classes: 10,
            weight_decay: 0.0,
            update_collection: UpdateCollection::Inline,
            beta: 1.0,
            reuse: Reuse::Create,
            training: false,
            seed: None,
        }
    }
}

impl ArchConfig {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            ..Self::default()
        }
    }

    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    pub fn with_update_collection(mut self, update_collection: UpdateCollection) -> Self {
        self.update_collection = update_collection;
        self
    }

    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_reuse(mut self, reuse: Reuse) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn with_training(mut self, training: bool) -> Self {
        self.training = training;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.num_classes == 0 {
            return Err(GraphError::InvalidConfig(
                "num_classes 必须大于 0".to_string(),
            ));
        }
        if !self.weight_decay.is_finite() || self.weight_decay < 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "weight_decay 必须是非负有限数，得到{}",
                self.weight_decay
            )));
        }
        if !(self.beta > 0.0 && self.beta <= 1.0) {
            return Err(GraphError::InvalidConfig(format!(
                "beta 必须在 (0, 1] 内，得到{}",
                self.beta
            )));
        }
        Ok(())
    }

    /// 某一层的构建选项
    pub fn layer_options(&self, norm: LayerNorm) -> LayerOptions {
        LayerOptions {
            norm,
            training: self.training,
            reuse: self.reuse,
            update_collection: self.update_collection.clone(),
            beta: self.beta,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GraphError::InvalidConfig(format!("配置 JSON 解析失败：{e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::InvalidConfig(format!("配置序列化失败：{e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_err;

    #[test]
    fn test_defaults_follow_builder_signatures() {
        let config = ArchConfig::default();
        assert_eq!(config.num_classes, 10);
        assert_eq!(config.weight_decay, 0.0);
        assert_eq!(config.update_collection, UpdateCollection::Inline);
        assert_eq!(config.beta, 1.0);
        assert_eq!(config.reuse, Reuse::Create);
        assert!(!config.training);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_err!(ArchConfig::new(0).validate(), GraphError::InvalidConfig(_));
        assert_err!(
            ArchConfig::default().with_weight_decay(-1e-4).validate(),
            GraphError::InvalidConfig(_)
        );
        assert_err!(
            ArchConfig::default().with_weight_decay(f32::NAN).validate(),
            GraphError::InvalidConfig(_)
        );
        assert_err!(ArchConfig::default().with_beta(0.0).validate(), GraphError::InvalidConfig(_));
        assert_err!(ArchConfig::default().with_beta(1.5).validate(), GraphError::InvalidConfig(_));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ArchConfig::new(100)
            .with_weight_decay(1e-4)
            .with_update_collection(UpdateCollection::named("sn_updates"))
            .with_beta(0.5)
            .with_reuse(Reuse::Reuse)
            .with_training(true)
            .with_seed(7);
        let json = config.to_json().unwrap();
        assert_eq!(ArchConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_validates() {
        assert_err!(
            ArchConfig::from_json(r#"{ "num_classes": 0 }"#),
            GraphError::InvalidConfig(_)
        );
        assert_err!(ArchConfig::from_json("not json"), GraphError::InvalidConfig(msg) if msg.contains("JSON"));
    }

    #[test]
    fn test_layer_options_carry_config() {
        let config = ArchConfig::default()
            .with_training(true)
            .with_beta(0.9)
            .with_update_collection(UpdateCollection::NoOps);
        let options = config.layer_options(LayerNorm::batch_norm());
        assert!(options.training);
        assert_eq!(options.beta, 0.9);
        assert_eq!(options.update_collection, UpdateCollection::NoOps);
        assert_eq!(options.norm, LayerNorm::batch_norm());
    }
}
