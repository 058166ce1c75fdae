/*
 * @Date         : 2026-03-02
 * @Description  : VGG 结构
 *
 * 8 个 3x3 卷积（每两个后接 2x2/2 VALID 最大池化）→ 4x4 平均池化（步长 1，SAME）
 * → linear14（512）→ fc（num_classes）。每个卷积后接 ReLU，全连接层后不接激活。
 *
 * 32x32 输入：32 → 16 → 8 → 4 → 2，平均池化保持 2x2，展平后为 2*2*512 = 2048。
 *
 * mean_pool13 按 TF 的 `padding='SAME', strides=[1, 1]` 计算，输出空间尺寸不变，
 * 并不会把特征图压成 1x1。linear14 的输入维度依赖这一点。
 *
 * 本 crate 要求 H、W 是 16 的整数倍。TF 的 VALID 池化会向下取整，
 * 因此 36x36 这类输入在 TF 中也能构建，这里一律拒绝。
 */

use super::builder::ArchBuilder;
use super::config::ArchConfig;
use super::output::ArchOutput;
use super::policy::{LayerRole, NormPolicy};
use crate::nn::{GraphError, Padding, Var};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VggStage {
    /// 3x3 卷积：(作用域, 输入通道, 输出通道)
    Conv(&'static str, usize, usize),
    /// 2x2/2 最大池化
    Pool(&'static str),
}

pub const VGG_FEATURES: [VggStage; 12] = [
    VggStage::Conv("conv1", 3, 64),
    VggStage::Conv("conv2", 64, 64),
    VggStage::Pool("pool3"),
    VggStage::Conv("conv4", 64, 128),
    VggStage::Conv("conv5", 128, 128),
    VggStage::Pool("pool6"),
    VggStage::Conv("conv7", 128, 256),
    VggStage::Conv("conv8", 256, 256),
    VggStage::Pool("pool9"),
    VggStage::Conv("conv10", 256, 512),
    VggStage::Conv("conv11", 512, 512),
    VggStage::Pool("pool12"),
];

const HIDDEN_FEATURES: usize = 512;
/// 四次减半都整除，不依赖 VALID 池化的向下取整
const SPATIAL_DIVISOR: usize = 16;

/// 在 `input` 所在的图上构建 VGG
///
/// `input` 形状为 `[batch|?, H, W, 3]`，H、W 需能被 16 整除。
pub fn build_vgg(
    input: &Var,
    config: &ArchConfig,
    policy: &NormPolicy,
) -> Result<ArchOutput, GraphError> {
    let graph = input.get_graph();
    let mut builder = ArchBuilder::new("VGG", &graph, config, policy)?;

    let shape = input.shape()?;
    if shape.ndim() != 4 {
        return Err(GraphError::DimensionMismatch {
            expected: 4,
            got: shape.ndim(),
            message: "VGG 的输入必须是 [batch, H, W, 3]".to_string(),
        });
    }
    for (axis, dim) in [(1, shape.dim(1)), (2, shape.dim(2))] {
        match dim {
            Some(n) if n > 0 && n % SPATIAL_DIVISOR == 0 => {}
            _ => {
                return Err(GraphError::InvalidOperation(format!(
                    "VGG 输入第{axis}维必须是{SPATIAL_DIVISOR}的正整数倍（本 crate 的限制，\
                     不对 VALID 池化做向下取整），得到{shape}"
                )));
            }
        }
    }

    let mut x = input.clone();
    for stage in VGG_FEATURES {
        x = match stage {
            VggStage::Conv(scope, in_ch, out_ch) => {
                builder.conv_relu(&x, [3, 3, in_ch, out_ch], 1, scope, LayerRole::Conv)?
            }
            VggStage::Pool(name) => builder.max_pool(&x, (2, 2), (2, 2), Padding::Valid, name)?,
        };
    }

    let pooled = builder.avg_pool(&x, (4, 4), (1, 1), Padding::Same, "mean_pool13")?;
    let hidden = builder.linear(&pooled, HIDDEN_FEATURES, "linear14", LayerRole::Hidden)?;
    let logits = builder.linear(&hidden, config.num_classes, "fc", LayerRole::Classifier)?;

    builder.finish(logits)
}

/// 基线：卷积层批归一化，全连接层不归一化
pub fn vgg(input: &Var, config: &ArchConfig) -> Result<ArchOutput, GraphError> {
    build_vgg(input, config, &NormPolicy::all_batch_norm())
}

/// 所有层谱归一化
pub fn vgg_sn(input: &Var, config: &ArchConfig) -> Result<ArchOutput, GraphError> {
    build_vgg(input, config, &NormPolicy::all_spectral())
}

/// 除 fc 外谱归一化，fc 使用 `config.weight_decay` 的 L2 惩罚
pub fn vgg_snl2(input: &Var, config: &ArchConfig) -> Result<ArchOutput, GraphError> {
    build_vgg(input, config, &NormPolicy::spectral_except_last(config.weight_decay))
}
