/*
 * @Date         : 2026-03-02
 * @Description  : 网络结构：VGG 与 mini-Inception
 *
 * 每种结构只有一个拓扑函数（`build_vgg` / `build_inception`），
 * 三种归一化方案由 `NormPolicy` 预设表达：
 * - `vgg` / `inception`：全部批归一化（基线）
 * - `vgg_sn` / `inception_sn`：全部谱归一化
 * - `vgg_snl2` / `inception_sar`：除最后一层外谱归一化，最后一层可加 L2
 */

mod builder;
mod config;
mod inception;
mod output;
mod policy;
mod vgg;

pub use builder::ArchBuilder;
pub use config::ArchConfig;
pub use inception::{
    build_inception, check_stage_channels, downsample, incept, inception, inception_sar,
    inception_sn, BlockOutput, InceptionStage, INCEPTION_INPUT, INCEPTION_STAGES,
};
pub use output::{ArchOutput, InceptionOutput, LayerKind, LayerRecord};
pub use policy::{LayerRole, NormPolicy, PolicyKind};
pub use vgg::{build_vgg, vgg, vgg_sn, vgg_snl2, VggStage, VGG_FEATURES};
