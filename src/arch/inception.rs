/*
 * @Date         : 2026-03-02
 * @Description  : mini-Inception 结构
 *
 * 输入占位符 in_data [?, 28, 28, 3]，标签占位符 in_labels [?]。
 * conv1（3→96）之后交替堆叠 Inception 模块与下采样模块，
 * 7x7 平均池化（步长 1，SAME）后接 fc。
 *
 * - Inception 模块：1x1 卷积分支 + 3x3 卷积分支，沿通道拼接，输出 ch1 + ch3
 * - 下采样模块：3x3/2 卷积分支 + 3x3/2 最大池化分支，输出 ch3 + in_ch
 */

use super::builder::ArchBuilder;
use super::config::ArchConfig;
use super::output::{InceptionOutput, LayerKind};
use super::policy::{LayerRole, NormPolicy};
use crate::nn::{
    DType, DynamicShape, Graph, GraphError, LayerNorm, LayerOptions, LayerOutput, MaxPool2d,
    NormConv2d, Padding, Var, VarActivationOps, VarShapeOps,
};

/// 输入图像的 [H, W, C]
pub const INCEPTION_INPUT: [usize; 3] = [28, 28, 3];
const STEM_CHANNELS: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InceptionStage {
    Incept {
        name: &'static str,
        in_ch: usize,
        ch1: usize,
        ch3: usize,
    },
    Downsample {
        name: &'static str,
        in_ch: usize,
        ch3: usize,
    },
}

impl InceptionStage {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Incept { name, .. } | Self::Downsample { name, .. } => name,
        }
    }

    pub const fn in_channels(&self) -> usize {
        match self {
            Self::Incept { in_ch, .. } | Self::Downsample { in_ch, .. } => *in_ch,
        }
    }

    pub const fn out_channels(&self) -> usize {
        match self {
            Self::Incept { ch1, ch3, .. } => *ch1 + *ch3,
            Self::Downsample { in_ch, ch3, .. } => *ch3 + *in_ch,
        }
    }
}

pub const INCEPTION_STAGES: [InceptionStage; 10] = [
    InceptionStage::Incept { name: "incept2", in_ch: 96, ch1: 32, ch3: 32 },
    InceptionStage::Incept { name: "incept3", in_ch: 32 + 32, ch1: 32, ch3: 48 },
    InceptionStage::Downsample { name: "downsamp4", in_ch: 32 + 48, ch3: 80 },
    InceptionStage::Incept { name: "incept5", in_ch: 80 + 32 + 48, ch1: 112, ch3: 48 },
    InceptionStage::Incept { name: "incept6", in_ch: 112 + 48, ch1: 96, ch3: 64 },
    InceptionStage::Incept { name: "incept7", in_ch: 96 + 64, ch1: 80, ch3: 80 },
    InceptionStage::Incept { name: "incept8", in_ch: 80 + 80, ch1: 48, ch3: 96 },
    InceptionStage::Downsample { name: "downsamp9", in_ch: 48 + 96, ch3: 96 },
    InceptionStage::Incept { name: "incept10", in_ch: 96 + 48 + 96, ch1: 176, ch3: 160 },
    InceptionStage::Incept { name: "incept11", in_ch: 176 + 160, ch1: 176, ch3: 160 },
];

/// 模块的输出：拼接结果 + 各卷积分支
#[derive(Debug, Clone)]
pub struct BlockOutput {
    pub output: Var,
    pub branches: Vec<LayerOutput>,
}

fn check_in_channels(x: &Var, in_ch: usize, name: &str) -> Result<(), GraphError> {
    let shape = x.shape()?;
    if shape.channels() != Some(in_ch) {
        return Err(GraphError::ShapeMismatch {
            expected: vec![in_ch],
            got: shape.channels().into_iter().collect(),
            message: format!("模块`{name}`声明的输入通道数为{in_ch}，实际输入为{shape}"),
        });
    }
    Ok(())
}

/// Inception 模块：`name/conv_ch1`（1x1）与 `name/conv_ch3`（3x3）两个分支
pub fn incept(
    x: &Var,
    in_ch: usize,
    ch1: usize,
    ch3: usize,
    options: &LayerOptions,
    name: &str,
) -> Result<BlockOutput, GraphError> {
    check_in_channels(x, in_ch, name)?;

    let graph = x.get_graph();
    let conv_ch1 = NormConv2d::new(
        &graph,
        [1, 1, in_ch, ch1],
        1,
        &format!("{name}/conv_ch1"),
        options.clone(),
    );
    let conv_ch3 = NormConv2d::new(
        &graph,
        [3, 3, in_ch, ch3],
        1,
        &format!("{name}/conv_ch3"),
        options.clone(),
    );
    // 两个分支都通过校验后才新建参数
    conv_ch1.check_input(x)?;
    conv_ch3.check_input(x)?;

    let branch1 = conv_ch1.forward(x)?;
    let branch3 = conv_ch3.forward(x)?;
    let act1 = branch1.output.relu()?;
    let act3 = branch3.output.relu()?;
    let output = act1.concat(&[&act3], Some(&format!("{name}/concat")))?;

    Ok(BlockOutput {
        output,
        branches: vec![branch1, branch3],
    })
}

/// 下采样模块：`name/conv_ch3`（3x3/2）与 `name/pool`（3x3/2 SAME 最大池化）两个分支
pub fn downsample(
    x: &Var,
    in_ch: usize,
    ch3: usize,
    options: &LayerOptions,
    name: &str,
) -> Result<BlockOutput, GraphError> {
    check_in_channels(x, in_ch, name)?;

    let conv_ch3 = NormConv2d::new(
        &x.get_graph(),
        [3, 3, in_ch, ch3],
        2,
        &format!("{name}/conv_ch3"),
        options.clone(),
    );
    conv_ch3.check_input(x)?;

    let branch3 = conv_ch3.forward(x)?;
    let act3 = branch3.output.relu()?;
    let pooled = MaxPool2d::new((3, 3), (2, 2), Padding::Same, &format!("{name}/pool")).forward(x)?;
    let output = act3.concat(&[&pooled], Some(&format!("{name}/concat")))?;

    Ok(BlockOutput {
        output,
        branches: vec![branch3],
    })
}

/// 逐级核对模块表中声明的输入通道数与上游输出通道数
pub fn check_stage_channels(stages: &[InceptionStage]) -> Result<(), GraphError> {
    let mut channels = STEM_CHANNELS;
    for stage in stages {
        if stage.in_channels() != channels {
            return Err(GraphError::ShapeMismatch {
                expected: vec![stage.in_channels()],
                got: vec![channels],
                message: format!("模块`{}`声明的输入通道数与上游输出不一致", stage.name()),
            });
        }
        channels = stage.out_channels();
    }
    Ok(())
}

/// 在 `graph` 上创建占位符并构建 mini-Inception
///
/// 每个模块声明的输入通道数都会与上一模块的实际输出通道数核对。
/// 策略覆盖按模块名（如 `incept2`）或 `conv1` / `fc` 生效。
pub fn build_inception(
    graph: &Graph,
    config: &ArchConfig,
    policy: &NormPolicy,
) -> Result<InceptionOutput, GraphError> {
    let mut builder = ArchBuilder::new("mini-Inception", graph, config, policy)?;
    check_stage_channels(&INCEPTION_STAGES)?;

    // 占位符在 conv1 的作用域确认可用后才创建
    let stem_filter = [3, 3, INCEPTION_INPUT[2], STEM_CHANNELS];
    builder.check_scope("conv1", &stem_filter, LayerRole::Conv)?;
    let input = graph.input(DynamicShape::with_dynamic_batch(&INCEPTION_INPUT), DType::F32, "in_data")?;
    let labels = graph.input(DynamicShape::with_dynamic_batch(&[]), DType::I64, "in_labels")?;

    let mut x = builder.conv_relu(&input, stem_filter, 1, "conv1", LayerRole::Conv)?;

    for stage in INCEPTION_STAGES {
        let options = builder.options_for(stage.name(), LayerRole::Conv);
        let norm = options.norm;
        let block = match stage {
            InceptionStage::Incept { name, in_ch, ch1, ch3 } => {
                incept(&x, in_ch, ch1, ch3, &options, name)?
            }
            InceptionStage::Downsample { name, in_ch, ch3 } => {
                downsample(&x, in_ch, ch3, &options, name)?
            }
        };
        for branch in block.branches {
            builder.record(LayerKind::Conv2d, norm, branch)?;
        }
        x = block.output;
    }

    let pooled = builder.avg_pool(&x, (7, 7), (1, 1), Padding::Same, "mean_pool12")?;
    let logits = builder.linear(&pooled, config.num_classes, "fc", LayerRole::Classifier)?;

    Ok(InceptionOutput {
        input,
        labels,
        output: builder.finish(logits)?,
    })
}

fn build_fresh(
    name: &str,
    num_classes: usize,
    weight_decay: f32,
    policy: &NormPolicy,
) -> Result<InceptionOutput, GraphError> {
    let config = ArchConfig::new(num_classes).with_weight_decay(weight_decay);
    build_inception(&Graph::with_name(name), &config, policy)
}

/// 基线：模块内批归一化；conv1 与 fc 不归一化
pub fn inception(num_classes: usize, weight_decay: f32) -> Result<InceptionOutput, GraphError> {
    let policy = NormPolicy::all_batch_norm().with_override("conv1", LayerNorm::none());
    build_fresh("inception", num_classes, weight_decay, &policy)
}

/// 所有层谱归一化
pub fn inception_sn(num_classes: usize, weight_decay: f32) -> Result<InceptionOutput, GraphError> {
    build_fresh("inception_sn", num_classes, weight_decay, &NormPolicy::all_spectral())
}

/// 除 fc 外谱归一化，fc 使用 L2 惩罚
pub fn inception_sar(num_classes: usize, weight_decay: f32) -> Result<InceptionOutput, GraphError> {
    build_fresh(
        "inception_sar",
        num_classes,
        weight_decay,
        &NormPolicy::spectral_except_last(weight_decay),
    )
}
