//! # Spectral Arch
//!
//! `spectral_arch` 用符号计算图描述 VGG 与 mini-Inception 两种卷积分类网络，
//! 每一层可以独立选择归一化方式（无 / 批归一化 / 谱归一化），并可在最后一层附加 L2 正则。
//!
//! 计算图只做形状推断，不求激活值；参数（权重、偏置、BN 统计量、谱归一化的奇异向量估计）
//! 则持有真实取值，因此可以统计参数量、计算 L2 惩罚、执行幂迭代。
//!
//! ```ignore
//! use spectral_arch::arch::{vgg_sn, ArchConfig};
//! use spectral_arch::nn::{DType, DynamicShape, Graph};
//!
//! let graph = Graph::new_with_seed(42);
//! let images = graph.input(DynamicShape::with_dynamic_batch(&[32, 32, 3]), DType::F32, "images")?;
//! let out = vgg_sn(&images, &ArchConfig::default())?;
//! assert_eq!(out.logits.shape()?.to_string(), "[?, 10]");
//! ```

pub mod arch;
pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
