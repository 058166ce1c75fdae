/*
 * @Date         : 2026-03-02
 * @Description  : 池化层单元测试
 */

use crate::assert_err;
use crate::nn::{AvgPool2d, DType, DynamicShape, Graph, GraphError, MaxPool2d, Padding};

#[test]
fn test_max_pool_halves_spatial_dims() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[32, 32, 64]), DType::F32, "x")?;
    let pooled = MaxPool2d::new((2, 2), (2, 2), Padding::Valid, "pool3").forward(&x)?;
    assert_eq!(pooled.shape()?.to_string(), "[?, 16, 16, 64]");
    assert_eq!(pooled.name()?, "pool3");
    assert_eq!(graph.param_count(), 0);
    Ok(())
}

#[test]
fn test_avg_pool_same_keeps_spatial_dims() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[2, 2, 512]), DType::F32, "x")?;
    let pooled = AvgPool2d::new((4, 4), (1, 1), Padding::Same, "mean_pool13").forward(&x)?;
    assert_eq!(pooled.shape()?.to_string(), "[?, 2, 2, 512]");
    Ok(())
}

#[test]
fn test_pool_requires_4d_input() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[512]), DType::F32, "x")?;
    assert_err!(
        MaxPool2d::new((2, 2), (2, 2), Padding::Valid, "pool").forward(&x),
        GraphError::DimensionMismatch { expected: 4, .. }
    );
    Ok(())
}
