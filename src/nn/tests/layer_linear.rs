/*
 * @Date         : 2026-03-02
 * @Description  : 带归一化的全连接层单元测试：自动展平与 L2 惩罚登记
 */

use crate::assert_err;
use crate::nn::{
    normalized_linear, DType, DynamicShape, Graph, GraphError, LayerNorm, LayerOptions, NormLinear,
    Reuse,
};
use approx::assert_abs_diff_eq;

#[test]
fn test_linear_flattens_4d_input() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(1);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[2, 2, 512]), DType::F32, "pooled")?;
    let out = normalized_linear(&x, 512, "linear14", &LayerOptions::default())?;

    assert_eq!(out.output.shape()?.to_string(), "[?, 512]");
    assert_eq!(out.output.name()?, "linear14/linear");
    assert_eq!(out.params.weight_shape, vec![2048, 512]);
    assert_eq!(graph.param_count(), 2048 * 512 + 512);
    Ok(())
}

#[test]
fn test_linear_keeps_2d_input() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(1);
    let x = graph.input(DynamicShape::fixed(&[16, 64]), DType::F32, "h")?;
    let layer = NormLinear::new(&graph, 10, "fc", LayerOptions::default());
    assert_eq!(layer.scope(), "fc");

    let out = layer.forward(&x)?;
    assert_eq!(out.output.shape()?, DynamicShape::fixed(&[16, 10]));
    Ok(())
}

#[test]
fn test_linear_rejects_zero_outputs() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[8]), DType::F32, "h")?;
    assert_err!(
        normalized_linear(&x, 0, "fc", &LayerOptions::default()),
        GraphError::InvalidOperation(_)
    );
    Ok(())
}

#[test]
fn test_l2_penalty_registered_on_creation() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(3);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[512]), DType::F32, "h")?;
    let options = LayerOptions::default().with_norm(LayerNorm::none().with_weight_decay(1e-4));
    let out = normalized_linear(&x, 10, "fc", &options)?;

    let penalty = out.penalty.clone().unwrap();
    assert_eq!(penalty.scope, "fc");
    assert_eq!(penalty.weights, out.params.weights);
    assert_eq!(penalty.coefficient, 1e-4);
    assert_eq!(graph.penalties(), vec![penalty.clone()]);

    let weights = graph.value_of(out.params.weights)?.unwrap();
    let expected = 1e-4 * weights.sum_squares() / 2.0;
    assert_abs_diff_eq!(graph.penalty_value(&penalty)?, expected, epsilon = 1e-9);
    assert_abs_diff_eq!(graph.regularization_loss()?, expected, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_reuse_does_not_duplicate_penalty() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(3);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[512]), DType::F32, "h")?;
    let options = LayerOptions::default().with_norm(LayerNorm::none().with_weight_decay(1e-4));
    normalized_linear(&x, 10, "fc", &options)?;

    let reused = normalized_linear(&x, 10, "fc", &options.clone().with_reuse(Reuse::Reuse))?;
    assert!(!reused.created);
    assert!(reused.penalty.is_none());
    assert_eq!(graph.penalties().len(), 1);
    Ok(())
}

#[test]
fn test_zero_weight_decay_registers_nothing() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[512]), DType::F32, "h")?;
    let options = LayerOptions::default().with_norm(LayerNorm::none().with_weight_decay(0.0));
    let out = normalized_linear(&x, 10, "fc", &options)?;
    assert!(out.penalty.is_none());
    assert!(graph.penalties().is_empty());
    assert_eq!(graph.regularization_loss()?, 0.);
    Ok(())
}

#[test]
fn test_linear_with_spectral_norm() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(5);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[2048]), DType::F32, "h")?;
    let options = LayerOptions::default().with_norm(LayerNorm::spectral_norm());
    let out = normalized_linear(&x, 512, "linear14", &options)?;

    let u = out.params.spectral_u.unwrap();
    assert_eq!(graph.value_of(u)?.unwrap().shape(), &[1, 512]);
    assert!(out.sigma.unwrap() > 0.);
    Ok(())
}

#[test]
fn test_scope_collision_adds_no_flatten_node() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(DynamicShape::with_dynamic_batch(&[2, 2, 8]), DType::F32, "h")?;
    normalized_linear(&x, 10, "fc", &LayerOptions::default())?;
    let nodes = graph.nodes_count();

    assert_err!(
        normalized_linear(&x, 10, "fc", &LayerOptions::default()),
        GraphError::ScopeCollision("fc")
    );
    assert_eq!(graph.nodes_count(), nodes);
    Ok(())
}
