/*
 * @Date         : 2026-03-02
 * @Description  : 谱归一化 u 更新的三种去向：立即执行 / 延迟收集 / 丢弃
 */

use crate::assert_err;
use crate::nn::{
    normalized_conv2d, DType, DynamicShape, Graph, GraphError, LayerNorm, LayerOptions, Reuse,
    UpdateCollection, Var,
};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

const COLLECTION: &str = "SPECTRAL_NORM_UPDATE_OPS";

fn setup() -> Result<(Graph, Var), GraphError> {
    let graph = Graph::new_with_seed(2024);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[14, 14, 16]), DType::F32, "x")?;
    Ok((graph, x))
}

fn spectral(collection: UpdateCollection) -> LayerOptions {
    LayerOptions::default()
        .with_norm(LayerNorm::spectral_norm())
        .with_update_collection(collection)
}

/// 同种子、同顺序新建的参数取值相同，用来拿到更新前的 u
fn initial_u() -> Result<Tensor, GraphError> {
    let (graph, x) = setup()?;
    let out = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &spectral(UpdateCollection::NoOps))?;
    Ok(graph.value_of(out.params.spectral_u.unwrap())?.unwrap())
}

#[test]
fn test_inline_update_is_applied_immediately() -> Result<(), GraphError> {
    let before = initial_u()?;
    let (graph, x) = setup()?;
    let out = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &spectral(UpdateCollection::Inline))?;

    assert!(out.update.is_none());
    let after = graph.value_of(out.params.spectral_u.unwrap())?.unwrap();
    assert_ne!(after, before);
    assert_abs_diff_eq!(after.sum_squares(), 1.0, epsilon = 1e-4);
    Ok(())
}

#[test]
fn test_named_update_is_deferred() -> Result<(), GraphError> {
    let before = initial_u()?;
    let (graph, x) = setup()?;
    let out = normalized_conv2d(
        &x,
        [3, 3, 16, 8],
        1,
        "conv",
        &spectral(UpdateCollection::named(COLLECTION)),
    )?;
    let u = out.params.spectral_u.unwrap();

    let update = out.update.clone().unwrap();
    assert_eq!(update.scope, "conv");
    assert_eq!(update.collection, COLLECTION);
    assert_eq!(update.u, u);
    assert_eq!(Some(update.sigma), out.sigma);
    assert_eq!(graph.value_of(u)?.unwrap(), before);

    graph.apply_updates(&[update.clone()])?;
    assert_eq!(graph.value_of(u)?.unwrap(), update.target);
    Ok(())
}

#[test]
fn test_no_ops_update_is_dropped() -> Result<(), GraphError> {
    let before = initial_u()?;
    let (graph, x) = setup()?;
    let out = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &spectral(UpdateCollection::NoOps))?;

    assert!(out.update.is_none());
    assert!(out.sigma.is_some());
    assert_eq!(graph.value_of(out.params.spectral_u.unwrap())?.unwrap(), before);
    Ok(())
}

#[test]
fn test_beta_blends_old_and_new_estimate() -> Result<(), GraphError> {
    let before = initial_u()?;
    let (graph, x) = setup()?;
    let options = spectral(UpdateCollection::named(COLLECTION)).with_beta(0.25);
    let out = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &options)?;
    let update = out.update.unwrap();
    assert_eq!(update.beta, 0.25);

    graph.apply_updates(std::slice::from_ref(&update))?;
    let after = graph.value_of(update.u)?.unwrap().to_vec();
    for ((a, old), new) in after.iter().zip(before.to_vec()).zip(update.target.to_vec()) {
        assert_abs_diff_eq!(*a, 0.25 * new + 0.75 * old, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_reused_layer_sees_updated_u() -> Result<(), GraphError> {
    let (graph, x) = setup()?;
    let options = spectral(UpdateCollection::Inline);
    let first = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &options)?;
    let u = first.params.spectral_u.unwrap();
    let after_first = graph.value_of(u)?.unwrap();

    let second = normalized_conv2d(&x, [3, 3, 16, 8], 1, "conv", &options.with_reuse(Reuse::Reuse))?;
    assert_eq!(second.params.spectral_u, Some(u));
    assert!(second.sigma.is_some());
    assert_ne!(graph.value_of(u)?.unwrap(), after_first);
    Ok(())
}

#[test]
fn test_apply_update_with_wrong_shape() -> Result<(), GraphError> {
    let (graph, x) = setup()?;
    let out = normalized_conv2d(
        &x,
        [3, 3, 16, 8],
        1,
        "conv",
        &spectral(UpdateCollection::named(COLLECTION)),
    )?;
    let mut update = out.update.unwrap();
    update.target = Tensor::zeros(&[1, 4]);
    assert_err!(graph.apply_updates(&[update]), GraphError::Tensor(_));
    Ok(())
}
