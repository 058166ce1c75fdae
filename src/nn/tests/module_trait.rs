/*
 * @Date         : 2026-03-02
 * @Description  : Module trait 在各层上的行为
 */

use crate::nn::{
    DType, DynamicShape, Graph, GraphError, LayerNorm, LayerOptions, Module, NormConv2d, NormLinear,
};

#[test]
fn test_parameters_before_and_after_forward() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(0);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[8, 8, 3]), DType::F32, "x")?;
    let conv = NormConv2d::new(
        &graph,
        [3, 3, 3, 16],
        1,
        "conv1",
        LayerOptions::default().with_norm(LayerNorm::batch_norm()),
    );
    assert_eq!(conv.num_params(), 0);

    conv.forward(&x)?;
    // weights, biases, gamma, beta, moving_mean, moving_variance
    assert_eq!(conv.num_params(), 6);
    assert_eq!(conv.num_param_elements(), 3 * 3 * 3 * 16 + 5 * 16);
    Ok(())
}

#[test]
fn test_spectral_layer_includes_u() -> Result<(), GraphError> {
    let graph = Graph::new_with_seed(0);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[64]), DType::F32, "x")?;
    let fc = NormLinear::new(
        &graph,
        10,
        "fc",
        LayerOptions::default().with_norm(LayerNorm::spectral_norm()),
    );
    let out = fc.forward(&x)?;

    assert_eq!(fc.num_params(), 3);
    assert_eq!(fc.num_param_elements(), 64 * 10 + 10 + 10);
    let names: Vec<String> = out
        .parameters()
        .iter()
        .map(|p| p.name())
        .collect::<Result<_, _>>()?;
    assert_eq!(names, vec!["fc/weights", "fc/biases", "fc/u"]);
    Ok(())
}
