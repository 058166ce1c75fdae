/*
 * @Date         : 2026-03-02
 * @Description  : describe / summary 单元测试
 */

use crate::nn::{
    normalized_conv2d, normalized_linear, DType, DynamicShape, Graph, GraphDescriptor, GraphError,
    LayerNorm, LayerOptions, NodeTypeDescriptor, Padding, VarActivationOps,
};

fn small_net(seed: u64) -> Result<Graph, GraphError> {
    let graph = Graph::with_name("small");
    graph.set_seed(seed);
    let x = graph.input(DynamicShape::with_dynamic_batch(&[8, 8, 3]), DType::F32, "x")?;
    let sn = LayerOptions::default().with_norm(LayerNorm::spectral_norm());
    let h = normalized_conv2d(&x, [3, 3, 3, 4], 2, "conv1", &sn)?.output.relu()?;
    let l2 = LayerOptions::default().with_norm(LayerNorm::none().with_weight_decay(1e-3));
    normalized_linear(&h, 10, "fc", &l2)?;
    Ok(graph)
}

#[test]
fn test_describe_structure() -> Result<(), GraphError> {
    let graph = small_net(1)?;
    let desc = graph.describe();

    assert_eq!(desc.name, "small");
    assert_eq!(desc.total_params(), graph.param_count());

    let input = desc.node("x").unwrap();
    assert_eq!(input.node_type, NodeTypeDescriptor::Input { dtype: DType::F32 });
    assert_eq!(input.output_shape.to_string(), "[?, 8, 8, 3]");
    assert!(input.parents.is_empty());

    let conv = desc.node("conv1/conv").unwrap();
    assert_eq!(
        conv.node_type,
        NodeTypeDescriptor::Conv2d {
            filter: [3, 3, 3, 4],
            stride: 2,
            padding: Padding::Same,
            spectral_norm: true,
        }
    );
    assert_eq!(conv.output_shape.to_string(), "[?, 4, 4, 4]");
    assert_eq!(conv.parents.len(), 3);

    let u = desc.node("conv1/u").unwrap();
    assert_eq!(u.node_type, NodeTypeDescriptor::Parameter { trainable: false });
    assert_eq!(u.param_count, Some(4));

    let fc = desc.node("fc/linear").unwrap();
    assert_eq!(
        fc.node_type,
        NodeTypeDescriptor::Linear {
            in_features: 64,
            out_features: 10,
            spectral_norm: false,
        }
    );
    Ok(())
}

#[test]
fn test_describe_ignores_parameter_values() -> Result<(), GraphError> {
    let a = small_net(1)?;
    let b = small_net(2)?;
    assert_eq!(a.describe(), b.describe());

    let wa = a.param_set("fc").unwrap().weights;
    assert_ne!(a.value_of(wa)?, b.value_of(wa)?);
    Ok(())
}

#[test]
fn test_describe_json_round_trip() -> Result<(), GraphError> {
    let desc = small_net(1)?.describe();
    let json = desc.to_json().unwrap();
    assert!(json.contains("\"type\": \"Conv2d\""));
    assert_eq!(GraphDescriptor::from_json(&json).unwrap(), desc);
    Ok(())
}

#[test]
fn test_summary_string() -> Result<(), GraphError> {
    let graph = small_net(1)?;
    let summary = graph.summary_string();

    assert!(summary.contains("conv1/conv"));
    assert!(summary.contains("[?, 4, 4, 4]"));
    assert!(summary.contains("Conv2d"));
    // 3*3*3*4 + 4 + 4 + 64*10 + 10
    assert!(summary.contains("总参数量: 766"));
    assert!(summary.contains("可训练参数: 762"));
    assert!(summary.contains("L2 惩罚: fc"));
    Ok(())
}
