use super::Tensor;
use crate::errors::TensorError;
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_new_with_mismatched_data_len() {
    let err = Tensor::new(&[1., 2., 3.], &[2, 2]).unwrap_err();
    assert_eq!(
        err,
        TensorError::DataShapeMismatch {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
fn test_zeros_ones_and_size() {
    let zeros = Tensor::zeros(&[3, 3, 2, 4]);
    assert_eq!(zeros.shape(), &[3, 3, 2, 4]);
    assert_eq!(zeros.size(), 72);
    assert_eq!(zeros.sum_squares(), 0.);

    let ones = Tensor::ones(&[5]);
    assert_eq!(ones.sum_squares(), 5.);
}

#[test]
fn test_uniform_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let t = Tensor::new_uniform_with_rng(-0.25, 0.25, &[64, 32], &mut rng);
    assert!(t.to_vec().iter().all(|x| (-0.25..=0.25).contains(x)));
}

#[test]
fn test_normal_rejects_negative_std() {
    let mut rng = StdRng::seed_from_u64(7);
    for std_dev in [-1., -f32::MIN_POSITIVE, f32::NAN, f32::INFINITY] {
        let err = Tensor::new_normal_with_rng(0., std_dev, &[2], &mut rng).unwrap_err();
        assert!(err.to_string().contains("标准差"), "{err}");
    }
    let zero = Tensor::new_normal_with_rng(1.5, 0., &[3], &mut rng).unwrap();
    assert_eq!(zero.to_vec(), vec![1.5; 3]);
    let t = Tensor::new_normal_with_rng(0., 1., &[1, 16], &mut rng).unwrap();
    assert_eq!(t.shape(), &[1, 16]);
}

#[test]
fn test_to_matrix_flattens_leading_dims() {
    let data: Vec<f32> = (0..24).map(|x| x as f32).collect();
    let t = Tensor::new(&data, &[2, 2, 3, 2]).unwrap();
    let m = t.to_matrix().unwrap();
    assert_eq!(m.dim(), (12, 2));
    assert_eq!(m[[0, 1]], 1.);
    assert_eq!(m[[11, 0]], 22.);

    assert!(Tensor::zeros(&[]).to_matrix().is_err());
}

#[test]
fn test_lerp_towards() {
    let u = Tensor::new(&[1., 0.], &[1, 2]).unwrap();
    let target = Tensor::new(&[0., 1.], &[1, 2]).unwrap();

    let full = u.lerp_towards(&target, 1.).unwrap();
    assert_eq!(full, target);

    let half = u.lerp_towards(&target, 0.5).unwrap().to_vec();
    assert_abs_diff_eq!(half[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(half[1], 0.5, epsilon = 1e-6);

    let wrong = Tensor::zeros(&[2, 1]);
    assert_eq!(u.lerp_towards(&wrong, 0.5), Err(TensorError::IncompatibleShape));
}
