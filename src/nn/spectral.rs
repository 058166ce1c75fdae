/*
 * @Date         : 2026-03-02
 * @Description  : 谱归一化的幂迭代
 *
 * 权重按最后一维展开为矩阵 W [m, n]，u 为 [1, n]：
 *   v  = l2norm(u Wᵀ)
 *   u' = l2norm(v W)
 *   σ  = v W u'ᵀ
 * 归一化后的权重为 W / σ。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use ndarray::Array2;

pub const L2_NORM_EPSILON: f32 = 1e-12;

/// `x / (‖x‖₂ + ε)`
pub fn l2_normalize(x: &Array2<f32>) -> Array2<f32> {
    let norm = x.iter().map(|v| v * v).sum::<f32>().sqrt();
    x / (norm + L2_NORM_EPSILON)
}

/// 一次（或多次）幂迭代的结果
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIteration {
    /// 右奇异向量的新估计 [1, n]
    pub u: Tensor,
    /// 左奇异向量的估计 [1, m]
    pub v: Tensor,
    pub sigma: f32,
}

pub fn power_iteration(
    weights: &Tensor,
    u: &Tensor,
    num_iters: usize,
) -> Result<PowerIteration, TensorError> {
    let w = weights.to_matrix()?;
    let mut u_hat = u.to_matrix()?;
    if u_hat.dim() != (1, w.ncols()) {
        return Err(TensorError::IncompatibleReshape {
            from: u.shape().to_vec(),
            to: vec![1, w.ncols()],
        });
    }

    let mut v_hat = Array2::zeros((1, w.nrows()));
    for _ in 0..num_iters.max(1) {
        v_hat = l2_normalize(&u_hat.dot(&w.t()));
        u_hat = l2_normalize(&v_hat.dot(&w));
    }
    let sigma = v_hat.dot(&w).dot(&u_hat.t()).sum();

    Ok(PowerIteration {
        u: Tensor::from_matrix(u_hat),
        v: Tensor::from_matrix(v_hat),
        sigma,
    })
}
