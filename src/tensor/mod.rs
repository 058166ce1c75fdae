/*
 * @Date         : 2026-03-02
 * @Description  : 参数张量：对 ndarray 的薄封装，只承载参数值（权重、偏置、BN 统计量、奇异向量估计）
 *
 * 激活值是符号化的（见 nn::Var），这里不实现卷积/池化等算子。
 */

use ndarray::{Array, Array1, Array2, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;

use crate::errors::{ComparisonOperator, TensorError};

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 用给定数据和形状创建张量，`data`的长度必须和`shape`中所有元素的乘积相等。
    pub fn new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Tensor { data })
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个均匀分布的随机张量，其值在[min, max]的闭区间
    pub fn new_uniform_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let dist = Uniform::new_inclusive(low, high);
        let data = Array::from_shape_simple_fn(IxDyn(shape), || dist.sample(rng));
        Tensor { data }
    }

    /// 创建一个服从正态分布的随机张量
    pub fn new_normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Result<Tensor, TensorError> {
        let invalid_std = || TensorError::ValueMustSatisfyComparison {
            value_name: "标准差".to_string(),
            operator: ComparisonOperator::GreaterOrEqual,
            threshold: 0,
        };
        // rand_distr 0.4 的 Normal::new 接受负的标准差
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(invalid_std());
        }
        let dist = Normal::new(mean, std_dev).map_err(|_| invalid_std())?;
        let data = Array::from_shape_simple_fn(IxDyn(shape), || dist.sample(rng));
        Ok(Tensor { data })
    }

    /// 由二维矩阵创建张量
    pub fn from_matrix(matrix: Array2<f32>) -> Tensor {
        Tensor {
            data: matrix.into_dyn(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 元素个数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 所有元素的平方和
    pub fn sum_squares(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// 按最后一维展开为矩阵 `[-1, last_dim]`
    ///
    /// 卷积核 `[kH, kW, C_in, C_out]` 会被展开为 `[kH*kW*C_in, C_out]`。
    pub fn to_matrix(&self) -> Result<Array2<f32>, TensorError> {
        let shape = self.shape();
        let Some(&cols) = shape.last() else {
            return Err(TensorError::ValueMustSatisfyComparison {
                value_name: "张量维数".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 1,
            });
        };
        if cols == 0 {
            return Err(TensorError::IncompatibleShape);
        }
        let rows = self.size() / cols;
        Array1::from_iter(self.data.iter().copied())
            .into_shape((rows, cols))
            .map_err(|_| TensorError::IncompatibleReshape {
                from: shape.to_vec(),
                to: vec![rows, cols],
            })
    }

    /// 指数滑动更新：`beta * target + (1 - beta) * self`
    pub fn lerp_towards(&self, target: &Tensor, beta: f32) -> Result<Tensor, TensorError> {
        if self.shape() != target.shape() {
            return Err(TensorError::IncompatibleShape);
        }
        let data = &target.data * beta + &self.data * (1.0 - beta);
        Ok(Tensor { data })
    }
}
