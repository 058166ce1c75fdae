/*
 * @Date         : 2026-03-02
 * @Description  : Module trait 定义
 */

use super::Var;

/// 模块 trait
///
/// - `forward()` 与 `new()` 不是 trait 方法（各层签名不同）
/// - `parameters()` 返回该模块的全部参数节点（含 BN 滑动统计和谱归一化的 u）
///
/// ```ignore
/// let conv = NormConv2d::new(&graph, [3, 3, 3, 64], 1, "conv1", options);
/// let out = conv.forward(&x)?;
/// println!("{} 个参数节点", conv.num_params());
/// ```
pub trait Module {
    fn parameters(&self) -> Vec<Var>;

    /// 参数节点个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 参数元素总数
    fn num_param_elements(&self) -> usize {
        self.parameters()
            .iter()
            .filter_map(|p| p.value().ok().flatten())
            .map(|t| t.size())
            .sum()
    }
}
