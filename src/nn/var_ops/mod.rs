/*
 * @Date         : 2026-03-02
 * @Description  : Var 扩展 trait 模块
 *
 * 按功能领域组织 Var 的扩展方法，用户按需 import。
 *
 * - `activation`: 激活函数（relu）
 * - `shape`: 形状变换（flatten, concat）
 */

mod activation;
mod shape;

pub use activation::VarActivationOps;
pub use shape::VarShapeOps;
