//! # 常用接口模块
//!
//! 测试用的断言宏（`assert_err!`）

pub mod macro_for_unit_test;
