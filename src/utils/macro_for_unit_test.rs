/// 错误断言宏：按需要的粒度验证 `Result` 中的错误
///
/// - `assert_err!(expr)`：只验证是 Err
/// - `assert_err!(expr, GraphError::ScopeCollision("conv1"))`：错误类型 + 精确的 String 内容
/// - `assert_err!(expr, GraphError::ShapeMismatch([96], [64]))`：ShapeMismatch 的 expected/got
/// - `assert_err!(expr, GraphError::InvalidPolicy(msg) if msg.contains("fc"))`：任意模式 + 条件
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        assert!($expr.is_err(), "预期 Err，实际得到 {:?}", $expr);
    };
    ($expr:expr, $err_type:ident :: ShapeMismatch ( $exp:expr, $got:expr )) => {
        match &$expr {
            Err($err_type::ShapeMismatch { expected, got, .. }) => {
                assert_eq!(expected.as_slice(), &$exp, "expected 不匹配");
                assert_eq!(got.as_slice(), &$got, "got 不匹配");
            }
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}::ShapeMismatch`，实际得到 `{:?}`",
                stringify!($err_type),
                e
            ),
            Ok(v) => panic!(
                "预期 Err({}::ShapeMismatch)，实际得到 Ok({:?})",
                stringify!($err_type),
                v
            ),
        }
    };
    ($expr:expr, $err_type:ident :: $variant:ident ( $expected:literal )) => {
        match &$expr {
            Err($err_type::$variant(actual)) => assert_eq!(
                actual, $expected,
                "错误消息不匹配：预期 `{}`，实际得到 `{}`",
                $expected, actual
            ),
            Err(e) => panic!(
                "错误类型不匹配：预期 `{}::{}`，实际得到 `{:?}`",
                stringify!($err_type),
                stringify!($variant),
                e
            ),
            Ok(v) => panic!(
                "预期 Err({}::{})，实际得到 Ok({:?})",
                stringify!($err_type),
                stringify!($variant),
                v
            ),
        }
    };
    ($expr:expr, $($pattern:tt)+) => {
        match &$expr {
            Err(e) => assert!(
                matches!(e, $($pattern)+),
                "错误类型不匹配：预期 `{}`，实际得到 `{:?}`",
                stringify!($($pattern)+),
                e
            ),
            Ok(v) => panic!(
                "预期 Err 匹配 `{}`，实际得到 Ok({:?})",
                stringify!($($pattern)+),
                v
            ),
        }
    };
}
