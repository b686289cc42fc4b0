//! 标量统计小工具.
//!
//! 注意这里的标准差是总体标准差 (分母为 `n`), 与 numpy 的默认行为一致.

use num::Float;

/// 算术平均值. `xs` 不能为空, 否则 panic.
pub(crate) fn mean<F: Float>(xs: &[F]) -> F {
    assert!(!xs.is_empty(), "均值需要至少一个样本");
    let sum = xs.iter().fold(F::zero(), |acc, &x| acc + x);
    sum / F::from(xs.len()).unwrap()
}

/// 总体标准差 (分母 `n`). `xs` 不能为空, 否则 panic.
pub(crate) fn std_pop<F: Float>(xs: &[F]) -> F {
    let m = mean(xs);
    let sq_sum = xs
        .iter()
        .fold(F::zero(), |acc, &x| acc + (x - m) * (x - m));
    (sq_sum / F::from(xs.len()).unwrap()).sqrt()
}

/// 四舍五入到 `dp` 位小数.
#[inline]
pub(crate) fn round_dp(x: f64, dp: u32) -> f64 {
    let pow = 10f64.powi(dp as i32);
    (x * pow).round() / pow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_mean_basic() {
        assert!(f64_eq(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5));
        assert!(f64_eq(mean(&[5.0f64]), 5.0));
    }

    #[test]
    fn test_std_pop_basic() {
        // 总体标准差, 不是样本标准差.
        assert!(f64_eq(std_pop(&[1.0, 1.0, 1.0]), 0.0));
        assert!(f64_eq(std_pop(&[2.0, 4.0]), 1.0));
        assert!(f64_eq(std_pop(&[1.0, 2.0, 3.0, 4.0]), 1.25f64.sqrt()));
    }

    #[test]
    #[should_panic]
    fn test_mean_empty_panics() {
        mean::<f64>(&[]);
    }

    #[test]
    fn test_round_dp() {
        assert!(f64_eq(round_dp(1.23456, 2), 1.23));
        assert!(f64_eq(round_dp(1.235, 2), 1.24));
        assert!(f64_eq(round_dp(-0.0004, 3), -0.0));
        assert!(f64_eq(round_dp(2.71828, 3), 2.718));
    }
}
