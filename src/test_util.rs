// src/test_util.rs

use crate::PricePoint;
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

/// Timestamped sample.
pub fn tick(price: f64, time: u64) -> PricePoint {
    PricePoint::new(time, price)
}

/// `n` samples of `price` at times `1..=n`.
pub fn flat(price: f64, n: usize) -> Vec<PricePoint> {
    (1..=n as u64).map(|t| tick(price, t)).collect()
}
