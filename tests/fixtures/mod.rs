#![allow(dead_code)]

use forecast_ta::{Price, PricePoint, Sample, Timestamp};
use serde::{Deserialize, de::DeserializeOwned};

/// Hourly price record.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RefPrice {
    pub time: u64,
    pub price: f64,
}

impl Sample for RefPrice {
    fn price(&self) -> Price {
        self.price
    }

    fn time(&self) -> Timestamp {
        self.time
    }
}

impl From<RefPrice> for PricePoint {
    fn from(record: RefPrice) -> Self {
        PricePoint::new(record.time, record.price)
    }
}

/// Reference value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub time: u64,
    pub expected: f64,
}

/// Reference BB value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub time: u64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

const PRICES_PATH: &str = "tests/fixtures/data/btcusd-1h.csv";

/// Load the reference hourly price path.
pub fn load_reference_prices() -> Vec<RefPrice> {
    load_records(PRICES_PATH, "invalid price record")
}

/// Prices only, in file order.
pub fn reference_closes() -> Vec<Price> {
    load_reference_prices().iter().map(|r| r.price).collect()
}

/// Load single-value reference data (SMA, EMA, RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load BB reference data (upper, middle, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert a streaming value and the series value at the same index agree.
pub fn assert_values_match(
    idx: usize,
    streamed: Option<f64>,
    batch: Option<f64>,
    tolerance: f64,
) {
    match (streamed, batch) {
        (None, None) => {}
        (Some(s), Some(b)) => {
            let diff = (s - b).abs();
            assert!(
                diff <= tolerance,
                "diverged at index {idx}: streamed={s:.10}, batch={b:.10}, diff={diff:.2e}"
            );
        }
        (s, b) => {
            panic!("convergence mismatch at index {idx}: streamed={s:?}, batch={b:?}");
        }
    }
}

/// Generate a reference-match test for a single-value streaming indicator
/// and check its series function against the same file.
///
/// Usage: `reference_test!(sma_20, Sma, SmaConfig::new(nz(20)), sma, 20, "tests/fixtures/data/sma-20.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $series:ident, $period:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use forecast_ta::*;
            use std::num::NonZero;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let prices = load_reference_prices();
                let reference = load_ref_values($ref_path);
                let mut ind = <$ind>::new($config);

                let mut ref_idx = 0;
                for record in &prices {
                    ind.compute(record);

                    if ref_idx < reference.len() && record.time == reference[ref_idx].time {
                        let value = ind.value().unwrap_or_else(|| {
                            panic!("{} returned None at t={}", stringify!($name), record.time)
                        });
                        assert_near(
                            value,
                            reference[ref_idx].expected,
                            $tolerance,
                            &format!(
                                "{} at ref {ref_idx} (t={})",
                                stringify!($name),
                                record.time
                            ),
                        );
                        ref_idx += 1;
                    } else {
                        assert_eq!(ind.value(), None, "value before reference at t={}", record.time);
                    }
                }

                assert_eq!(
                    ref_idx,
                    reference.len(),
                    "not all reference values checked: {ref_idx}/{}",
                    reference.len()
                );
            }

            #[test]
            fn series_matches_streaming() {
                let closes = reference_closes();
                let series = $series(&closes, $period);
                assert_eq!(series.len(), closes.len());

                let mut ind = <$ind>::new($config);
                for (i, price) in closes.iter().enumerate() {
                    assert_values_match(i, ind.compute(price), series[i], 0.0);
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
