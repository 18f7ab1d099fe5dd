//! Period returns of a price series.

use crate::{IndicatorSeries, Price};

/// One-step relative change: `p[i] / p[i − 1] − 1`.
///
/// Index 0 is absent, as is any change from a zero or non-finite price.
///
/// # Example
///
/// ```
/// use forecast_ta::pct_change;
///
/// let out = pct_change(&[100.0, 110.0, 99.0]);
/// assert_eq!(out[0], None);
/// assert!((out[1].unwrap() - 0.1).abs() < 1e-12);
/// assert!((out[2].unwrap() + 0.1).abs() < 1e-12);
/// ```
#[must_use]
pub fn pct_change(prices: &[Price]) -> IndicatorSeries {
    let changes = prices.windows(2).map(|pair| {
        let (prev, price) = (pair[0], pair[1]);
        let change = price / prev - 1.0;
        (prev != 0.0 && change.is_finite()).then_some(change)
    });

    (!prices.is_empty())
        .then_some(None)
        .into_iter()
        .chain(changes)
        .collect()
}

/// Compounded return since the first price, one value per price.
///
/// Index 0 is `0`. Changes that cannot be computed count as no change.
///
/// # Example
///
/// ```
/// use forecast_ta::cumulative_returns;
///
/// let out = cumulative_returns(&[100.0, 110.0, 121.0]);
/// assert_eq!(out[0], 0.0);
/// assert!((out[2] - 0.21).abs() < 1e-12);
/// ```
#[must_use]
pub fn cumulative_returns(prices: &[Price]) -> Vec<Price> {
    let mut growth = 1.0;

    pct_change(prices)
        .iter()
        .map(|change| {
            growth *= 1.0 + change.unwrap_or(0.0);
            growth - 1.0
        })
        .collect()
}

/// Sample standard deviation (`n − 1`) of the trailing `window`
/// one-step returns.
///
/// The first defined value is at index `window`, the first index with
/// `window` returns behind it. A window shorter than 2 has no sample
/// deviation and gives an absent series. Any absent return inside the
/// window leaves that index absent.
#[must_use]
pub fn rolling_volatility(prices: &[Price], window: usize) -> IndicatorSeries {
    if window < 2 {
        tracing::debug!(window, len = prices.len(), "volatility window too short");
        return IndicatorSeries::absent(prices.len());
    }

    let returns = pct_change(prices);
    // Index 0 has no return, so the first full window ends at `window`.
    let mut out = vec![None; prices.len().min(window)];

    #[allow(clippy::cast_precision_loss)]
    let n = window as f64;

    out.extend(returns.windows(window).skip(1).map(|slice| {
        let values = slice.iter().copied().collect::<Option<Vec<Price>>>()?;
        let mean = values.iter().sum::<f64>() / n;
        let sum_sq = values.iter().map(|r| (r - mean).powi(2)).sum::<f64>();

        Some((sum_sq / (n - 1.0)).sqrt())
    }));

    out.into()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    mod pct_change {
        use super::*;

        #[test]
        fn first_index_absent() {
            let out = pct_change(&[1.0, 2.0]);
            assert_eq!(&*out, &[None, Some(1.0)]);
        }

        #[test]
        fn change_from_zero_is_absent() {
            let out = pct_change(&[0.0, 5.0, 10.0]);
            assert_eq!(&*out, &[None, None, Some(1.0)]);
        }

        #[test]
        fn length_matches_input() {
            assert!(pct_change(&[]).is_empty());
            assert_eq!(pct_change(&[3.0]).len(), 1);
            assert_eq!(pct_change(&[3.0; 7]).len(), 7);
        }

        #[test]
        fn non_finite_neighbours_are_absent() {
            let out = pct_change(&[1.0, f64::NAN, 2.0]);
            assert_eq!(out, IndicatorSeries::absent(3));
        }
    }

    mod cumulative_returns {
        use super::*;

        #[test]
        fn compounds_changes() {
            let out = cumulative_returns(&[100.0, 50.0, 100.0]);
            assert_eq!(out, vec![0.0, -0.5, 0.0]);
        }

        #[test]
        fn absent_change_counts_as_flat() {
            let out = cumulative_returns(&[0.0, 5.0, 10.0]);
            assert_eq!(out, vec![0.0, 0.0, 1.0]);
        }

        #[test]
        fn empty_input() {
            assert!(cumulative_returns(&[]).is_empty());
        }
    }

    mod rolling_volatility {
        use super::*;

        #[test]
        fn constant_growth_has_zero_volatility() {
            let prices: Vec<Price> = (0..20).map(|i| 2.0_f64.powi(i)).collect();
            let out = rolling_volatility(&prices, 5);
            assert_eq!(out.len(), 20);
            assert!(out[..5].iter().all(Option::is_none));
            for value in &out[5..] {
                assert_eq!(*value, Some(0.0));
            }
        }

        #[test]
        fn sample_deviation_of_returns() {
            // returns: +0.1, -0.1 → mean 0, sample var 0.02
            let out = rolling_volatility(&[100.0, 110.0, 99.0], 2);
            assert!(out[..2].iter().all(Option::is_none));
            assert!((out[2].unwrap() - 0.02_f64.sqrt()).abs() < 1e-12);
        }

        #[test]
        fn short_window_is_absent() {
            let prices = [1.0, 2.0, 3.0];
            assert_eq!(rolling_volatility(&prices, 1).defined(), 0);
            assert_eq!(rolling_volatility(&prices, 0).len(), 3);
        }

        #[test]
        fn fewer_prices_than_window() {
            let out = rolling_volatility(&[1.0, 2.0, 3.0], 10);
            assert_eq!(out, IndicatorSeries::absent(3));
        }
    }
}
