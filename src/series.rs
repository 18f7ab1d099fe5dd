//! Whole-series indicator functions.
//!
//! Each function takes a chronological price slice and returns output of
//! the same length, index-aligned to the input. Indices before the look-back
//! window is satisfied hold `None`. Malformed input (a zero period, or any
//! non-finite price) yields a fully absent result rather than an error.

use std::{num::NonZero, ops::Deref};

use serde::{Deserialize, Serialize};

use crate::{
    Bb, BbConfig, Ema, EmaConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, Macd,
    MacdConfig, MacdValue, Price, Rsi, RsiConfig, Sma, SmaConfig, StdDev,
};

/// Indicator output aligned to its input series.
///
/// Serializes as a JSON array with `null` for absent values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries(Vec<Option<Price>>);

impl IndicatorSeries {
    /// `len` absent values.
    #[must_use]
    pub fn absent(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// The most recent defined value.
    #[must_use]
    pub fn last_value(&self) -> Option<Price> {
        self.0.last().copied().flatten()
    }

    /// Number of defined values.
    #[must_use]
    pub fn defined(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    /// The underlying values.
    #[must_use]
    pub fn into_inner(self) -> Vec<Option<Price>> {
        self.0
    }
}

impl Deref for IndicatorSeries {
    type Target = [Option<Price>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Option<Price>>> for IndicatorSeries {
    fn from(values: Vec<Option<Price>>) -> Self {
        Self(values)
    }
}

impl FromIterator<Option<Price>> for IndicatorSeries {
    fn from_iter<I: IntoIterator<Item = Option<Price>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Upper, middle and lower Bollinger bands, each aligned to the input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerSeries {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

impl BollingerSeries {
    /// All three bands absent.
    #[must_use]
    pub fn absent(len: usize) -> Self {
        Self {
            upper: IndicatorSeries::absent(len),
            middle: IndicatorSeries::absent(len),
            lower: IndicatorSeries::absent(len),
        }
    }
}

/// MACD line, signal line and histogram, each aligned to the input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

/// Period as a `NonZero`, or `None` when the input cannot produce any
/// value: zero period or a non-finite sample.
fn usable_period(indicator: &str, prices: &[Price], period: usize) -> Option<NonZero<usize>> {
    let Some(period) = NonZero::new(period) else {
        tracing::debug!(indicator, len = prices.len(), "zero period, output absent");
        return None;
    };

    if let Some(index) = prices.iter().position(|p| !p.is_finite()) {
        tracing::debug!(
            indicator,
            len = prices.len(),
            index,
            "non-finite price, output absent"
        );
        return None;
    }

    Some(period)
}

/// Feeds every price to `indicator`, collecting one output per price.
fn drive<I: Indicator>(indicator: &mut I, prices: &[Price]) -> Vec<Option<I::Output>> {
    prices.iter().map(|price| indicator.compute(price)).collect()
}

/// Simple moving average.
///
/// Index `i >= period − 1` holds the mean of `prices[i + 1 − period ..= i]`.
///
/// # Example
///
/// ```
/// use forecast_ta::sma;
///
/// let out = sma(&[1.0, 2.0, 3.0, 4.0], 2);
/// assert_eq!(&*out, &[None, Some(1.5), Some(2.5), Some(3.5)]);
/// ```
#[must_use]
pub fn sma(prices: &[Price], period: usize) -> IndicatorSeries {
    let Some(period) = usable_period("sma", prices, period) else {
        return IndicatorSeries::absent(prices.len());
    };

    drive(&mut Sma::new(SmaConfig::new(period)), prices).into()
}

/// Exponential moving average, seeded with the SMA of the first `period`
/// prices, then `ema = (price − prev) × 2/(period + 1) + prev`.
#[must_use]
pub fn ema(prices: &[Price], period: usize) -> IndicatorSeries {
    let Some(period) = usable_period("ema", prices, period) else {
        return IndicatorSeries::absent(prices.len());
    };

    drive(&mut Ema::new(EmaConfig::new(period)), prices).into()
}

/// Bollinger bands: SMA middle band, upper and lower offset by
/// `multiplier` population standard deviations of the trailing window.
///
/// A multiplier that is not positive and finite gives absent bands.
///
/// # Example
///
/// ```
/// use forecast_ta::bollinger_bands;
///
/// let bands = bollinger_bands(&[3.0, 5.0], 2, 2.0);
/// assert_eq!(&*bands.upper, &[None, Some(6.0)]);
/// assert_eq!(&*bands.middle, &[None, Some(4.0)]);
/// assert_eq!(&*bands.lower, &[None, Some(2.0)]);
/// ```
#[must_use]
pub fn bollinger_bands(prices: &[Price], period: usize, multiplier: f64) -> BollingerSeries {
    let Some(period) = usable_period("bollinger", prices, period) else {
        return BollingerSeries::absent(prices.len());
    };

    let std_dev = match StdDev::try_new(multiplier) {
        Ok(std_dev) => std_dev,
        Err(err) => {
            tracing::debug!(indicator = "bollinger", %err, "output absent");
            return BollingerSeries::absent(prices.len());
        }
    };

    let config = BbConfig::builder().length(period).std_dev(std_dev).build();
    let values = drive(&mut Bb::new(config), prices);

    BollingerSeries {
        upper: values.iter().map(|v| v.map(|v| v.upper())).collect(),
        middle: values.iter().map(|v| v.map(|v| v.middle())).collect(),
        lower: values.iter().map(|v| v.map(|v| v.lower())).collect(),
    }
}

/// Relative strength index with Wilder's smoothing.
///
/// Indices `< period` are absent. A window with no losses reads exactly
/// `100`.
///
/// # Example
///
/// ```
/// use forecast_ta::rsi;
///
/// let out = rsi(&[50.0; 30], 14);
/// assert!(out[..14].iter().all(Option::is_none));
/// assert!(out[14..].iter().all(|v| *v == Some(100.0)));
/// ```
#[must_use]
pub fn rsi(prices: &[Price], period: usize) -> IndicatorSeries {
    let Some(period) = usable_period("rsi", prices, period) else {
        return IndicatorSeries::absent(prices.len());
    };

    drive(&mut Rsi::new(RsiConfig::new(period)), prices).into()
}

/// MACD with the given fast, slow and signal periods.
///
/// Output is absent until the signal line is seeded, and entirely absent
/// when `fast >= slow` or any period is zero.
#[must_use]
pub fn macd(prices: &[Price], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let absent = || MacdSeries {
        macd: IndicatorSeries::absent(prices.len()),
        signal: IndicatorSeries::absent(prices.len()),
        histogram: IndicatorSeries::absent(prices.len()),
    };

    let Some(slow) = usable_period("macd", prices, slow) else {
        return absent();
    };
    let (Some(fast), Some(signal)) = (NonZero::new(fast), NonZero::new(signal)) else {
        tracing::debug!(indicator = "macd", "zero period, output absent");
        return absent();
    };

    let config = match MacdConfig::builder()
        .fast(fast)
        .length(slow)
        .signal(signal)
        .try_build()
    {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(indicator = "macd", %err, "output absent");
            return absent();
        }
    };

    let values: Vec<Option<MacdValue>> = drive(&mut Macd::new(config), prices);

    MacdSeries {
        macd: values.iter().map(|v| v.map(|v| v.macd())).collect(),
        signal: values.iter().map(|v| v.map(|v| v.signal())).collect(),
        histogram: values.iter().map(|v| v.map(|v| v.histogram())).collect(),
    }
}
