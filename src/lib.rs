//! Technical indicator overlays for price forecast charts.
//!
//! Two layers share one set of indicators:
//!
//! - Streaming indicators ([`Sma`], [`Ema`], [`Bb`], [`Rsi`], [`Macd`])
//!   accept any type implementing [`Sample`], one sample per
//!   [`compute`](Sma::compute) call. Values are `None` until enough data
//!   has been received.
//! - Series functions ([`sma`], [`ema`], [`bollinger_bands`], [`rsi`],
//!   [`macd`]) take a whole price slice and return output index-aligned to
//!   it, with `None` where a value is not yet defined.
//!
//! [`ChartOverlay`] computes the configured overlays for a combined
//! historical and forecast [`PriceSeries`]; [`classify_sentiment`] reads a
//! bullish or bearish bias from the same path.
//!
//! Each indicator type exposes [`new`](Sma::new),
//! [`compute`](Sma::compute), and [`value`](Sma::value) as inherent
//! methods, no trait import needed. Import [`Indicator`] only for generic
//! code.

mod bb;
mod ema;
mod error;
mod indicator;
mod macd;
mod overlay;
mod price_series;
mod price_window;
mod returns;
mod rsi;
mod sample;
mod sentiment;
mod series;
mod sma;

pub use crate::error::ConfigError;
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::price_series::{PricePoint, PriceSeries};
pub use crate::sample::{Price, Sample, Timestamp};

pub use crate::bb::{Bb, BbConfig, BbConfigBuilder, BbValue, StdDev};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdValue};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder};

pub use crate::overlay::{BollingerParams, ChartOverlay, OverlayConfig};
pub use crate::returns::{cumulative_returns, pct_change, rolling_volatility};
pub use crate::sentiment::{
    SentimentIndicators, SentimentLabel, SentimentView, classify_sentiment,
};
pub use crate::series::{
    BollingerSeries, IndicatorSeries, MacdSeries, bollinger_bands, ema, macd, rsi, sma,
};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&mut self, sample: &impl Sample) -> Option<$output> {
                <Self as Indicator>::compute(self, sample)
            }

            /// See [`Indicator::value`].
            #[must_use]
            #[inline]
            pub fn value(&self) -> Option<$output> {
                <Self as Indicator>::value(self)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Price);
impl_indicator_methods!(Ema, EmaConfig, Price);
impl_indicator_methods!(Bb, BbConfig, BbValue);
impl_indicator_methods!(Rsi, RsiConfig, Price);
impl_indicator_methods!(Macd, MacdConfig, MacdValue);

#[cfg(test)]
mod test_util;
