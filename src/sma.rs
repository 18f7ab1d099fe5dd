use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, Sample, price_window::PriceWindow,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use forecast_ta::{IndicatorConfig, SmaConfig};
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: usize,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl SmaConfig {
    /// SMA over `length` samples.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({})", self.length)
    }
}

/// Builder for [`SmaConfig`].
///
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<usize>,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self { length: None }
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
        }
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* samples, where *n* is the
/// configured window length. Returns `None` until the window is full.
///
/// Sums the window on every sample, so a value that has left the window
/// never skews later means.
///
/// # Example
///
/// ```rust
/// use forecast_ta::{Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let mut sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&10.0), None);
/// assert_eq!(sma.compute(&20.0), None);
/// assert_eq!(sma.compute(&30.0), Some(20.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
    window: PriceWindow,
    current: Option<Price>,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            window: PriceWindow::new(config.length),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, sample: &impl Sample) -> Option<Price> {
        self.window.push(sample);

        self.current = self.window.mean();

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        self.current
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({})", self.config.length)
    }
}
