use crate::Sample;

use std::{
    fmt::{Debug, Display},
    hash::Hash,
    num::NonZero,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its
/// parameters. Configs are value types: cheap to clone, compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Main window length (number of samples).
    fn length(&self) -> usize;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the indicator window length.
    #[must_use]
    fn length(self, length: NonZero<usize>) -> Self;

    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A streaming technical indicator.
///
/// Indicators maintain internal state and update incrementally on each call
/// to [`compute`](Indicator::compute), one sample per call. Output is `None`
/// until the look-back window is satisfied.
///
/// # Example
///
/// ```
/// use forecast_ta::{Sma, SmaConfig, Indicator};
/// use std::num::NonZero;
///
/// let mut sma = Sma::new(SmaConfig::new(NonZero::new(3).unwrap()));
///
/// assert_eq!(sma.compute(&10.0), None);
/// assert_eq!(sma.compute(&20.0), None);
/// assert_eq!(sma.compute(&30.0), Some(20.0));
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. `f64` for simple indicators,
    /// a struct for composite ones (e.g. Bollinger Bands).
    type Output: Send + Sync + Display + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// Feeds a sample and returns the updated indicator value,
    /// or `None` if the window is not yet full.
    fn compute(&mut self, sample: &impl Sample) -> Option<Self::Output>;

    /// Returns the last computed indicator value without advancing state.
    ///
    /// This is a cached field read, O(1) with no computation.
    fn value(&self) -> Option<Self::Output>;
}
