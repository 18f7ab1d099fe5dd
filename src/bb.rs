use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use crate::{
    ConfigError, Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, Sample,
    price_window::PriceWindow,
};

/// Band width in standard deviations: a positive, finite `f64`, `2.0` by
/// default. Compared and hashed by bits.
#[derive(Clone, Copy, Debug)]
pub struct StdDev(f64);

impl StdDev {
    /// # Panics
    ///
    /// On any `value` that [`try_new`](Self::try_new) rejects.
    #[must_use]
    pub fn new(value: f64) -> Self {
        match Self::try_new(value) {
            Ok(std_dev) => std_dev,
            Err(err) => panic!("{err}"),
        }
    }

    /// Checked constructor, used where the multiplier comes from user input.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidStdDev`] if `value` is not positive and finite.
    pub fn try_new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidStdDev(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

const DEFAULT_LENGTH: NonZero<usize> = NonZero::new(20).unwrap();

/// Window length and band width of a [`Bb`].
///
/// # Example
///
/// ```
/// use forecast_ta::{BbConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.std_dev().value(), 2.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: usize,
    std_dev: StdDev,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl BbConfig {
    /// Band offset from the middle, in standard deviations.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// 20 samples, 2σ.
    #[must_use]
    pub fn default_20() -> Self {
        Self::new(DEFAULT_LENGTH)
    }

    /// `length` samples, 2σ.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BbConfig({}, {})", self.length, self.std_dev.value())
    }
}

/// Builder for [`BbConfig`]; the band width falls back to 2σ.
pub struct BbConfigBuilder {
    length: Option<usize>,
    std_dev: StdDev,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            std_dev: StdDev::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length.get());
        self
    }

    #[inline]
    fn build(self) -> BbConfig {
        BbConfig {
            length: self.length.expect("length is required"),
            std_dev: self.std_dev,
        }
    }
}

/// One set of bands around the window mean, `σ` being the population
/// deviation of the same window.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BbValue {
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BbValue {
    /// Upper band: `SMA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: SMA of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `SMA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// `upper − lower`.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger bands over a trailing window.
///
/// Mean and deviation are both taken over the samples in the window, so a
/// flat window gives bands of exactly zero width. A window whose bands
/// overflow reads `None`.
///
/// # Example
///
/// ```
/// use forecast_ta::{Bb, BbConfig};
/// use std::num::NonZero;
///
/// let mut bb = Bb::new(BbConfig::new(NonZero::new(2).unwrap()));
///
/// assert!(bb.compute(&3.0).is_none());
///
/// // [3, 5]: mean 4, σ 1, k 2
/// let value = bb.compute(&5.0).unwrap();
/// assert_eq!((value.upper(), value.middle(), value.lower()), (6.0, 4.0, 2.0));
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
    std_dev_multiplier: f64,
    window: PriceWindow,
    current: Option<BbValue>,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BbValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            std_dev_multiplier: config.std_dev.0,
            window: PriceWindow::new(config.length),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, sample: &impl Sample) -> Option<Self::Output> {
        self.window.push(sample);

        self.current = self.window.mean().and_then(|mean| {
            let variance = self.window.variance(mean)?;
            let offset = variance.sqrt() * self.std_dev_multiplier;
            let (upper, lower) = (mean + offset, mean - offset);

            (upper.is_finite() && lower.is_finite()).then_some(BbValue {
                upper,
                middle: mean,
                lower,
            })
        });

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BB({}, {})", self.config.length, self.std_dev_multiplier)
    }
}
