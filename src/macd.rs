use std::{fmt::Display, num::NonZero};

use crate::{
    ConfigError, Ema, EmaConfig, Indicator, IndicatorConfig, IndicatorConfigBuilder, Price,
    Sample,
};

const DEFAULT_FAST: NonZero<usize> = NonZero::new(12).unwrap();
const DEFAULT_SLOW: NonZero<usize> = NonZero::new(26).unwrap();
const DEFAULT_SIGNAL: NonZero<usize> = NonZero::new(9).unwrap();

/// Configuration for the Moving Average Convergence Divergence
/// ([`Macd`]) indicator.
///
/// The main [`length`](IndicatorConfig::length) is the slow EMA period.
/// Fast and signal periods default to 12 and 9.
///
/// # Example
///
/// ```
/// use forecast_ta::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast(NonZero::new(5).unwrap())
///     .length(NonZero::new(35).unwrap())
///     .signal(NonZero::new(5).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 35);
/// assert_eq!(config.fast(), 5);
/// assert_eq!(config.signal(), 5);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.slow.get()
    }
}

impl MacdConfig {
    /// Fast EMA period.
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    /// Signal line EMA period.
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }

    /// Number of samples before the first full output
    /// (`slow + signal − 1`).
    #[must_use]
    pub fn required_samples(&self) -> usize {
        self.slow.get() + self.signal.get() - 1
    }

    /// The conventional MACD(12, 26, 9).
    #[must_use]
    pub fn default_12_26_9() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
        }
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MacdConfig({}, {}, {})", self.fast, self.slow, self.signal)
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, signal = 9.
/// Length (the slow period) must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct MacdConfigBuilder {
    fast: NonZero<usize>,
    slow: Option<NonZero<usize>>,
    signal: NonZero<usize>,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: None,
            signal: DEFAULT_SIGNAL,
        }
    }

    /// Sets the fast EMA period.
    #[inline]
    #[must_use]
    pub fn fast(mut self, fast: NonZero<usize>) -> Self {
        self.fast = fast;
        self
    }

    /// Sets the signal line EMA period.
    #[inline]
    #[must_use]
    pub fn signal(mut self, signal: NonZero<usize>) -> Self {
        self.signal = signal;
        self
    }

    /// Builds the config, rejecting a fast period that is not shorter
    /// than the slow one.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MacdPeriods`] when `fast >= slow`.
    ///
    /// # Panics
    ///
    /// If the length was never set.
    pub fn try_build(self) -> Result<MacdConfig, ConfigError> {
        let slow = self.slow.expect("length is required");

        if self.fast >= slow {
            return Err(ConfigError::MacdPeriods {
                fast: self.fast.get(),
                slow: slow.get(),
            });
        }

        Ok(MacdConfig {
            fast: self.fast,
            slow,
            signal: self.signal,
        })
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.slow.replace(length);
        self
    }

    #[inline]
    fn build(self) -> MacdConfig {
        self.try_build().unwrap_or_else(|err| panic!("{err}"))
    }
}

/// MACD output: the MACD line, its signal line and their difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    macd: Price,
    signal: Price,
    histogram: Price,
}

impl MacdValue {
    /// MACD line: `EMA(fast) − EMA(slow)`.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    /// Signal line: EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// `macd − signal`.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> Price {
        self.histogram
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(m: {}, s: {}, h: {})",
            self.macd, self.signal, self.histogram
        )
    }
}

/// Moving Average Convergence Divergence (MACD).
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(signal) of macd
/// histogram = macd − signal
/// ```
///
/// All three averages are SMA-seeded [`Ema`]s. The MACD line exists from
/// sample `slow`; output is reported once the signal line is seeded as
/// well, after `slow + signal − 1` samples.
///
/// # Example
///
/// ```
/// use forecast_ta::{IndicatorConfig, IndicatorConfigBuilder, Macd, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast(NonZero::new(2).unwrap())
///     .length(NonZero::new(3).unwrap())
///     .signal(NonZero::new(2).unwrap())
///     .build();
/// let mut macd = Macd::new(config);
///
/// for price in [1.0, 2.0, 3.0] {
///     assert!(macd.compute(&price).is_none());
/// }
/// assert!(macd.compute(&4.0).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
    fast: Ema,
    slow: Ema,
    signal: Ema,
    current: Option<MacdValue>,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdValue;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            fast: Ema::new(EmaConfig::new(config.fast)),
            slow: Ema::new(EmaConfig::new(config.slow)),
            signal: Ema::new(EmaConfig::new(config.signal)),
            current: None,
        }
    }

    #[inline]
    fn compute(&mut self, sample: &impl Sample) -> Option<Self::Output> {
        let fast = self.fast.compute(sample);
        let slow = self.slow.compute(sample);

        let (Some(fast), Some(slow)) = (fast, slow) else {
            return None;
        };

        let macd = fast - slow;

        self.current = self
            .signal
            .compute(&(sample.time(), macd))
            .map(|signal| MacdValue {
                macd,
                signal,
                histogram: macd - signal,
            })
            .filter(|value| value.histogram.is_finite());

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal
        )
    }
}
