use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, Sample, sample::Chronology,
};

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at sample `length + 1`.
///
/// # Example
///
/// ```
/// use forecast_ta::{IndicatorConfig, RsiConfig};
/// use std::num::NonZero;
///
/// let config = RsiConfig::new(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: usize,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length
    }
}

impl RsiConfig {
    /// RSI over `length` price changes.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({})", self.length)
    }
}

/// Builder for [`RsiConfig`].
///
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<usize>,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self { length: None }
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length.get());
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            length: self.length.expect("length is required"),
        }
    }
}

#[derive(Clone, Debug)]
enum RsiPhase {
    Seeding {
        sum_gain: f64,
        sum_loss: f64,
        changes: usize,
    },
    Active {
        avg_gain: f64,
        avg_loss: f64,
    },
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// The first `length` price changes are averaged with a simple
/// mean (SMA seed). After seeding, gains and losses are smoothed
/// with Wilder's method:
///
/// ```text
/// avg_gain = (prev_avg_gain × (length − 1) + gain) / length
/// avg_loss = (prev_avg_loss × (length − 1) + loss) / length
/// RS       = avg_gain / avg_loss
/// RSI      = 100 − 100 / (1 + RS)
/// ```
///
/// With no downside at all (`avg_loss == 0`), including a perfectly flat
/// series, RSI saturates at exactly 100.
///
/// # Example
///
/// ```
/// use forecast_ta::{Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let mut rsi = Rsi::new(RsiConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding: need 3 price changes (4 samples)
/// assert_eq!(rsi.compute(&10.0), None);
/// assert_eq!(rsi.compute(&12.0), None);
/// assert_eq!(rsi.compute(&11.0), None);
///
/// // changes = +2, −1, +2 → avg_gain=4/3, avg_loss=1/3 → RS=4 → RSI=80
/// assert_eq!(rsi.compute(&13.0), Some(80.0));
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
    prev_price: Option<Price>,
    phase: RsiPhase,
    current: Option<Price>,
    clock: Chronology,
    length: f64,
    length_minus_one: f64,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let length = config.length() as f64;

        Self {
            config,
            phase: RsiPhase::Seeding {
                sum_gain: 0.0,
                sum_loss: 0.0,
                changes: 0,
            },
            prev_price: None,
            current: None,
            clock: Chronology::default(),
            length,
            length_minus_one: length - 1.0,
        }
    }

    #[inline]
    fn compute(&mut self, sample: &impl Sample) -> Option<Self::Output> {
        self.clock.advance(sample.time());

        let price = sample.price();

        // First sample: no change to measure yet.
        let Some(prev_price) = self.prev_price.replace(price) else {
            return None;
        };

        let (gain, loss) = Self::gain_and_loss(prev_price, price);

        self.current = match &mut self.phase {
            RsiPhase::Seeding {
                sum_gain,
                sum_loss,
                changes,
            } => {
                *sum_gain += gain;
                *sum_loss += loss;
                *changes += 1;

                if *changes < self.config.length() {
                    None
                } else {
                    let avg_gain = *sum_gain / self.length;
                    let avg_loss = *sum_loss / self.length;

                    self.phase = RsiPhase::Active { avg_gain, avg_loss };

                    Self::rsi_from_averages(avg_gain, avg_loss)
                }
            }

            RsiPhase::Active { avg_gain, avg_loss } => {
                *avg_gain = avg_gain.mul_add(self.length_minus_one, gain) / self.length;
                *avg_loss = avg_loss.mul_add(self.length_minus_one, loss) / self.length;

                Self::rsi_from_averages(*avg_gain, *avg_loss)
            }
        };

        self.current
    }

    #[inline]
    fn value(&self) -> Option<Self::Output> {
        self.current
    }
}

impl Rsi {
    #[inline]
    fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
        let change = price - prev_price;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        (gain, loss)
    }

    /// `None` when both averages have overflowed and the ratio is undefined.
    #[inline]
    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        (!rs.is_nan()).then(|| 100.0 - 100.0 / (1.0 + rs))
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({})", self.config.length)
    }
}
