use std::{fmt::Display, num::NonZero};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Price, Sample, Sma, SmaConfig,
    sample::Chronology,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Convergence
///
/// EMA has infinite memory: the initial seed value (SMA of the
/// first `length` samples) influences all subsequent values. With
/// `enforce_convergence` enabled, [`Ema::compute`] returns
/// `None` until the seed's contribution decays below 1%.
///
/// For EMA(20), that's 63 samples (`3 × (length + 1)`).
/// Without enforcement, values are returned as soon as the
/// SMA seed is ready (after `length` samples).
///
/// # Example
///
/// ```
/// use forecast_ta::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = EmaConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .enforce_convergence(true)
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config.required_samples_to_converge(), 63);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: NonZero<usize>,
    convergence: bool,
    samples_to_converge: usize,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn length(&self) -> usize {
        self.length.get()
    }
}

impl EmaConfig {
    /// EMA over `length` samples, convergence not enforced.
    #[must_use]
    pub fn new(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// When `true`, [`Ema::compute`] returns `None` until
    /// [`required_samples_to_converge`](Self::required_samples_to_converge)
    /// samples have been processed. Default: `false`.
    #[inline]
    #[must_use]
    pub fn enforce_convergence(&self) -> bool {
        self.convergence
    }

    /// Number of samples needed before the EMA output is reported.
    ///
    /// When convergence is not enforced, this equals the window length.
    /// When enforced, this is `3 × (length + 1)`, the number of samples
    /// until the SMA seed's influence decays below 1%.
    #[must_use]
    pub fn required_samples_to_converge(&self) -> usize {
        self.samples_to_converge
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({})", self.length)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: convergence enforcement = `false`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<NonZero<usize>>,
    convergence: bool,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            convergence: false,
        }
    }

    /// Enables or disables convergence enforcement.
    #[inline]
    #[must_use]
    pub fn enforce_convergence(mut self, enforce: bool) -> Self {
        self.convergence = enforce;
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        let length = self.length.expect("length is required");
        let samples_to_converge = if self.convergence {
            3 * (length.get() + 1)
        } else {
            length.get()
        };

        EmaConfig {
            length,
            convergence: self.convergence,
            samples_to_converge,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA = (price − prev_EMA) × α + prev_EMA
/// ```
///
/// The first `length` samples are collected to compute an SMA
/// seed value. After seeding, the SMA state is dropped and
/// the EMA runs with O(1) constant memory per sample via a
/// single fused multiply-add.
///
/// # Example
///
/// ```
/// use forecast_ta::{Ema, EmaConfig};
/// use std::num::NonZero;
///
/// let mut ema = Ema::new(EmaConfig::new(NonZero::new(3).unwrap()));
///
/// // Seeding phase: collecting SMA
/// assert_eq!(ema.compute(&2.0), None);
/// assert_eq!(ema.compute(&4.0), None);
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// assert_eq!(ema.compute(&6.0), Some(4.0));
///
/// // EMA(3) α = 0.5: (8 − 4) × 0.5 + 4 = 6.0
/// assert_eq!(ema.compute(&8.0), Some(6.0));
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
    sma: Option<Sma>,
    alpha: f64,
    current: Option<Price>,
    seen_samples: usize,
    converged: bool,
    clock: Chronology,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Price;

    fn new(config: Self::Config) -> Self {
        Self {
            config,
            current: None,
            seen_samples: 0,
            converged: false,
            clock: Chronology::default(),
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (config.length.get() + 1) as f64,
            sma: Some(Sma::new(SmaConfig::new(config.length))),
        }
    }

    #[inline]
    fn compute(&mut self, sample: &impl Sample) -> Option<Price> {
        self.clock.advance(sample.time());

        if let Some(sma) = &mut self.sma {
            self.current = sma.compute(sample);
        } else if let Some(previous) = self.current {
            let price = sample.price();
            let next = self.alpha.mul_add(price - previous, previous);
            self.current = next.is_finite().then_some(next);
        }

        // Seed is in: the SMA is no longer needed.
        if self.sma.is_some() && self.current.is_some() {
            self.sma = None;
        }

        if !self.converged {
            self.seen_samples += 1;
            if self.seen_samples >= self.config.required_samples_to_converge() {
                self.converged = true;
            }
        }

        self.value()
    }

    #[inline]
    fn value(&self) -> Option<Price> {
        if self.converged { self.current } else { None }
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({})", self.config.length)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{flat, nz, tick};

    fn ema(length: usize) -> Ema {
        Ema::new(EmaConfig::new(nz(length)))
    }

    fn enforced(length: usize) -> Ema {
        Ema::new(
            EmaConfig::builder()
                .length(nz(length))
                .enforce_convergence(true)
                .build(),
        )
    }

    fn feed(ema: &mut Ema, prices: &[f64]) -> Option<Price> {
        prices.iter().map(|p| ema.compute(p)).last().flatten()
    }

    mod seeding {
        use super::*;

        #[test]
        fn none_during_seeding() {
            let mut ema = ema(3);
            assert_eq!(ema.compute(&10.0), None);
            assert_eq!(ema.compute(&20.0), None);
        }

        #[test]
        fn first_value_is_sma_seed() {
            let mut ema = ema(3);
            // SMA(3) = (2 + 4 + 6) / 3 = 4.0
            assert_eq!(feed(&mut ema, &[2.0, 4.0, 6.0]), Some(4.0));
        }
    }

    mod computation {
        use super::*;

        #[test]
        fn applies_formula_after_seed() {
            // EMA(3): α = 2/(3+1) = 0.5
            let mut ema = ema(3);
            feed(&mut ema, &[2.0, 4.0, 6.0]); // seed = 4.0
            // EMA = (8 - 4) * 0.5 + 4 = 6.0
            assert_eq!(ema.compute(&8.0), Some(6.0));
        }

        #[test]
        fn continues_computation() {
            let mut ema = ema(3);
            feed(&mut ema, &[2.0, 4.0, 6.0, 8.0]); // 6.0
            // EMA = (10 - 6) * 0.5 + 6 = 8.0
            assert_eq!(ema.compute(&10.0), Some(8.0));
        }

        #[test]
        fn constant_input_stays_constant() {
            let mut ema = ema(3);
            for p in flat(50.0, 20) {
                if let Some(v) = ema.compute(&p) {
                    assert_eq!(v, 50.0);
                }
            }
            assert_eq!(ema.value(), Some(50.0));
        }

        #[test]
        fn recurses_over_own_values() {
            // EMA(2): α = 2/3, seed [3, 6] = 4.5
            // (9 - 4.5) * 2/3 + 4.5 = 7.5
            // (9 - 7.5) * 2/3 + 7.5 = 8.5
            let mut ema = ema(2);
            feed(&mut ema, &[3.0, 6.0, 9.0]);
            let v = ema.compute(&9.0).unwrap();
            assert!((v - 8.5).abs() < 1e-12);
        }
    }

    mod alpha {
        use super::*;

        #[test]
        fn ema_2_alpha_is_two_thirds() {
            // seed [3, 6] → SMA = 4.5
            // sample 3: (9 - 4.5) * 2/3 + 4.5 = 7.5
            let mut ema = ema(2);
            assert_eq!(feed(&mut ema, &[3.0, 6.0, 9.0]), Some(7.5));
        }

        #[test]
        fn ema_4_alpha_is_two_fifths() {
            // α = 2/(4+1) = 0.4
            // seed [10, 20, 30, 40] → SMA = 25
            // sample 5: (50 - 25) * 0.4 + 25 = 35
            let mut ema = ema(4);
            assert_eq!(feed(&mut ema, &[10.0, 20.0, 30.0, 40.0, 50.0]), Some(35.0));
        }
    }

    mod window_size_one {
        use super::*;

        #[test]
        fn first_sample_returns_value() {
            let mut ema = ema(1);
            assert_eq!(ema.compute(&42.0), Some(42.0));
        }

        #[test]
        fn always_equals_latest_price() {
            // EMA(1): α = 2/(1+1) = 1.0
            let mut ema = ema(1);
            ema.compute(&10.0);
            assert_eq!(ema.compute(&20.0), Some(20.0));
            assert_eq!(ema.compute(&5.0), Some(5.0));
        }
    }

    mod timestamps {
        use super::*;

        #[test]
        fn same_time_advances() {
            let mut ema = ema(2);
            ema.compute(&tick(3.0, 1));
            ema.compute(&tick(6.0, 1));
            assert_eq!(ema.compute(&tick(9.0, 1)), Some(7.5));
        }

        #[cfg(debug_assertions)]
        #[test]
        #[should_panic(expected = "sample time must be non-decreasing")]
        fn panics_on_decreasing_time_after_seed() {
            let mut ema = ema(1);
            ema.compute(&tick(10.0, 5));
            ema.compute(&tick(11.0, 3));
        }
    }

    mod convergence {
        use super::*;

        #[test]
        fn returns_value_at_seed_without_enforcement() {
            let mut ema = ema(3);
            assert!(feed(&mut ema, &[2.0, 4.0, 6.0]).is_some());
        }

        #[test]
        fn none_until_converged_when_enforced() {
            let mut ema = enforced(3);
            // required = 3 * (3 + 1) = 12
            for i in 1..=11 {
                assert_eq!(ema.compute(&50.0), None, "expected None at sample {i}");
            }
            assert!(ema.compute(&50.0).is_some());
        }

        #[test]
        fn required_samples_scales_with_length() {
            let c10 = EmaConfig::builder()
                .length(nz(10))
                .enforce_convergence(true)
                .build();
            assert_eq!(c10.required_samples_to_converge(), 33);

            let c50 = EmaConfig::builder()
                .length(nz(50))
                .enforce_convergence(true)
                .build();
            assert_eq!(c50.required_samples_to_converge(), 153);
        }

        #[test]
        fn values_match_with_and_without_enforcement() {
            let mut free = ema(3);
            let mut strict = enforced(3);

            for i in 1..=20 {
                free.compute(&(f64::from(i) * 10.0));
                strict.compute(&(f64::from(i) * 10.0));
            }

            assert_eq!(free.compute(&210.0), strict.compute(&210.0));
        }
    }

    mod clone {
        use super::*;

        #[test]
        fn produces_independent_state() {
            let mut ema = ema(3);
            feed(&mut ema, &[2.0, 4.0, 6.0]); // seed = 4.0

            let mut cloned = ema.clone();

            assert_eq!(ema.compute(&8.0), Some(6.0));

            // Clone still at seed value
            assert_eq!(cloned.value(), Some(4.0));

            // (20 - 4) * 0.5 + 4 = 12
            assert_eq!(cloned.compute(&20.0), Some(12.0));
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn convergence_disabled_by_default() {
            let config = EmaConfig::new(nz(10));
            assert!(!config.enforce_convergence());
            assert_eq!(config.required_samples_to_converge(), 10);
        }

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = EmaConfig::builder().build();
        }

        #[test]
        fn eq_and_hash() {
            let a = EmaConfig::new(nz(20));
            let b = EmaConfig::new(nz(20));
            let c = EmaConfig::new(nz(10));

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(ema(20).to_string(), "EMA(20)");
        }

        #[test]
        fn config_formats_correctly() {
            assert_eq!(EmaConfig::new(nz(20)).to_string(), "EmaConfig(20)");
        }
    }

    mod value_accessor {
        use super::*;

        #[test]
        fn none_before_seed() {
            assert_eq!(ema(3).value(), None);
        }

        #[test]
        fn matches_last_compute() {
            let mut ema = ema(3);
            feed(&mut ema, &[2.0, 4.0, 6.0]);
            let computed = ema.compute(&8.0);
            assert_eq!(ema.value(), computed);
        }

        #[test]
        fn none_during_convergence_enforcement() {
            let mut ema = enforced(3);
            feed(&mut ema, &[50.0; 5]);
            // Required samples = 12, only fed 5
            assert_eq!(ema.value(), None);
        }
    }
}
