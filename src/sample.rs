/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Sample timestamp, epoch milliseconds.
///
/// Must be non-decreasing between consecutive calls to
/// [`Indicator::compute`](crate::Indicator::compute).
pub type Timestamp = u64;

/// A single price observation fed to an indicator.
///
/// Implement this on your own point type to avoid per-sample conversion.
/// Every call to [`Indicator::compute`](crate::Indicator::compute) advances
/// the indicator by one sample; samples sharing a timestamp are not merged.
///
/// # Example
///
/// ```
/// use forecast_ta::{Price, Sample, Timestamp};
///
/// struct Quote {
///     last: f64,
///     ts: u64,
/// }
///
/// impl Sample for Quote {
///     fn price(&self) -> Price { self.last }
///     fn time(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Sample {
    /// Observed price.
    fn price(&self) -> Price;

    /// Observation time. Samples without a clock report `0`.
    ///
    /// Values must be non-decreasing between calls. Debug builds panic when
    /// `time` goes backwards.
    fn time(&self) -> Timestamp {
        0
    }
}

impl Sample for Price {
    #[inline]
    fn price(&self) -> Price {
        *self
    }
}

impl Sample for (Timestamp, Price) {
    #[inline]
    fn price(&self) -> Price {
        self.1
    }

    #[inline]
    fn time(&self) -> Timestamp {
        self.0
    }
}

/// Last seen sample time, used to catch out-of-order input in debug builds.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Chronology(Option<Timestamp>);

impl Chronology {
    #[inline]
    pub(crate) fn advance(&mut self, time: Timestamp) {
        debug_assert!(
            self.0.is_none_or(|t| t <= time),
            "sample time must be non-decreasing: last={}, got={}",
            self.0.unwrap_or(0),
            time,
        );

        self.0 = Some(time);
    }
}
