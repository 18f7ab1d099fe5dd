use crate::{Price, Sample, Timestamp};

use serde::{Deserialize, Serialize};

/// One point of a price chart: a timestamp and the price at that time.
///
/// Matches the `{ "time": .., "price": .. }` records the forecast endpoint
/// returns for both its historical and forecast legs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: Timestamp,
    pub price: Price,
}

impl PricePoint {
    #[must_use]
    pub fn new(time: Timestamp, price: Price) -> Self {
        Self { time, price }
    }
}

impl Sample for PricePoint {
    #[inline]
    fn price(&self) -> Price {
        self.price
    }

    #[inline]
    fn time(&self) -> Timestamp {
        self.time
    }
}

/// Chronological price points: observed history followed by forecast.
///
/// The order of points is significant and kept exactly as supplied. No
/// uniqueness is enforced on timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    forecast_start: usize,
}

impl PriceSeries {
    /// A series made only of observed history.
    #[must_use]
    pub fn new(points: Vec<PricePoint>) -> Self {
        let forecast_start = points.len();
        Self {
            points,
            forecast_start,
        }
    }

    /// Appends the forecast leg to the historical leg.
    #[must_use]
    pub fn combine(historical: &[PricePoint], forecast: &[PricePoint]) -> Self {
        let mut points = Vec::with_capacity(historical.len() + forecast.len());
        points.extend_from_slice(historical);
        points.extend_from_slice(forecast);

        Self {
            points,
            forecast_start: historical.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Index of the first forecast point. Equals [`len`](Self::len) when the
    /// series carries no forecast.
    #[must_use]
    pub fn forecast_start(&self) -> usize {
        // Deserialized series may carry an out-of-range boundary.
        self.forecast_start.min(self.points.len())
    }

    #[must_use]
    pub fn historical(&self) -> &[PricePoint] {
        &self.points[..self.forecast_start()]
    }

    #[must_use]
    pub fn forecast(&self) -> &[PricePoint] {
        &self.points[self.forecast_start()..]
    }

    /// Prices in series order.
    #[must_use]
    pub fn prices(&self) -> Vec<Price> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Timestamps in series order.
    #[must_use]
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.points.iter().map(|p| p.time).collect()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
