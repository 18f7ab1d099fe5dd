use crate::{Price, Sample, sample::Chronology};
use std::collections::VecDeque;

/// Trailing window over the last `size` sample prices.
#[derive(Clone, Debug)]
pub(crate) struct PriceWindow {
    size: usize,
    window: VecDeque<Price>,
    clock: Chronology,
}

impl PriceWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size),
            clock: Chronology::default(),
        }
    }

    #[inline]
    pub fn push(&mut self, sample: &impl Sample) {
        self.clock.advance(sample.time());

        if self.is_ready() {
            self.window.pop_front();
        }

        self.window.push_back(sample.price());
    }

    /// Sum over the samples currently held, so an evicted price never
    /// lingers in later windows.
    #[inline]
    pub fn sum(&self) -> Option<Price> {
        self.is_ready().then(|| self.window.iter().sum())
    }

    /// `None` until the window is full, or when the sum overflows.
    #[inline]
    pub fn mean(&self) -> Option<Price> {
        #[allow(clippy::cast_precision_loss)]
        let size = self.size as f64;
        self.sum()
            .map(|sum| sum / size)
            .filter(|mean| mean.is_finite())
    }

    /// Population variance around `mean`, two-pass over the window so that
    /// a flat window yields exactly zero.
    #[inline]
    pub fn variance(&self, mean: Price) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }

        let squares: f64 = self
            .window
            .iter()
            .map(|price| {
                let deviation = price - mean;
                deviation * deviation
            })
            .sum();

        #[allow(clippy::cast_precision_loss)]
        let size = self.size as f64;
        Some(squares / size)
    }

    #[inline]
    fn is_ready(&self) -> bool {
        self.window.len() == self.size
    }
}
