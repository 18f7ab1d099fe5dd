use serde::{Deserialize, Serialize};

use crate::{
    BollingerSeries, ConfigError, IndicatorSeries, PriceSeries, StdDev, Timestamp,
    bollinger_bands, ema, rsi, sma,
};

fn default_sma() -> Option<usize> {
    Some(20)
}

fn default_ema() -> Option<usize> {
    Some(20)
}

fn default_rsi() -> Option<usize> {
    Some(14)
}

fn default_bollinger() -> Option<BollingerParams> {
    Some(BollingerParams::default())
}

fn default_bollinger_period() -> usize {
    20
}

fn default_multiplier() -> f64 {
    2.0
}

/// Bollinger band settings of an [`OverlayConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BollingerParams {
    #[serde(default = "default_bollinger_period")]
    pub period: usize,

    /// Band offset in standard deviations.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: default_bollinger_period(),
            multiplier: default_multiplier(),
        }
    }
}

/// Which overlays to draw on a forecast chart, and their periods.
///
/// Every field is optional when deserializing: a missing field takes its
/// default, an explicit `null` turns that overlay off.
///
/// ```
/// use forecast_ta::OverlayConfig;
///
/// let config: OverlayConfig = serde_json::from_str(r#"{ "sma": 50, "rsi": null }"#).unwrap();
/// assert_eq!(config.sma, Some(50));
/// assert_eq!(config.ema, Some(20));
/// assert_eq!(config.rsi, None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayConfig {
    #[serde(default = "default_sma")]
    pub sma: Option<usize>,

    #[serde(default = "default_ema")]
    pub ema: Option<usize>,

    #[serde(default = "default_bollinger")]
    pub bollinger: Option<BollingerParams>,

    #[serde(default = "default_rsi")]
    pub rsi: Option<usize>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            sma: default_sma(),
            ema: default_ema(),
            bollinger: default_bollinger(),
            rsi: default_rsi(),
        }
    }
}

impl OverlayConfig {
    /// Every overlay switched off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            sma: None,
            ema: None,
            bollinger: None,
            rsi: None,
        }
    }

    /// Checks that every enabled overlay can produce values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroPeriod`] for an enabled overlay with period 0,
    /// [`ConfigError::InvalidStdDev`] for a Bollinger multiplier that is not
    /// positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("sma", self.sma),
            ("ema", self.ema),
            ("bollinger", self.bollinger.map(|bb| bb.period)),
            ("rsi", self.rsi),
        ];

        if let Some((indicator, _)) = periods.into_iter().find(|(_, p)| *p == Some(0)) {
            return Err(ConfigError::ZeroPeriod { indicator });
        }

        if let Some(bb) = self.bollinger {
            StdDev::try_new(bb.multiplier)?;
        }

        Ok(())
    }
}

/// Indicator overlays for one forecast chart.
///
/// Every series has the length of the input and lines up with
/// [`timestamps`](Self::timestamps). Disabled overlays are left out of
/// the serialized form.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartOverlay {
    timestamps: Vec<Timestamp>,
    forecast_start: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    sma: Option<IndicatorSeries>,

    #[serde(skip_serializing_if = "Option::is_none")]
    ema: Option<IndicatorSeries>,

    #[serde(skip_serializing_if = "Option::is_none")]
    bollinger: Option<BollingerSeries>,

    #[serde(skip_serializing_if = "Option::is_none")]
    rsi: Option<IndicatorSeries>,
}

impl ChartOverlay {
    /// Computes every enabled overlay over `series`.
    ///
    /// Never fails: a bad setting leaves its overlay fully absent. Use
    /// [`try_compute`](Self::try_compute) to reject such settings instead.
    ///
    /// # Example
    ///
    /// ```
    /// use forecast_ta::{ChartOverlay, OverlayConfig, PricePoint, PriceSeries};
    ///
    /// let history: Vec<PricePoint> =
    ///     (0..30).map(|i| PricePoint::new(i, 100.0 + i as f64)).collect();
    /// let series = PriceSeries::new(history);
    ///
    /// let overlay = ChartOverlay::compute(&series, &OverlayConfig::default());
    /// assert_eq!(overlay.sma().unwrap().len(), 30);
    /// assert_eq!(overlay.sma().unwrap()[19], Some(109.5));
    /// ```
    #[must_use]
    pub fn compute(series: &PriceSeries, config: &OverlayConfig) -> Self {
        let prices = series.prices();

        tracing::trace!(
            len = prices.len(),
            forecast_start = series.forecast_start(),
            ?config,
            "computing chart overlay"
        );

        Self {
            timestamps: series.timestamps(),
            forecast_start: series.forecast_start(),
            sma: config.sma.map(|period| sma(&prices, period)),
            ema: config.ema.map(|period| ema(&prices, period)),
            bollinger: config
                .bollinger
                .map(|bb| bollinger_bands(&prices, bb.period, bb.multiplier)),
            rsi: config.rsi.map(|period| rsi(&prices, period)),
        }
    }

    /// Like [`compute`](Self::compute), after validating `config`.
    ///
    /// # Errors
    ///
    /// Whatever [`OverlayConfig::validate`] reports.
    pub fn try_compute(series: &PriceSeries, config: &OverlayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::compute(series, config))
    }

    #[must_use]
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Index of the first forecast point.
    #[must_use]
    pub fn forecast_start(&self) -> usize {
        self.forecast_start
    }

    #[must_use]
    pub fn sma(&self) -> Option<&IndicatorSeries> {
        self.sma.as_ref()
    }

    #[must_use]
    pub fn ema(&self) -> Option<&IndicatorSeries> {
        self.ema.as_ref()
    }

    #[must_use]
    pub fn bollinger(&self) -> Option<&BollingerSeries> {
        self.bollinger.as_ref()
    }

    #[must_use]
    pub fn rsi(&self) -> Option<&IndicatorSeries> {
        self.rsi.as_ref()
    }
}
