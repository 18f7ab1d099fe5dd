use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Price, ema, macd, rolling_volatility, rsi};

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const EMA_SHORT: usize = 9;
const EMA_LONG: usize = 21;
const VOLATILITY_WINDOW: usize = 10;

const BULLISH_RSI: f64 = 55.0;
const BEARISH_RSI: f64 = 45.0;
const BASE_SCORE: f64 = 0.7;
const MAX_RSI_BONUS: f64 = 0.3;

/// Market direction read from a price path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bullish => "Bullish",
            Self::Bearish => "Bearish",
            Self::Neutral => "Neutral",
        })
    }
}

/// Last value of each indicator behind a [`SentimentView`].
///
/// Absent when the series is too short for that indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentIndicators {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub volatility: Option<f64>,
    pub momentum: Option<f64>,
}

/// Sentiment of a forecast over one horizon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentView {
    /// Forecast horizon, in steps.
    pub horizon: usize,
    pub label: SentimentLabel,
    /// In `[-1, -0.7]` when bearish, `[0.7, 1]` when bullish, otherwise `0`.
    pub score: f64,
    pub indicators: SentimentIndicators,
}

/// Classifies the path formed by `historical` followed by `forecast`.
///
/// Bullish needs MACD above its signal, EMA(9) above EMA(21) and RSI(14)
/// above 55. Bearish is the mirror image with RSI below 45. Anything else,
/// including an indicator that cannot be computed, is neutral.
///
/// # Example
///
/// ```
/// use forecast_ta::{SentimentLabel, classify_sentiment};
///
/// let history: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
/// let forecast = [160.0, 161.5, 163.0];
///
/// let view = classify_sentiment(&history, &forecast, 3);
/// assert_eq!(view.label, SentimentLabel::Bullish);
/// assert_eq!(view.score, 1.0);
/// ```
#[must_use]
pub fn classify_sentiment(historical: &[Price], forecast: &[Price], horizon: usize) -> SentimentView {
    let combined = [historical, forecast].concat();
    let indicators = SentimentIndicators::compute(&combined);
    let (label, score) = indicators.judge();

    tracing::debug!(
        horizon,
        len = combined.len(),
        %label,
        score,
        "classified forecast sentiment"
    );

    SentimentView {
        horizon,
        label,
        score,
        indicators,
    }
}

impl SentimentIndicators {
    fn compute(prices: &[Price]) -> Self {
        let macd = macd(prices, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

        Self {
            rsi: rsi(prices, RSI_PERIOD).last_value(),
            macd: macd.macd.last_value(),
            macd_signal: macd.signal.last_value(),
            ema_short: ema(prices, EMA_SHORT).last_value(),
            ema_long: ema(prices, EMA_LONG).last_value(),
            volatility: rolling_volatility(prices, VOLATILITY_WINDOW).last_value(),
            momentum: match prices {
                [.., prev, last] => Some(last - prev),
                _ => None,
            },
        }
    }

    fn judge(&self) -> (SentimentLabel, f64) {
        let (Some(rsi), Some(macd), Some(signal), Some(short), Some(long)) = (
            self.rsi,
            self.macd,
            self.macd_signal,
            self.ema_short,
            self.ema_long,
        ) else {
            return (SentimentLabel::Neutral, 0.0);
        };

        if macd > signal && short > long && rsi > BULLISH_RSI {
            let bonus = ((rsi - BULLISH_RSI) / 100.0).min(MAX_RSI_BONUS);
            (SentimentLabel::Bullish, BASE_SCORE + bonus)
        } else if macd < signal && short < long && rsi < BEARISH_RSI {
            let bonus = ((BEARISH_RSI - rsi) / 100.0).min(MAX_RSI_BONUS);
            (SentimentLabel::Bearish, -BASE_SCORE - bonus)
        } else {
            (SentimentLabel::Neutral, 0.0)
        }
    }
}
