use thiserror::Error;

/// Invalid indicator or overlay configuration.
///
/// Computation itself never fails: insufficient or malformed input degrades
/// to absent values. Only settings are checked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{indicator} period must be greater than zero")]
    ZeroPeriod { indicator: &'static str },

    #[error("standard deviation multiplier must be positive and finite, got {0}")]
    InvalidStdDev(f64),

    #[error("MACD fast period ({fast}) must be shorter than slow period ({slow})")]
    MacdPeriods { fast: usize, slow: usize },
}
