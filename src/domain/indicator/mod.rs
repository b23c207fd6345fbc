//! Technical indicators.
//!
//! Every indicator is a pure function over a token's candle history and
//! returns a series index-aligned with the candles. Entries inside the warmup
//! window are `None`; a computed value of zero is a real zero.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod set;
pub mod sma;
pub mod volatility;

use std::fmt;

pub use bollinger::BollingerBands;
pub use set::IndicatorSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Volatility(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

/// Index-aligned indicator output; `None` marks an unavailable entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries<T = f64> {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<T>>,
}

impl<T: Copy> IndicatorSeries<T> {
    /// Value at `index`, `None` during warmup or past the end of the series.
    pub fn at(&self, index: usize) -> Option<T> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first available entry.
    pub fn first_valid(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Volatility(period) => write!(f, "VOL({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
