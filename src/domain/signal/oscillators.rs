//! RSI threshold rules.

use super::{SignalContext, SignalOutput};

/// Oversold at the lower band buys strongly, overbought at the upper band
/// sells strongly; RSI alone gives weaker signals.
pub fn mean_reversion(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(rsi), Some(bands)) = (ctx.rsi(), ctx.bands()) else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    if rsi < 30.0 && close <= bands.lower {
        SignalOutput::buy(0.7)
    } else if rsi > 70.0 && close >= bands.upper {
        SignalOutput::sell(0.7)
    } else if rsi < 35.0 {
        SignalOutput::buy(0.4)
    } else if rsi > 65.0 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

pub fn rsi_divergence(ctx: &SignalContext<'_>) -> SignalOutput {
    match ctx.rsi() {
        Some(rsi) if rsi < 30.0 => SignalOutput::buy(0.6),
        Some(rsi) if rsi > 70.0 => SignalOutput::sell(0.6),
        _ => SignalOutput::hold(),
    }
}

/// Contrarian on RSI extremes.
pub fn fear_greed(ctx: &SignalContext<'_>) -> SignalOutput {
    match ctx.rsi() {
        Some(rsi) if rsi < 25.0 => SignalOutput::buy(0.7),
        Some(rsi) if rsi > 75.0 => SignalOutput::sell(0.7),
        _ => SignalOutput::hold(),
    }
}

/// Calm markets (volatility under 2%) trade RSI reversion; volatile markets
/// follow price against EMA(12).
pub fn volatility_regime(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(vol), Some(rsi)) = (ctx.volatility(), ctx.rsi()) else {
        return SignalOutput::hold();
    };
    if vol < 0.02 {
        if rsi < 35.0 {
            return SignalOutput::buy(0.5);
        }
        if rsi > 65.0 {
            return SignalOutput::sell(0.5);
        }
    } else if let Some(ema12) = ctx.ema12() {
        let close = ctx.close();
        if close > ema12 {
            return SignalOutput::buy(0.5);
        }
        if close < ema12 {
            return SignalOutput::sell(0.5);
        }
    }
    SignalOutput::hold()
}
