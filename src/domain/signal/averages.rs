//! Moving-average and band deviation rules.

use super::{SignalContext, SignalOutput};

/// Yield Rotation, Concentrated LP, IL Hedging, Governance Arb: loose trend
/// following around the 20-day average.
pub fn sma_trend(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ma) = ctx.sma20() else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    if close > ma * 1.01 {
        SignalOutput::buy(0.4)
    } else if close < ma * 0.99 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// Pairs Trading, Stat Arb: fade a 3% deviation from the 20-day average.
pub fn pairs_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ma) = ctx.sma20() else {
        return SignalOutput::hold();
    };
    let dev = (ctx.close() - ma) / ma;
    if dev < -0.03 {
        SignalOutput::buy(0.6)
    } else if dev > 0.03 {
        SignalOutput::sell(0.6)
    } else {
        SignalOutput::hold()
    }
}

pub fn grid_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ma) = ctx.sma20() else {
        return SignalOutput::hold();
    };
    let pct_from_ma = (ctx.close() - ma) / ma;
    if pct_from_ma < -0.02 {
        SignalOutput::buy(0.4)
    } else if pct_from_ma > 0.02 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// The 20-day average stands in for VWAP.
pub fn vwap_strategy(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(vwap) = ctx.sma20() else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    if close < vwap * 0.98 {
        SignalOutput::buy(0.5)
    } else if close > vwap * 1.02 {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

pub fn position_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ma50) = ctx.sma50() else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    if close > ma50 * 1.02 {
        SignalOutput::buy(0.4)
    } else if close < ma50 * 0.98 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// Tenkan = EMA(9), kijun = SMA(26).
pub fn ichimoku_cloud(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(tenkan), Some(kijun)) = (ctx.ema9(), ctx.sma26()) else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    if tenkan > kijun && close > tenkan {
        SignalOutput::buy(0.5)
    } else if tenkan < kijun && close < tenkan {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

pub fn ema_ribbon(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(e9), Some(e12), Some(e26)) = (ctx.ema9(), ctx.ema12(), ctx.ema26()) else {
        return SignalOutput::hold();
    };
    if e9 > e12 && e12 > e26 {
        SignalOutput::buy(0.5)
    } else if e9 < e12 && e12 < e26 {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

/// MACD line (EMA12 - EMA26) crossing zero, or sitting on one side of it.
pub fn momentum(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(ema12), Some(ema26)) = (ctx.ema12(), ctx.ema26()) else {
        return SignalOutput::hold();
    };
    let macd = ema12 - ema26;
    let ind = ctx.indicators();
    // A missing previous reading counts as zero, so the first EMA26 day
    // compares against the bare EMA12.
    let prev_macd = ctx.index().checked_sub(1).map(|_| {
        ctx.back(&ind.ema12, 1).unwrap_or(0.0) - ctx.back(&ind.ema26, 1).unwrap_or(0.0)
    });

    match prev_macd {
        Some(prev) if macd > 0.0 && prev <= 0.0 => return SignalOutput::buy(0.7),
        Some(prev) if macd < 0.0 && prev >= 0.0 => return SignalOutput::sell(0.7),
        _ => {}
    }
    if macd > 0.0 {
        SignalOutput::buy(0.3)
    } else if macd < 0.0 {
        SignalOutput::sell(0.3)
    } else {
        SignalOutput::hold()
    }
}

/// Retracement levels of the prior 20-day range; buy near 61.8%, sell near
/// 38.2%, within half a percent.
pub fn fibonacci(ctx: &SignalContext<'_>) -> SignalOutput {
    if ctx.index() < 20 {
        return SignalOutput::hold();
    }
    let (Some(high), Some(low)) = (ctx.high_before(20), ctx.low_before(20)) else {
        return SignalOutput::hold();
    };
    let range = high - low;
    let fib382 = high - range * 0.382;
    let fib618 = high - range * 0.618;
    let close = ctx.close();
    let near = |level: f64| close <= level * 1.005 && close >= level * 0.995;
    if near(fib618) {
        SignalOutput::buy(0.5)
    } else if near(fib382) {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

/// Close beyond the prior 20-day extremes; upside breaks need a volume
/// surge over the prior 10 days.
pub fn breakout_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    if ctx.index() < 20 {
        return SignalOutput::hold();
    }
    let (Some(high20), Some(low20), Some(avg_vol)) = (
        ctx.high_before(20),
        ctx.low_before(20),
        ctx.avg_volume_before(10),
    ) else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    let volume_confirmed = ctx.volume() > avg_vol * 1.2;
    if close > high20 && volume_confirmed {
        SignalOutput::buy(0.8)
    } else if close < low20 {
        SignalOutput::sell(0.8)
    } else {
        SignalOutput::hold()
    }
}
