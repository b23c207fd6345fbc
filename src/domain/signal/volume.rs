//! Volume and volatility surge rules.

use super::{SignalContext, SignalOutput};

/// Current volume exceeds `factor` times `avg`. A zero average counts any
/// positive volume as a surge.
fn surges(volume: f64, avg: f64, factor: f64) -> bool {
    if avg > 0.0 {
        volume / avg > factor
    } else {
        volume > 0.0
    }
}

/// Buy volume spikes over the prior five days.
pub fn mev_extraction(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(avg) = ctx.avg_volume_before(5) else {
        return SignalOutput::hold();
    };
    if ctx.volume() > avg * 1.5 {
        SignalOutput::buy(0.5)
    } else {
        SignalOutput::hold()
    }
}

/// Flash Loan Arb, Cross-Chain Arb: long when volatile, out when calm.
pub fn volatility_arb(ctx: &SignalContext<'_>) -> SignalOutput {
    match ctx.volatility() {
        Some(vol) if vol > 0.03 => SignalOutput::buy(0.5),
        Some(vol) if vol < 0.015 => SignalOutput::sell(0.3),
        _ => SignalOutput::hold(),
    }
}

/// Volume Profile, Order Flow: volume above twice the 10-day average,
/// direction from the day's close-to-close move.
pub fn volume_profile(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(avg), Some(prev)) = (ctx.avg_volume_before(10), ctx.candle_back(1)) else {
        return SignalOutput::hold();
    };
    if !surges(ctx.volume(), avg, 2.0) {
        return SignalOutput::hold();
    }
    let close = ctx.close();
    if close > prev.close {
        SignalOutput::buy(0.6)
    } else if close < prev.close {
        SignalOutput::sell(0.6)
    } else {
        SignalOutput::hold()
    }
}

/// Trend side of the 20-day average with above-average volume.
pub fn on_chain_analytics(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(ma), Some(avg)) = (ctx.sma20(), ctx.avg_volume_before(5)) else {
        return SignalOutput::hold();
    };
    let close = ctx.close();
    let active = ctx.volume() > avg;
    if close > ma && active {
        SignalOutput::buy(0.5)
    } else if close < ma && active {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

/// Trade band expansion in the direction of price relative to the midline.
pub fn volatility_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(_), Some(bands)) = (ctx.volatility(), ctx.bands()) else {
        return SignalOutput::hold();
    };
    if bands.bandwidth > 0.08 {
        if ctx.close() > bands.middle {
            SignalOutput::buy(0.5)
        } else {
            SignalOutput::sell(0.5)
        }
    } else {
        SignalOutput::hold()
    }
}

/// Bandwidth expanding out of a squeeze below 4%.
pub fn bollinger_squeeze(ctx: &SignalContext<'_>) -> SignalOutput {
    if ctx.index() < 2 {
        return SignalOutput::hold();
    }
    let (Some(bands), Some(prev)) = (ctx.bands(), ctx.bands_back(1)) else {
        return SignalOutput::hold();
    };
    if bands.bandwidth > prev.bandwidth && prev.bandwidth < 0.04 {
        if ctx.close() > bands.middle {
            SignalOutput::buy(0.6)
        } else {
            SignalOutput::sell(0.6)
        }
    } else {
        SignalOutput::hold()
    }
}
