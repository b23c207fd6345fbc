//! Short-window return rules.

use super::{SignalContext, SignalOutput};

/// Liquidation Hunting, Recursive Lending: buy sharp daily drops.
pub fn liquidation_hunting(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(day) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if day < -0.05 {
        SignalOutput::buy(0.7)
    } else if day > 0.03 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// Memecoin Momentum, Token Sniping: chase three-day runs, bail hard on
/// reversals.
pub fn memecoin_momentum(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ret3) = ctx.return_over(3) else {
        return SignalOutput::hold();
    };
    if ret3 > 0.08 {
        SignalOutput::buy(0.8)
    } else if ret3 < -0.05 {
        SignalOutput::sell(0.9)
    } else if ret3 > 0.03 {
        SignalOutput::buy(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// KOL Copy Trading, Whale Tracking: follow yesterday's move one day late,
/// buying only on a volume spike.
pub fn copy_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let (Some(prev), Some(prev2)) = (ctx.candle_back(1), ctx.candle_back(2)) else {
        return SignalOutput::hold();
    };
    let prev_ret = prev.return_since(prev2.close);
    let volume_spike = ctx
        .avg_volume_before(5)
        .is_some_and(|avg| ctx.volume() > avg * 1.3);
    if prev_ret > 0.02 && volume_spike {
        SignalOutput::buy(0.6)
    } else if prev_ret < -0.03 {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

pub fn liquidation_cascade(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(day) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if day < -0.08 {
        SignalOutput::buy(0.9)
    } else if day > 0.05 {
        SignalOutput::sell(0.5)
    } else {
        SignalOutput::hold()
    }
}

pub fn market_making(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(change) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if change < -0.01 {
        SignalOutput::buy(0.3)
    } else if change > 0.01 {
        SignalOutput::sell(0.3)
    } else {
        SignalOutput::hold()
    }
}

/// Fade five-day moves beyond 10%.
pub fn correlation_breakdown(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ret5) = ctx.return_over(5) else {
        return SignalOutput::hold();
    };
    if ret5.abs() > 0.10 {
        if ret5 > 0.0 {
            SignalOutput::sell(0.6)
        } else {
            SignalOutput::buy(0.6)
        }
    } else {
        SignalOutput::hold()
    }
}

/// Sentiment Trading, News Trading: a 5% day stands in for a news event.
pub fn news_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(day) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if day > 0.05 {
        SignalOutput::buy(0.6)
    } else if day < -0.05 {
        SignalOutput::sell(0.6)
    } else {
        SignalOutput::hold()
    }
}

pub fn scalping(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(change) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if change < -0.008 {
        SignalOutput::buy(0.4)
    } else if change > 0.008 {
        SignalOutput::sell(0.4)
    } else {
        SignalOutput::hold()
    }
}

/// Five-day moves confirmed by RSI.
pub fn swing_trading(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(ret5) = ctx.return_over(5) else {
        return SignalOutput::hold();
    };
    // An RSI of exactly zero confirms nothing.
    let rsi = ctx.rsi().filter(|&r| r != 0.0);
    if ret5 < -0.05 && rsi.is_some_and(|r| r < 40.0) {
        SignalOutput::buy(0.6)
    } else if ret5 > 0.05 && rsi.is_some_and(|r| r > 60.0) {
        SignalOutput::sell(0.6)
    } else {
        SignalOutput::hold()
    }
}

/// Double down on losing days.
pub fn martingale(ctx: &SignalContext<'_>) -> SignalOutput {
    let Some(day) = ctx.return_over(1) else {
        return SignalOutput::hold();
    };
    if day < -0.03 {
        SignalOutput::buy(0.9)
    } else if day > 0.02 {
        SignalOutput::sell(0.3)
    } else {
        SignalOutput::hold()
    }
}
