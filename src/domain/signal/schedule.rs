//! Calendar-driven rules.

use super::{SignalContext, SignalOutput};

/// Dollar-cost average every seventh day.
pub fn hodl_dca(ctx: &SignalContext<'_>) -> SignalOutput {
    if ctx.index() % 7 == 0 {
        SignalOutput::buy(0.3)
    } else {
        SignalOutput::hold()
    }
}

/// Directional stand-in for yield strategies when a catalog does not treat
/// them as market-neutral: small periodic accumulation with occasional trims.
pub fn yield_accrual(ctx: &SignalContext<'_>) -> SignalOutput {
    let index = ctx.index();
    if index % 3 == 0 {
        SignalOutput::buy(0.3)
    } else if index % 7 == 0 {
        SignalOutput::sell(0.2)
    } else {
        SignalOutput::hold()
    }
}
