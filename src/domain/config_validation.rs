//! Configuration validation.
//!
//! Validates every config field before any data is loaded. Absent keys fall
//! back to their defaults, so only present values are range-checked.

use crate::domain::arena::DEFAULT_AGENT_COUNT;
use crate::domain::catalog::CATALOG_NAMES;
use crate::domain::error::ArenaError;
use crate::domain::execution::{
    DEFAULT_MAX_CASH_FRACTION, DEFAULT_MAX_POSITION_PCT, DEFAULT_MIN_CASH_TO_BUY,
    DEFAULT_MIN_TRADE_VALUE, DEFAULT_SLIPPAGE, DEFAULT_TRADE_FEE,
};
use crate::domain::simulator::{DEFAULT_INITIAL_CAPITAL, DEFAULT_MIN_CANDLES, DEFAULT_WARMUP};
use crate::domain::universe::parse_tokens;
use crate::ports::config_port::ConfigPort;

pub const DATA_FORMATS: &[&str] = &["json", "csv"];

pub fn validate_arena_config(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    validate_agents(config)?;
    validate_initial_capital(config)?;
    validate_warmup(config)?;
    validate_threads(config)?;
    validate_catalog(config)?;
    validate_data(config)?;
    validate_report(config)?;
    Ok(())
}

pub fn validate_execution_config(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    validate_costs(config)?;
    validate_fraction(config, "max_position_pct", DEFAULT_MAX_POSITION_PCT)?;
    validate_fraction(config, "max_cash_fraction", DEFAULT_MAX_CASH_FRACTION)?;
    validate_non_negative(config, "min_trade_value", DEFAULT_MIN_TRADE_VALUE)?;
    validate_non_negative(config, "min_cash_to_buy", DEFAULT_MIN_CASH_TO_BUY)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ArenaError {
    ArenaError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_agents(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    let value = config.get_int("arena", "agents", i64::from(DEFAULT_AGENT_COUNT));
    if value < 1 || value > i64::from(u32::MAX) {
        return Err(invalid("arena", "agents", "agents must be at least 1"));
    }
    Ok(())
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    let value = config.get_double("arena", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid(
            "arena",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_warmup(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    let warmup = config.get_int("arena", "warmup", DEFAULT_WARMUP as i64);
    if warmup < 0 {
        return Err(invalid("arena", "warmup", "warmup must be non-negative"));
    }
    let min_candles = config.get_int("arena", "min_candles", DEFAULT_MIN_CANDLES as i64);
    if min_candles < 1 {
        return Err(invalid(
            "arena",
            "min_candles",
            "min_candles must be at least 1",
        ));
    }
    if warmup >= min_candles {
        return Err(invalid(
            "arena",
            "warmup",
            "warmup must be less than min_candles",
        ));
    }
    Ok(())
}

fn validate_threads(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    if config.get_int("arena", "threads", 0) < 0 {
        return Err(invalid("arena", "threads", "threads must be non-negative"));
    }
    Ok(())
}

fn validate_catalog(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    if let Some(name) = config.get_string("arena", "catalog") {
        let name = name.trim().to_lowercase();
        if !CATALOG_NAMES.contains(&name.as_str()) {
            return Err(invalid(
                "arena",
                "catalog",
                &format!("unknown catalog, expected one of {}", CATALOG_NAMES.join(", ")),
            ));
        }
    }
    if let Some(tokens) = config.get_string("catalog", "tokens") {
        parse_tokens(&tokens).map_err(|e| invalid("catalog", "tokens", &e.to_string()))?;
    }
    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    if let Some(format) = config.get_string("data", "format") {
        if !DATA_FORMATS.contains(&format.trim().to_lowercase().as_str()) {
            return Err(invalid("data", "format", "format must be json or csv"));
        }
    }
    Ok(())
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    for key in ["top", "bottom"] {
        if config.get_int("report", key, 0) < 0 {
            return Err(invalid("report", key, "must be non-negative"));
        }
    }
    Ok(())
}

fn validate_costs(config: &dyn ConfigPort) -> Result<(), ArenaError> {
    let fee = config.get_double("execution", "trade_fee", DEFAULT_TRADE_FEE);
    if !(0.0..1.0).contains(&fee) {
        return Err(invalid(
            "execution",
            "trade_fee",
            "trade_fee must be in [0, 1)",
        ));
    }
    let slippage = config.get_double("execution", "slippage", DEFAULT_SLIPPAGE);
    if !(0.0..1.0).contains(&slippage) {
        return Err(invalid(
            "execution",
            "slippage",
            "slippage must be in [0, 1)",
        ));
    }
    if fee + slippage >= 1.0 {
        return Err(invalid(
            "execution",
            "slippage",
            "trade_fee + slippage must be below 1",
        ));
    }
    Ok(())
}

fn validate_fraction(config: &dyn ConfigPort, key: &str, default: f64) -> Result<(), ArenaError> {
    let value = config.get_double("execution", key, default);
    if value <= 0.0 || value > 1.0 {
        return Err(invalid(
            "execution",
            key,
            &format!("{key} must be in (0, 1]"),
        ));
    }
    Ok(())
}

fn validate_non_negative(
    config: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<(), ArenaError> {
    if config.get_double("execution", key, default) < 0.0 {
        return Err(invalid(
            "execution",
            key,
            &format!("{key} must be non-negative"),
        ));
    }
    Ok(())
}
