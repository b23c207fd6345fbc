#![allow(dead_code)]

use agent_arena::domain::candle::Candle;
use agent_arena::domain::error::ArenaError;
use agent_arena::ports::data_port::DataPort;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::process::ExitCode;

pub const TOKENS: &[&str] = &["SOL", "BONK", "WIF", "JUP", "JTO", "RAY"];

pub struct MockDataPort {
    pub data: BTreeMap<String, Vec<Candle>>,
    pub errors: BTreeMap<String, String>,
    pub missing: Vec<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            errors: BTreeMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn with_candles(mut self, token: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(token.to_string(), candles);
        self
    }

    pub fn with_error(mut self, token: &str, reason: &str) -> Self {
        self.errors.insert(token.to_string(), reason.to_string());
        self
    }

    /// `token` behaves like a data file that does not exist.
    pub fn with_missing(mut self, token: &str) -> Self {
        self.data.remove(token);
        self.missing.push(token.to_string());
        self
    }

    /// Every default token with the same series shape, offset per token.
    pub fn full_universe(days: usize, shape: fn(usize, usize) -> f64) -> Self {
        TOKENS.iter().enumerate().fold(Self::new(), |port, (k, token)| {
            let closes: Vec<f64> = (0..days).map(|i| shape(k, i)).collect();
            port.with_candles(token, candles_from_closes(&closes))
        })
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(&self, token: &str) -> Result<Vec<Candle>, ArenaError> {
        if let Some(reason) = self.errors.get(token) {
            return Err(ArenaError::DataFormat {
                source_name: token.to_string(),
                reason: reason.clone(),
            });
        }
        if self.missing.iter().any(|t| t == token) {
            return Err(ArenaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{token}.json"),
            )));
        }
        Ok(self.data.get(token).cloned().unwrap_or_default())
    }

    fn list_tokens(&self) -> Result<Vec<String>, ArenaError> {
        Ok(self.data.keys().cloned().collect())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily candles from 2024-01-01 with a 2% intraday range around each close.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            date: start + Days::new(i as u64),
            timestamp: 1_704_067_200_000 + i as i64 * 86_400_000,
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 50_000.0 + (i % 7) as f64 * 5_000.0,
        })
        .collect()
}

pub fn flat(_token: usize, _day: usize) -> f64 {
    100.0
}

pub fn uptrend(token: usize, day: usize) -> f64 {
    (50.0 + token as f64 * 10.0) * 1.01f64.powi(day as i32)
}

pub fn wave(token: usize, day: usize) -> f64 {
    let t = day as f64;
    100.0 + 15.0 * (t / (5.0 + token as f64)).sin() + 0.1 * t
}

pub fn is_success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}
