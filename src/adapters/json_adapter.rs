//! JSON price cache adapter.
//!
//! Reads the price fetcher's cache layout: either one combined `_all.json`
//! mapping token to candle array, or one `<TOKEN>.json` array per token.
//! Candles use the compact keys `date, t, o, h, l, c, v`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::candle::Candle;
use crate::domain::error::ArenaError;
use crate::ports::data_port::DataPort;

pub const COMBINED_FILE: &str = "_all.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedCandle {
    pub date: NaiveDate,
    pub t: i64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub v: f64,
}

impl From<CachedCandle> for Candle {
    fn from(c: CachedCandle) -> Self {
        Candle {
            date: c.date,
            timestamp: c.t,
            open: c.o,
            high: c.h,
            low: c.l,
            close: c.c,
            volume: c.v,
        }
    }
}

impl From<&Candle> for CachedCandle {
    fn from(c: &Candle) -> Self {
        CachedCandle {
            date: c.date,
            t: c.timestamp,
            o: c.open,
            h: c.high,
            l: c.low,
            c: c.close,
            v: c.volume,
        }
    }
}

type Combined = BTreeMap<String, Vec<CachedCandle>>;

pub struct JsonAdapter {
    path: PathBuf,
    combined: Option<Combined>,
}

impl JsonAdapter {
    /// `path` is a combined file, or a directory holding either a combined
    /// file or per-token files.
    pub fn open(path: PathBuf) -> Result<Self, ArenaError> {
        let combined_path = if path.is_dir() {
            Some(path.join(COMBINED_FILE)).filter(|p| p.is_file())
        } else if path.is_file() {
            Some(path.clone())
        } else {
            return Err(ArenaError::NoData {
                path: path.display().to_string(),
            });
        };

        let combined = match combined_path {
            Some(file) => {
                debug!(file = %file.display(), "reading combined price cache");
                Some(read_json::<Combined>(&file)?)
            }
            None => None,
        };
        Ok(Self { path, combined })
    }

    fn token_path(&self, token: &str) -> PathBuf {
        self.path.join(format!("{token}.json"))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, ArenaError> {
    let content = fs::read_to_string(file)?;
    serde_json::from_str(&content).map_err(|e| ArenaError::DataFormat {
        source_name: file.display().to_string(),
        reason: e.to_string(),
    })
}

fn into_candles(cached: Vec<CachedCandle>) -> Vec<Candle> {
    let mut candles: Vec<Candle> = cached.into_iter().map(Candle::from).collect();
    candles.sort_by_key(|c| c.timestamp);
    candles
}

impl DataPort for JsonAdapter {
    fn fetch_candles(&self, token: &str) -> Result<Vec<Candle>, ArenaError> {
        match &self.combined {
            Some(all) => Ok(all.get(token).cloned().map(into_candles).unwrap_or_default()),
            None => {
                let cached: Vec<CachedCandle> = read_json(&self.token_path(token))?;
                Ok(into_candles(cached))
            }
        }
    }

    fn list_tokens(&self) -> Result<Vec<String>, ArenaError> {
        if let Some(all) = &self.combined {
            return Ok(all.keys().cloned().collect());
        }
        let mut tokens = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('_') {
                    tokens.push(stem.to_string());
                }
            }
        }
        tokens.sort();
        Ok(tokens)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
