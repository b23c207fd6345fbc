//! CSV file data adapter.
//!
//! One `<TOKEN>.csv` per token with the header
//! `date,timestamp,open,high,low,close,volume`. The timestamp column may be
//! left empty, in which case midnight UTC of `date` is used.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::candle::Candle;
use crate::domain::error::ArenaError;
use crate::ports::data_port::DataPort;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    timestamp: Option<i64>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<CsvRow> for Candle {
    fn from(row: CsvRow) -> Self {
        Candle {
            timestamp: row
                .timestamp
                .unwrap_or_else(|| midnight_millis(row.date)),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

pub(crate) fn midnight_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map_or(0, |dt| dt.and_utc().timestamp_millis())
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, token: &str) -> PathBuf {
        self.base_path.join(format!("{token}.csv"))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self, token: &str) -> Result<Vec<Candle>, ArenaError> {
        let path = self.csv_path(token);
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();
        for row in rdr.deserialize::<CsvRow>() {
            let row = row.map_err(|e| ArenaError::DataFormat {
                source_name: path.display().to_string(),
                reason: e.to_string(),
            })?;
            candles.push(Candle::from(row));
        }

        candles.sort_by_key(|c| c.timestamp);
        Ok(candles)
    }

    fn list_tokens(&self) -> Result<Vec<String>, ArenaError> {
        let mut tokens = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tokens.push(stem.to_string());
            }
        }
        tokens.sort();
        Ok(tokens)
    }

    fn describe(&self) -> String {
        self.base_path.display().to_string()
    }
}
