//! Report generation port trait.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::aggregate::Aggregate;
use crate::domain::error::ArenaError;
use crate::domain::market::TokenContext;
use crate::domain::simulator::SimulationResult;

/// Run-level facts shown in every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub date: NaiveDate,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_agents: usize,
    pub initial_capital: f64,
    pub catalog: String,
    pub trade_fee: f64,
    pub slippage: f64,
    pub max_position_pct: f64,
}

/// Everything a report renders. `results` are ordered best first.
#[derive(Debug, Clone, Copy)]
pub struct ArenaReport<'a> {
    pub meta: &'a RunMeta,
    pub market: &'a [TokenContext],
    pub results: &'a [SimulationResult],
    pub aggregate: &'a Aggregate,
}

/// Port for writing arena reports.
pub trait ReportPort {
    /// Write the report under `output_dir`, returning the file written.
    fn write(&self, report: &ArenaReport<'_>, output_dir: &Path) -> Result<PathBuf, ArenaError>;
}
