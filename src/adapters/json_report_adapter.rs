//! Machine-readable results file.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::aggregate::{ArenaSummary, GroupStats};
use crate::domain::error::ArenaError;
use crate::domain::market::TokenContext;
use crate::domain::simulator::SimulationResult;
use crate::ports::report_port::{ArenaReport, ReportPort, RunMeta};

pub const RESULTS_FILE: &str = "results.json";
pub const DEFAULT_TOP: usize = 50;
pub const DEFAULT_BOTTOM: usize = 20;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsDocument<'a> {
    meta: &'a RunMeta,
    market: &'a [TokenContext],
    summary: &'a ArenaSummary,
    strategy_rankings: &'a [GroupStats],
    category_rankings: &'a [GroupStats],
    risk_rankings: &'a [GroupStats],
    aggression_rankings: &'a [GroupStats],
    top: &'a [SimulationResult],
    bottom: &'a [SimulationResult],
}

pub struct JsonReportAdapter {
    top: usize,
    bottom: usize,
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TOP, DEFAULT_BOTTOM)
    }
}

impl JsonReportAdapter {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    fn document<'a>(&self, report: &ArenaReport<'a>) -> ResultsDocument<'a> {
        let results = report.results;
        let top = self.top.min(results.len());
        let bottom = self.bottom.min(results.len());
        let agg = report.aggregate;
        ResultsDocument {
            meta: report.meta,
            market: report.market,
            summary: &agg.summary,
            strategy_rankings: &agg.by_strategy,
            category_rankings: &agg.by_category,
            risk_rankings: &agg.by_risk_tier,
            aggression_rankings: &agg.by_aggression,
            top: &results[..top],
            bottom: &results[results.len() - bottom..],
        }
    }

    pub fn to_value(&self, report: &ArenaReport<'_>) -> Result<serde_json::Value, ArenaError> {
        serde_json::to_value(self.document(report)).map_err(|e| ArenaError::Report {
            reason: e.to_string(),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &ArenaReport<'_>, output_dir: &Path) -> Result<PathBuf, ArenaError> {
        fs::create_dir_all(output_dir).map_err(|e| ArenaError::Report {
            reason: format!("failed to create {}: {e}", output_dir.display()),
        })?;
        let path = output_dir.join(RESULTS_FILE);
        let file = File::create(&path).map_err(|e| ArenaError::Report {
            reason: format!("failed to create {}: {e}", path.display()),
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.document(report)).map_err(
            |e| ArenaError::Report {
                reason: format!("failed to write {}: {e}", path.display()),
            },
        )?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::SampleRun;
    use tempfile::tempdir;

    #[test]
    fn document_has_every_section() {
        let run = SampleRun::new(10);
        let value = JsonReportAdapter::default().to_value(&run.report()).unwrap();
        for key in [
            "meta",
            "market",
            "summary",
            "strategyRankings",
            "categoryRankings",
            "riskRankings",
            "aggressionRankings",
            "top",
            "bottom",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["meta"]["totalAgents"], 10);
        assert_eq!(value["meta"]["date"], "2025-02-01");
        assert_eq!(value["summary"]["agents"], 10);
    }

    #[test]
    fn leaderboards_are_clamped() {
        let run = SampleRun::new(6);
        let value = JsonReportAdapter::new(4, 3).to_value(&run.report()).unwrap();
        assert_eq!(value["top"].as_array().unwrap().len(), 4);
        let bottom = value["bottom"].as_array().unwrap();
        assert_eq!(bottom.len(), 3);
        assert_eq!(bottom[2]["id"], run.results[5].agent.id);

        let value = JsonReportAdapter::default().to_value(&run.report()).unwrap();
        assert_eq!(value["top"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn result_entries_are_flat_camel_case() {
        let run = SampleRun::new(3);
        let value = JsonReportAdapter::default().to_value(&run.report()).unwrap();
        let first = &value["top"][0];
        assert!(first.get("primaryStrategy").is_some());
        assert!(first.get("returnPct").is_some());
        assert!(first.get("maxDrawdownPct").is_some());
        assert!(first.get("agent").is_none());
    }

    #[test]
    fn write_produces_parseable_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reports");
        let run = SampleRun::new(4);
        let path = JsonReportAdapter::default()
            .write(&run.report(), &out)
            .unwrap();
        assert_eq!(path, out.join(RESULTS_FILE));
        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["strategyRankings"].as_array().unwrap().len(), run.aggregate.by_strategy.len());
    }
}
