//! Markdown report adapter implementing ReportPort.
//!
//! Renders market context, overall results, leaderboards, group rankings and
//! a short findings section into a single Markdown note.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::aggregate::{ArenaSummary, GroupStats};
use crate::domain::error::ArenaError;
use crate::ports::report_port::{ArenaReport, ReportPort};

pub const DEFAULT_TOP: usize = 20;
pub const DEFAULT_BOTTOM: usize = 10;

pub struct MarkdownReportAdapter {
    top: usize,
    bottom: usize,
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TOP, DEFAULT_BOTTOM)
    }
}

/// `+1.50` style for positive values.
fn signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{value:.decimals$}")
    } else {
        format!("{value:.decimals$}")
    }
}

fn pct_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl MarkdownReportAdapter {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    pub fn file_name(report: &ArenaReport<'_>) -> String {
        format!("Agent Arena Backtest - {}.md", report.meta.date)
    }

    pub fn render(&self, report: &ArenaReport<'_>) -> String {
        let mut md = String::new();
        self.header(&mut md, report);
        market_context(&mut md, report);
        overall(&mut md, &report.aggregate.summary);
        self.leaderboards(&mut md, report);
        strategy_rankings(&mut md, &report.aggregate.by_strategy);
        simple_groups(&mut md, "Performance by Category", "Category", &report.aggregate.by_category);
        risk_groups(&mut md, &report.aggregate.by_risk_tier);
        simple_groups(
            &mut md,
            "Performance by Aggression",
            "Aggression",
            &report.aggregate.by_aggression,
        );
        findings(&mut md, report);
        methodology(&mut md, report);
        md
    }

    fn header(&self, md: &mut String, report: &ArenaReport<'_>) {
        let meta = report.meta;
        let _ = writeln!(md, "# Agent Arena Backtest Report");
        let _ = writeln!(md, "**Date:** {}", meta.date);
        if let (Some(start), Some(end)) = (meta.start_date, meta.end_date) {
            let days = (end - start).num_days() + 1;
            let _ = writeln!(md, "**Data Period:** {start} to {end} (~{days} days)");
        }
        let _ = writeln!(
            md,
            "**Agents:** {} | **Starting Capital:** ${:.0} each | **Catalog:** {}\n",
            meta.total_agents, meta.initial_capital, meta.catalog
        );
        let _ = writeln!(md, "---\n");
    }

    fn leaderboards(&self, md: &mut String, report: &ArenaReport<'_>) {
        let results = report.results;
        let top = self.top.min(results.len());
        let _ = writeln!(md, "## Top {top} Agents\n");
        let _ = writeln!(
            md,
            "| Rank | Agent | Strategy | Return | Final $ | Trades | Win Rate | Max DD |"
        );
        let _ = writeln!(
            md,
            "|------|-------|----------|--------|---------|--------|----------|--------|"
        );
        for (i, r) in results.iter().take(top).enumerate() {
            let _ = writeln!(
                md,
                "| {} | {} #{} | {} | {}% | ${:.0} | {} | {:.0}% | {:.1}% |",
                i + 1,
                r.agent.name,
                r.agent.id,
                r.agent.primary_strategy,
                signed(r.return_pct, 1),
                r.final_value,
                r.trade_count,
                r.win_rate,
                r.max_drawdown_pct
            );
        }
        let _ = writeln!(md);

        let bottom = self.bottom.min(results.len());
        let first_rank = results.len() - bottom + 1;
        let _ = writeln!(md, "## Bottom {bottom} Agents\n");
        let _ = writeln!(
            md,
            "| Rank | Agent | Strategy | Return | Final $ | Trades | Aggression |"
        );
        let _ = writeln!(
            md,
            "|------|-------|----------|--------|---------|--------|------------|"
        );
        for (i, r) in results[results.len() - bottom..].iter().enumerate() {
            let _ = writeln!(
                md,
                "| {} | {} #{} | {} | {:.1}% | ${:.0} | {} | {} |",
                first_rank + i,
                r.agent.name,
                r.agent.id,
                r.agent.primary_strategy,
                r.return_pct,
                r.final_value,
                r.trade_count,
                r.agent.aggression
            );
        }
        let _ = writeln!(md);
    }
}

fn market_context(md: &mut String, report: &ArenaReport<'_>) {
    let _ = writeln!(md, "## Market Context\n");
    let _ = writeln!(md, "| Token | Start | End | Return | Days |");
    let _ = writeln!(md, "|-------|-------|-----|--------|------|");
    for ctx in report.market {
        let _ = writeln!(
            md,
            "| {} | ${:.4} | ${:.4} | {:.1}% | {} |",
            ctx.token, ctx.first_close, ctx.last_close, ctx.period_return_pct, ctx.candles
        );
    }
    let _ = writeln!(md);
}

fn overall(md: &mut String, s: &ArenaSummary) {
    let _ = writeln!(md, "## Overall Results\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|--------|-------|");
    let _ = writeln!(md, "| Total Capital Deployed | ${:.0} |", s.total_capital);
    let _ = writeln!(md, "| Final Portfolio Value | ${:.0} |", s.total_final_value);
    let _ = writeln!(md, "| Net P&L | ${:.0} |", s.net_pnl);
    let _ = writeln!(md, "| Average Return | {:.2}% |", s.avg_return_pct);
    let _ = writeln!(md, "| Median Return | {:.2}% |", s.median_return_pct);
    let _ = writeln!(
        md,
        "| Profitable Agents | {} ({:.1}%) |",
        s.profitable,
        pct_of(s.profitable, s.agents)
    );
    let _ = writeln!(md, "| Avg Trades per Agent | {:.1} |", s.avg_trades);
    let _ = writeln!(md, "| Avg Win Rate | {:.1}% |", s.avg_win_rate);
    let _ = writeln!(md, "| Avg Max Drawdown | {:.1}% |", s.avg_max_drawdown_pct);
    let _ = writeln!(md);
}

fn strategy_rankings(md: &mut String, groups: &[GroupStats]) {
    let _ = writeln!(md, "## Strategy Performance Rankings\n");
    let _ = writeln!(
        md,
        "| Rank | Strategy | Category | Risk | Avg Return | Med Return | Win Rate | Profitable | Avg DD |"
    );
    let _ = writeln!(
        md,
        "|------|----------|----------|------|------------|------------|----------|------------|--------|"
    );
    for (i, g) in groups.iter().enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {}% | {}% | {:.0}% | {}/{} | {:.1}% |",
            i + 1,
            g.key,
            g.category.as_deref().unwrap_or("?"),
            g.risk_tier.map_or("?", |t| t.label()),
            signed(g.avg_return_pct, 2),
            signed(g.median_return_pct, 2),
            g.avg_win_rate,
            g.profitable,
            g.count,
            g.avg_max_drawdown_pct
        );
    }
    let _ = writeln!(md);
}

fn simple_groups(md: &mut String, title: &str, label: &str, groups: &[GroupStats]) {
    let _ = writeln!(md, "## {title}\n");
    let _ = writeln!(md, "| {label} | Agents | Avg Return | Profitable |");
    let _ = writeln!(md, "|---|--------|------------|------------|");
    for g in groups {
        let _ = writeln!(
            md,
            "| {} | {} | {}% | {}/{} ({:.0}%) |",
            g.key,
            g.count,
            signed(g.avg_return_pct, 2),
            g.profitable,
            g.count,
            g.profitable_pct()
        );
    }
    let _ = writeln!(md);
}

fn risk_groups(md: &mut String, groups: &[GroupStats]) {
    let _ = writeln!(md, "## Performance by Risk Level\n");
    let _ = writeln!(md, "| Risk | Agents | Avg Return | Avg DD | Profitable |");
    let _ = writeln!(md, "|------|--------|------------|--------|------------|");
    for g in groups {
        let _ = writeln!(
            md,
            "| {} | {} | {}% | {:.1}% | {}/{} ({:.0}%) |",
            g.key,
            g.count,
            signed(g.avg_return_pct, 2),
            g.avg_max_drawdown_pct,
            g.profitable,
            g.count,
            g.profitable_pct()
        );
    }
    let _ = writeln!(md);
}

fn findings(md: &mut String, report: &ArenaReport<'_>) {
    let agg = report.aggregate;
    let s = &agg.summary;
    let (Some(best), Some(worst)) = (report.results.first(), report.results.last()) else {
        return;
    };
    let _ = writeln!(md, "---\n");
    let _ = writeln!(md, "## Key Findings\n");

    let _ = writeln!(md, "### What Worked");
    if let Some(g) = agg.by_strategy.first() {
        let _ = writeln!(
            md,
            "- **Best strategy:** {} ({}) with avg {}% return and {:.0}% win rate",
            g.key,
            g.category.as_deref().unwrap_or("?"),
            signed(g.avg_return_pct, 2),
            g.avg_win_rate
        );
    }
    if let Some(g) = agg.by_category.first() {
        let _ = writeln!(
            md,
            "- **Best category:** {} strategies averaged {}% returns",
            g.key,
            signed(g.avg_return_pct, 2)
        );
    }
    if let Some(g) = agg.by_risk_tier.first() {
        let _ = writeln!(
            md,
            "- **Best risk level:** {}-risk strategies averaged {}% returns",
            g.key,
            signed(g.avg_return_pct, 2)
        );
    }
    let _ = writeln!(
        md,
        "- **Top performing agent:** {} #{} returned {}% (${:.0} -> ${:.0})\n",
        best.agent.name,
        best.agent.id,
        signed(best.return_pct, 1),
        best.initial_capital,
        best.final_value
    );

    let _ = writeln!(md, "### What Didn't Work");
    if let Some(g) = agg.by_strategy.last() {
        let _ = writeln!(
            md,
            "- **Worst strategy:** {} ({}) with avg {:.2}% return",
            g.key,
            g.category.as_deref().unwrap_or("?"),
            g.avg_return_pct
        );
    }
    if let Some(g) = agg.by_category.last() {
        let _ = writeln!(
            md,
            "- **Worst category:** {} strategies averaged {:.2}% returns",
            g.key, g.avg_return_pct
        );
    }
    let _ = writeln!(
        md,
        "- **Worst performing agent:** {} #{} returned {:.1}%\n",
        worst.agent.name, worst.agent.id, worst.return_pct
    );

    let _ = writeln!(md, "### Insights");
    let _ = writeln!(
        md,
        "- {} out of {} agents ({:.1}%) were profitable",
        s.profitable,
        s.agents,
        pct_of(s.profitable, s.agents)
    );
    let median_reading = if s.median_return_pct >= 0.0 {
        "most agents at least preserved capital"
    } else {
        "most agents failed to beat holding cash"
    };
    let _ = writeln!(
        md,
        "- Median return of {:.2}%: {median_reading}",
        s.median_return_pct
    );
    let _ = writeln!(
        md,
        "- Average max drawdown of {:.1}% per agent",
        s.avg_max_drawdown_pct
    );
    let tier_avg = |label: &str| {
        agg.by_risk_tier
            .iter()
            .find(|g| g.key == label)
            .map(|g| g.avg_return_pct)
    };
    if let (Some(degen), Some(low)) = (tier_avg("DEGEN"), tier_avg("LOW")) {
        let reading = if degen.abs() > low.abs() {
            "higher risk led to more extreme outcomes"
        } else {
            "conservative approaches held up better"
        };
        let _ = writeln!(
            md,
            "- DEGEN vs LOW risk: DEGEN agents averaged {degen:.2}% vs LOW at {low:.2}%, {reading}"
        );
    }
    let _ = writeln!(md);
}

fn methodology(md: &mut String, report: &ArenaReport<'_>) {
    let meta = report.meta;
    let _ = writeln!(md, "### Methodology Notes");
    let _ = writeln!(
        md,
        "- All agents start with ${:.0} paper money",
        meta.initial_capital
    );
    let _ = writeln!(
        md,
        "- Trade fees: {}% per trade + {}% slippage",
        meta.trade_fee * 100.0,
        meta.slippage * 100.0
    );
    let _ = writeln!(
        md,
        "- Max position size: {}% of portfolio",
        meta.max_position_pct * 100.0
    );
    let _ = writeln!(md, "- Strategies are simplified implementations of the named approach");
    let _ = writeln!(md, "- Agents use dual strategies (primary + secondary) blended by confidence");
    let _ = writeln!(md, "- Position sizing varies by aggression level and risk management style");
    let _ = writeln!(md, "- No look-ahead: agents only see data up to the current candle");
}

impl ReportPort for MarkdownReportAdapter {
    fn write(&self, report: &ArenaReport<'_>, output_dir: &Path) -> Result<PathBuf, ArenaError> {
        fs::create_dir_all(output_dir).map_err(|e| ArenaError::Report {
            reason: format!("failed to create {}: {e}", output_dir.display()),
        })?;
        let path = output_dir.join(Self::file_name(report));
        fs::write(&path, self.render(report)).map_err(|e| ArenaError::Report {
            reason: format!("failed to write {}: {e}", path.display()),
        })?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::SampleRun;
    use tempfile::tempdir;

    #[test]
    fn signed_formatting() {
        assert_eq!(signed(1.234, 2), "+1.23");
        assert_eq!(signed(-1.0, 1), "-1.0");
        assert_eq!(signed(0.0, 1), "0.0");
    }

    #[test]
    fn render_includes_every_section() {
        let run = SampleRun::new(12);
        let md = MarkdownReportAdapter::default().render(&run.report());
        for heading in [
            "# Agent Arena Backtest Report",
            "## Market Context",
            "## Overall Results",
            "## Top 12 Agents",
            "## Bottom 10 Agents",
            "## Strategy Performance Rankings",
            "## Performance by Category",
            "## Performance by Risk Level",
            "## Performance by Aggression",
            "## Key Findings",
            "### Methodology Notes",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("| SOL |"));
        assert!(md.contains("SPARK #0"));
    }

    #[test]
    fn leaderboard_sizes_follow_settings() {
        let run = SampleRun::new(8);
        let md = MarkdownReportAdapter::new(3, 2).render(&run.report());
        assert!(md.contains("## Top 3 Agents"));
        assert!(md.contains("## Bottom 2 Agents"));
        assert!(md.contains("| 7 | "));
    }

    #[test]
    fn empty_population_renders_without_findings() {
        let run = SampleRun::new(0);
        let md = MarkdownReportAdapter::default().render(&run.report());
        assert!(md.contains("## Top 0 Agents"));
        assert!(!md.contains("## Key Findings"));
    }

    #[test]
    fn write_creates_dated_note() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/vault");
        let run = SampleRun::new(5);
        let path = MarkdownReportAdapter::default()
            .write(&run.report(), &out)
            .unwrap();
        assert!(path.ends_with("Agent Arena Backtest - 2025-02-01.md"));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("# Agent Arena Backtest Report"));
    }
}
