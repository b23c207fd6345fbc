//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_adapter::JsonAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::markdown_report_adapter::{self, MarkdownReportAdapter};
use crate::domain::aggregate::Aggregate;
use crate::domain::agent::{AgentProfile, create_agent};
use crate::domain::arena::{ArenaRunner, DEFAULT_AGENT_COUNT};
use crate::domain::catalog::Catalog;
use crate::domain::config_validation::{validate_arena_config, validate_execution_config};
use crate::domain::error::ArenaError;
use crate::domain::execution::{
    DEFAULT_MAX_CASH_FRACTION, DEFAULT_MAX_POSITION_PCT, DEFAULT_MIN_CASH_TO_BUY,
    DEFAULT_MIN_TRADE_VALUE, DEFAULT_SLIPPAGE, DEFAULT_TRADE_FEE, ExecutionConfig,
};
use crate::domain::market::{MarketData, TokenContext};
use crate::domain::simulator::{
    DEFAULT_INITIAL_CAPITAL, DEFAULT_MIN_CANDLES, DEFAULT_WARMUP, SimulationConfig,
    SimulationResult,
};
use crate::domain::universe::{LoadedMarket, load_market, parse_tokens};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ArenaReport, ReportPort, RunMeta};

pub const DEFAULT_OUTPUT_DIR: &str = "reports";
pub const DEFAULT_DATA_FORMAT: &str = "json";

#[derive(Parser, Debug)]
#[command(name = "agent-arena", about = "Deterministic multi-agent strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the arena over a dataset and write reports
    Run {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        agents: Option<u32>,
    },
    /// Show one agent's profile, and its result when data is given
    Agent {
        #[arg(long)]
        id: u32,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Validate an arena configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the market context of a dataset
    Info {
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long, default_value = DEFAULT_DATA_FORMAT)]
        format: String,
    },
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub meta: RunMeta,
    pub market: Vec<TokenContext>,
    pub results: Vec<SimulationResult>,
    pub aggregate: Aggregate,
    pub reports: Vec<PathBuf>,
}

impl RunOutcome {
    pub fn report(&self) -> ArenaReport<'_> {
        ArenaReport {
            meta: &self.meta,
            market: &self.market,
            results: &self.results,
            aggregate: &self.aggregate,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            data,
            output,
            agents,
        } => run_arena(&config, data.as_deref(), output.as_deref(), agents),
        Command::Agent { id, config, data } => run_agent(id, config.as_deref(), data.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data, format } => run_info(&data, &format),
    }
}

fn fail(err: &ArenaError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

pub fn build_execution_config(config: &dyn ConfigPort) -> ExecutionConfig {
    ExecutionConfig {
        trade_fee: config.get_double("execution", "trade_fee", DEFAULT_TRADE_FEE),
        slippage: config.get_double("execution", "slippage", DEFAULT_SLIPPAGE),
        max_position_pct: config.get_double(
            "execution",
            "max_position_pct",
            DEFAULT_MAX_POSITION_PCT,
        ),
        min_trade_value: config.get_double(
            "execution",
            "min_trade_value",
            DEFAULT_MIN_TRADE_VALUE,
        ),
        min_cash_to_buy: config.get_double(
            "execution",
            "min_cash_to_buy",
            DEFAULT_MIN_CASH_TO_BUY,
        ),
        max_cash_fraction: config.get_double(
            "execution",
            "max_cash_fraction",
            DEFAULT_MAX_CASH_FRACTION,
        ),
    }
}

/// Expects a config that already passed validation; negative counts clamp
/// to zero.
pub fn build_simulation_config(config: &dyn ConfigPort) -> SimulationConfig {
    SimulationConfig {
        initial_capital: config.get_double("arena", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        warmup: config.get_int("arena", "warmup", DEFAULT_WARMUP as i64).max(0) as usize,
        min_candles: config
            .get_int("arena", "min_candles", DEFAULT_MIN_CANDLES as i64)
            .max(0) as usize,
        execution: build_execution_config(config),
    }
}

/// Named catalog with any `[catalog]` overrides applied.
pub fn build_catalog(config: &dyn ConfigPort) -> Result<Catalog, ArenaError> {
    let name = config
        .get_string("arena", "catalog")
        .unwrap_or_else(|| "crypto".to_string());
    let mut catalog = Catalog::by_name(&name)?;

    if let Some(raw) = config.get_string("catalog", "tokens") {
        let tokens = parse_tokens(&raw).map_err(|e| ArenaError::ConfigInvalid {
            section: "catalog".into(),
            key: "tokens".into(),
            reason: e.to_string(),
        })?;
        catalog = catalog.with_tokens(tokens);
    }
    if let Some(names) = config.get_list("catalog", "market_neutral") {
        catalog = catalog.with_market_neutral(names);
    }
    if let Some(names) = config.get_list("catalog", "trend_filtered") {
        catalog = catalog.with_trend_filtered(names);
    }
    Ok(catalog)
}

pub fn build_runner(config: &dyn ConfigPort) -> Result<ArenaRunner, ArenaError> {
    let catalog = build_catalog(config)?;
    let threads = config.get_int("arena", "threads", 0).max(0) as usize;
    Ok(ArenaRunner::new(catalog, build_simulation_config(config)).with_threads(threads))
}

/// `--data` wins over `[data] path`.
pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, ArenaError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    config
        .get_string("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| ArenaError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

pub fn open_data_port(path: &Path, format: &str) -> Result<Box<dyn DataPort>, ArenaError> {
    match format.trim().to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvAdapter::new(path.to_path_buf()))),
        "json" => Ok(Box::new(JsonAdapter::open(path.to_path_buf())?)),
        other => Err(ArenaError::ConfigInvalid {
            section: "data".into(),
            key: "format".into(),
            reason: format!("unsupported format '{other}'"),
        }),
    }
}

fn data_format(config: &dyn ConfigPort) -> String {
    config
        .get_string("data", "format")
        .unwrap_or_else(|| DEFAULT_DATA_FORMAT.to_string())
}

/// Load, simulate, aggregate and, when `output_dir` is set, write both
/// reports.
pub fn run_pipeline(
    config: &dyn ConfigPort,
    data_port: &dyn DataPort,
    agents_override: Option<u32>,
    output_dir: Option<&Path>,
    date: NaiveDate,
) -> Result<RunOutcome, ArenaError> {
    let runner = build_runner(config)?;
    let agents = match agents_override {
        Some(n) => n,
        None => config
            .get_int("arena", "agents", i64::from(DEFAULT_AGENT_COUNT))
            .clamp(0, i64::from(u32::MAX)) as u32,
    };

    let LoadedMarket { market, skipped } = load_market(
        data_port,
        &runner.catalog().tokens,
        runner.config().min_candles,
    )?;
    if !skipped.is_empty() {
        eprintln!("Skipped {} token(s) without usable data", skipped.len());
    }
    eprintln!(
        "Loaded {} token(s) from {}",
        market.len(),
        data_port.describe()
    );

    eprintln!("Running {agents} agents ({} catalog)...", runner.catalog().name);
    let results = runner.run(agents, &market);
    let aggregate = Aggregate::from_results(&results);
    let context = market.context();
    let meta = run_meta(date, &context, &results, &runner);

    let mut outcome = RunOutcome {
        meta,
        market: context,
        results,
        aggregate,
        reports: Vec::new(),
    };

    if let Some(dir) = output_dir {
        let top = config
            .get_int("report", "top", markdown_report_adapter::DEFAULT_TOP as i64)
            .max(0) as usize;
        let bottom = config
            .get_int("report", "bottom", markdown_report_adapter::DEFAULT_BOTTOM as i64)
            .max(0) as usize;
        let writers: [Box<dyn ReportPort>; 2] = [
            Box::new(MarkdownReportAdapter::new(top, bottom)),
            Box::new(JsonReportAdapter::default()),
        ];
        for writer in &writers {
            let path = writer.write(&outcome.report(), dir)?;
            info!(path = %path.display(), "report written");
            outcome.reports.push(path);
        }
    }
    Ok(outcome)
}

fn run_meta(
    date: NaiveDate,
    context: &[TokenContext],
    results: &[SimulationResult],
    runner: &ArenaRunner,
) -> RunMeta {
    let config = runner.config();
    RunMeta {
        date,
        start_date: context.iter().map(|c| c.start_date).min(),
        end_date: context.iter().map(|c| c.end_date).max(),
        total_agents: results.len(),
        initial_capital: config.initial_capital,
        catalog: runner.catalog().name.clone(),
        trade_fee: config.execution.trade_fee,
        slippage: config.execution.slippage,
        max_position_pct: config.execution.max_position_pct,
    }
}

fn run_arena(
    config_path: &Path,
    data_override: Option<&Path>,
    output_override: Option<&Path>,
    agents_override: Option<u32>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) =
        validate_arena_config(&config).and_then(|()| validate_execution_config(&config))
    {
        return fail(&e);
    }

    // Stage 2: Open the data source
    let data_port = match resolve_data_path(data_override, &config)
        .and_then(|path| open_data_port(&path, &data_format(&config)))
    {
        Ok(port) => port,
        Err(e) => return fail(&e),
    };

    let output_dir = output_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    // Stages 3-6: Load market, simulate, aggregate, report
    let today = chrono::Local::now().date_naive();
    match run_pipeline(
        &config,
        data_port.as_ref(),
        agents_override,
        Some(&output_dir),
        today,
    ) {
        Ok(outcome) => {
            print_summary(&outcome);
            for path in &outcome.reports {
                eprintln!("Report written to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn print_summary(outcome: &RunOutcome) {
    let s = &outcome.aggregate.summary;
    println!("\n=== ARENA RESULTS ===");
    println!("Agents:            {}", s.agents);
    println!("Total capital:     ${:.2}", s.total_capital);
    println!("Final value:       ${:.2}", s.total_final_value);
    println!("Net P&L:           ${:.2}", s.net_pnl);
    println!("Average return:    {:.2}%", s.avg_return_pct);
    println!("Median return:     {:.2}%", s.median_return_pct);
    println!(
        "Profitable:        {} / {} ({} unprofitable)",
        s.profitable, s.agents, s.unprofitable
    );
    println!("Avg win rate:      {:.1}%", s.avg_win_rate);
    println!("Avg max drawdown:  {:.1}%", s.avg_max_drawdown_pct);

    if let Some(best) = &s.best {
        println!(
            "Best agent:        {} #{} ({}) {:.2}%",
            best.name, best.id, best.strategy, best.return_pct
        );
    }
    if let Some(worst) = &s.worst {
        println!(
            "Worst agent:       {} #{} ({}) {:.2}%",
            worst.name, worst.id, worst.strategy, worst.return_pct
        );
    }

    println!("\nTop strategies:");
    for g in outcome.aggregate.by_strategy.iter().take(5) {
        println!(
            "  {:<24} {:>8.2}%  ({}/{} profitable)",
            g.key, g.avg_return_pct, g.profitable, g.count
        );
    }
}

fn print_profile(profile: &AgentProfile) {
    println!("Agent #{} {}", profile.id, profile.name);
    println!("  seed:       {}", profile.seed);
    println!(
        "  strategy:   {} ({}, {})",
        profile.primary_strategy, profile.category, profile.risk_tier
    );
    println!("  secondary:  {}", profile.secondary_strategy);
    println!("  horizon:    {}", profile.time_horizon);
    println!("  risk style: {}", profile.risk_style);
    println!("  aggression: {}", profile.aggression);
    println!("  tokens:     {}", profile.preferred_tokens.join(", "));
}

fn run_agent(id: u32, config_path: Option<&Path>, data_override: Option<&Path>) -> ExitCode {
    let config = match config_path.map(load_config).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };

    let runner = match &config {
        Some(c) => {
            if let Err(e) = validate_arena_config(c).and_then(|()| validate_execution_config(c)) {
                return fail(&e);
            }
            match build_runner(c) {
                Ok(r) => r,
                Err(e) => return fail(&e),
            }
        }
        None => ArenaRunner::new(Catalog::default(), SimulationConfig::default()),
    };

    let agent = create_agent(id, runner.catalog());
    print_profile(&agent.profile);

    let data_path = match (data_override, &config) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(c)) => c.get_string("data", "path").map(PathBuf::from),
        (None, None) => None,
    };
    let Some(data_path) = data_path else {
        return ExitCode::SUCCESS;
    };

    let format = config
        .as_ref()
        .map(|c| data_format(c))
        .unwrap_or_else(|| DEFAULT_DATA_FORMAT.to_string());
    let market = match open_data_port(&data_path, &format).and_then(|port| {
        load_market(
            port.as_ref(),
            &agent.profile.preferred_tokens,
            runner.config().min_candles,
        )
    }) {
        Ok(loaded) => loaded.market,
        Err(e) => return fail(&e),
    };

    let result = runner.run_agent(id, &market);
    println!("\nResult:");
    println!("  final value:  ${:.2}", result.final_value);
    println!("  return:       {:.2}%", result.return_pct);
    println!(
        "  trades:       {} ({} wins, {} losses)",
        result.trade_count, result.win_count, result.loss_count
    );
    println!("  win rate:     {:.2}%", result.win_rate);
    println!("  max drawdown: {:.2}%", result.max_drawdown_pct);
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_arena_config(&config).and_then(|()| validate_execution_config(&config))
    {
        return fail(&e);
    }
    let catalog = match build_catalog(&config) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let sim = build_simulation_config(&config);

    eprintln!("\nCatalog: {} ({} strategies)", catalog.name, catalog.len());
    eprintln!("  tokens:         {}", catalog.tokens.join(", "));
    eprintln!("  market-neutral: {}", catalog.market_neutral.len());
    eprintln!("  trend-filtered: {}", catalog.trend_filtered.len());
    eprintln!("\nSimulation:");
    eprintln!("  initial capital: {}", sim.initial_capital);
    eprintln!("  warmup:          {}", sim.warmup);
    eprintln!("  min candles:     {}", sim.min_candles);
    eprintln!(
        "  fee/slippage:    {} / {}",
        sim.execution.trade_fee, sim.execution.slippage
    );

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

/// Market context of every token the source lists.
pub fn market_info(data_port: &dyn DataPort) -> Result<Vec<TokenContext>, ArenaError> {
    let mut series = Vec::new();
    for token in data_port.list_tokens()? {
        let candles = data_port.fetch_candles(&token)?;
        series.push((token, candles));
    }
    let market = MarketData::new(series);
    if market.is_empty() {
        return Err(ArenaError::NoData {
            path: data_port.describe(),
        });
    }
    Ok(market.context())
}

fn run_info(data_path: &Path, format: &str) -> ExitCode {
    let context = match open_data_port(data_path, format).and_then(|port| market_info(port.as_ref()))
    {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    for ctx in &context {
        println!(
            "{}: {} candles, {} to {}, {:.4} -> {:.4} ({:+.2}%)",
            ctx.token,
            ctx.candles,
            ctx.start_date,
            ctx.end_date,
            ctx.first_close,
            ctx.last_close,
            ctx.period_return_pct
        );
    }
    ExitCode::SUCCESS
}
