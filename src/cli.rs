//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::{CsvExporter, CsvPriceSource};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::rolling_indicator_adapter::RollingIndicatorAdapter;
use crate::adapters::weekday_calendar::WeekdayCalendar;
use crate::domain::config_validation::{
    read_history_window, read_holidays, read_optional_date, read_optional_u64, read_paths,
    read_universe, validate_run_config,
};
use crate::domain::error::FridayError;
use crate::domain::simulation::{
    historical_signals, simulate, synthesize, Horizon, PathOutcome, RunConfig, SignalSummary,
};
use crate::domain::universe::Role;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceSourcePort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(
    name = "friday",
    about = "Rotation signals and synthetic price paths for a leveraged ETF universe"
)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate rotation signals over historical data
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extend history with one synthetic price path
    Synthesize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Evaluate signals over several synthetic paths
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        paths: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Signals { config, output } => run_signals(&config, output.as_deref()),
        Command::Synthesize {
            config,
            output,
            seed,
        } => run_synthesize(&config, output.as_deref(), seed),
        Command::Simulate {
            config,
            output,
            paths,
            seed,
        } => run_simulate(&config, output.as_deref(), paths, seed),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FridayError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report(err: &FridayError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, FridayError> {
    let (roles, universe) = read_universe(adapter)?;
    let (history_start, history_end) = read_history_window(adapter)?;

    let horizon = match (
        read_optional_date(adapter, "synthesis", "horizon_end")?,
        read_optional_u64(adapter, "synthesis", "horizon_sessions")?,
    ) {
        (Some(_), Some(_)) => {
            return Err(FridayError::ConfigInvalid {
                section: "synthesis".into(),
                key: "horizon_sessions".into(),
                reason: "set either horizon_end or horizon_sessions, not both".into(),
            });
        }
        (Some(end), None) => Horizon::EndDate(end),
        (None, Some(n)) => Horizon::Sessions(n as usize),
        (None, None) => Horizon::Sessions(0),
    };

    Ok(RunConfig {
        universe,
        roles,
        history_start,
        history_end,
        sample_start: read_optional_date(adapter, "synthesis", "sample_start")?
            .unwrap_or(history_start),
        sample_end: read_optional_date(adapter, "synthesis", "sample_end")?
            .unwrap_or(history_end),
        horizon,
        paths: read_paths(adapter)?,
        seed: read_optional_u64(adapter, "synthesis", "seed")?,
    })
}

pub fn build_calendar(adapter: &dyn ConfigPort) -> Result<WeekdayCalendar, FridayError> {
    Ok(WeekdayCalendar::new(read_holidays(adapter)?))
}

pub fn build_price_source(adapter: &dyn ConfigPort) -> Result<CsvPriceSource, FridayError> {
    let dir = adapter
        .get_nonempty("data", "directory")
        .ok_or_else(|| FridayError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;
    Ok(CsvPriceSource::new(PathBuf::from(dir)))
}

/// `-o` wins over `[output] directory`.
pub fn resolve_output_dir(output: Option<&Path>, adapter: &dyn ConfigPort) -> Option<PathBuf> {
    output
        .map(Path::to_path_buf)
        .or_else(|| adapter.get_nonempty("output", "directory").map(PathBuf::from))
}

pub fn format_summary(summary: &SignalSummary) -> String {
    let mut out = format!(
        "sessions: {}\nrotations: {}\nfinal holding: {}\n",
        summary.sessions,
        summary.rotations,
        summary.final_holding.as_deref().unwrap_or("none")
    );
    for (symbol, held) in &summary.held_sessions {
        if *held > 0 {
            out.push_str(&format!("  {:<6} {:>6} sessions\n", symbol, held));
        }
    }
    out
}

pub fn format_outcome(outcome: &PathOutcome, broad: &str) -> String {
    let change = if outcome.broad_start != 0.0 {
        (outcome.broad_end / outcome.broad_start - 1.0) * 100.0
    } else {
        f64::NAN
    };
    format!(
        "path {:>3}: {} {:.2} -> {:.2} ({:+.2}%), {} rotations, holding {}",
        outcome.path,
        broad,
        outcome.broad_start,
        outcome.broad_end,
        change,
        outcome.run.summary.rotations,
        outcome.run.summary.final_holding.as_deref().unwrap_or("none")
    )
}

/// Load, validate, and build; every failure is already reported.
fn prepare(config_path: &Path) -> Result<(FileConfigAdapter, RunConfig), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_run_config(&adapter).map_err(|e| report(&e))?;
    let config = build_run_config(&adapter).map_err(|e| report(&e))?;
    Ok((adapter, config))
}

fn run_signals(config_path: &Path, output: Option<&Path>) -> ExitCode {
    let (adapter, config) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let source = match build_price_source(&adapter) {
        Ok(s) => s,
        Err(e) => return report(&e),
    };

    let signal_run = match historical_signals(&source, &RollingIndicatorAdapter, &config) {
        Ok(r) => r,
        Err(e) => return report(&e),
    };
    print!("{}", format_summary(&signal_run.summary));

    if let Some(dir) = resolve_output_dir(output, &adapter) {
        let exporter = CsvExporter::new(dir.clone());
        if let Err(e) = exporter
            .write_prices(&signal_run.prices, "prices")
            .and_then(|_| exporter.write_signals(&signal_run.signals, "signals"))
        {
            return report(&e);
        }
        info!(dir = %dir.display(), "wrote signal artifacts");
    }
    ExitCode::SUCCESS
}

fn run_synthesize(config_path: &Path, output: Option<&Path>, seed: Option<u64>) -> ExitCode {
    let (adapter, mut config) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    config.seed = seed.or(config.seed);

    let (source, calendar) = match build_price_source(&adapter)
        .and_then(|s| build_calendar(&adapter).map(|c| (s, c)))
    {
        Ok(p) => p,
        Err(e) => return report(&e),
    };

    let table = match synthesize(&source, &calendar, &config) {
        Ok(t) => t,
        Err(e) => return report(&e),
    };

    let broad = config.roles.symbol(Role::BroadMarket);
    if let (Some(first), Some(last)) = (table.dates().first(), table.dates().last()) {
        println!(
            "{} sessions {} .. {}, {} closes at {:.2}",
            table.len(),
            first,
            last,
            broad,
            table.close(broad, table.len() - 1).unwrap_or(f64::NAN)
        );
    }

    if let Some(dir) = resolve_output_dir(output, &adapter) {
        if let Err(e) = CsvExporter::new(dir.clone()).write_prices(&table, "synthetic_prices") {
            return report(&e);
        }
        info!(dir = %dir.display(), "wrote synthetic prices");
    }
    ExitCode::SUCCESS
}

fn run_simulate(
    config_path: &Path,
    output: Option<&Path>,
    paths: Option<usize>,
    seed: Option<u64>,
) -> ExitCode {
    let (adapter, mut config) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    config.seed = seed.or(config.seed);
    if let Some(n) = paths {
        if n == 0 {
            return report(&FridayError::ConfigInvalid {
                section: "synthesis".into(),
                key: "paths".into(),
                reason: "--paths must be at least 1".into(),
            });
        }
        config.paths = n;
    }

    let (source, calendar) = match build_price_source(&adapter)
        .and_then(|s| build_calendar(&adapter).map(|c| (s, c)))
    {
        Ok(p) => p,
        Err(e) => return report(&e),
    };

    let outcomes = match simulate(&source, &calendar, &RollingIndicatorAdapter, &config) {
        Ok(o) => o,
        Err(e) => return report(&e),
    };

    let broad = config.roles.symbol(Role::BroadMarket);
    for outcome in &outcomes {
        println!("{}", format_outcome(outcome, broad));
    }

    if let Some(dir) = resolve_output_dir(output, &adapter) {
        let exporter = CsvExporter::new(dir.clone());
        for outcome in &outcomes {
            let result = exporter
                .write_prices(&outcome.prices, &format!("path_{}_prices", outcome.path))
                .and_then(|_| {
                    exporter.write_signals(
                        &outcome.run.signals,
                        &format!("path_{}_signals", outcome.path),
                    )
                });
            if let Err(e) = result {
                return report(&e);
            }
        }
        info!(dir = %dir.display(), paths = outcomes.len(), "wrote simulation artifacts");
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let (adapter, config) = match prepare(config_path) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let calendar = match build_calendar(&adapter) {
        Ok(c) => c,
        Err(e) => return report(&e),
    };

    eprintln!("\nRoles:");
    for role in Role::ALL {
        eprintln!("  {:<20} {}", role.config_key(), config.roles.symbol(role));
    }
    eprintln!("Universe: {}", config.universe.join(","));
    eprintln!("History:  {} .. {}", config.history_start, config.history_end);
    eprintln!("Sampling: {} .. {}", config.sample_start, config.sample_end);
    match config.horizon {
        Horizon::EndDate(end) => eprintln!("Horizon:  through {}", end),
        Horizon::Sessions(n) => eprintln!("Horizon:  {} sessions", n),
    }
    eprintln!("Paths:    {}", config.paths);
    eprintln!("Holidays: {}", calendar.holidays().count());

    // data files are checked but not required for a valid config
    match build_price_source(&adapter).and_then(|s| s.list_symbols()) {
        Ok(available) => {
            for symbol in config.universe.iter().filter(|s| !available.contains(*s)) {
                warn!(%symbol, "no price file for configured symbol");
            }
        }
        Err(e) => warn!(error = %e, "could not list price files"),
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
