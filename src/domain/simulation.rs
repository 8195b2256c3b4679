//! Run orchestration: load history, project synthetic paths, evaluate signals.

use crate::domain::decision::{LONG_MA_WINDOW, OSCILLATOR_WINDOW, SHORT_MA_WINDOW};
use crate::domain::error::FridayError;
use crate::domain::indicator::IndicatorTable;
use crate::domain::price::PriceTable;
use crate::domain::signal::SignalTable;
use crate::domain::state_machine::{evaluate_detailed, Evaluation};
use crate::domain::synthesizer::SyntheticPathGenerator;
use crate::domain::universe::{Role, RoleMap};
use crate::ports::calendar_port::CalendarPort;
use crate::ports::data_port::PriceSourcePort;
use crate::ports::indicator_port::IndicatorPort;
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    EndDate(NaiveDate),
    /// Number of sessions after the last historical session.
    Sessions(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub universe: Vec<String>,
    pub roles: RoleMap,
    pub history_start: NaiveDate,
    pub history_end: NaiveDate,
    pub sample_start: NaiveDate,
    pub sample_end: NaiveDate,
    pub horizon: Horizon,
    pub paths: usize,
    pub seed: Option<u64>,
}

/// Per-run digest of an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSummary {
    pub sessions: usize,
    pub rotations: usize,
    /// `(symbol, sessions held)` in universe order.
    pub held_sessions: Vec<(String, usize)>,
    pub final_holding: Option<String>,
}

impl SignalSummary {
    pub fn from_evaluation(evaluation: &Evaluation, roles: &RoleMap) -> Self {
        let held_sessions = evaluation
            .signals
            .symbols()
            .iter()
            .map(|symbol| {
                let held = evaluation
                    .decisions
                    .iter()
                    .filter(|d| d.state.held.is_some_and(|r| roles.symbol(r) == symbol.as_str()))
                    .count();
                (symbol.clone(), held)
            })
            .collect();

        Self {
            sessions: evaluation.decisions.len(),
            rotations: evaluation.decisions.iter().filter(|d| d.rotated).count(),
            held_sessions,
            final_holding: evaluation
                .final_state
                .held
                .map(|r| roles.symbol(r).to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalRun {
    pub prices: PriceTable,
    pub signals: SignalTable,
    pub summary: SignalSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathOutcome {
    pub path: usize,
    /// History plus the synthetic sessions.
    pub prices: PriceTable,
    pub run: SignalRun,
    pub broad_start: f64,
    pub broad_end: f64,
}

pub fn load_history(
    source: &dyn PriceSourcePort,
    config: &RunConfig,
) -> Result<PriceTable, FridayError> {
    let mut series = Vec::with_capacity(config.universe.len());
    for symbol in &config.universe {
        let s = source.fetch_closes(symbol, config.history_start, config.history_end)?;
        if s.is_empty() {
            return Err(FridayError::NoData {
                symbol: symbol.clone(),
            });
        }
        series.push(s);
    }
    let table = PriceTable::from_series(series)?;
    info!(
        symbols = table.symbols().len(),
        sessions = table.len(),
        "loaded history"
    );
    Ok(table)
}

/// Moving averages (short and long windows) and the oscillator, all on `prices`' index.
pub fn compute_indicators(
    indicators: &dyn IndicatorPort,
    prices: &PriceTable,
) -> Result<(IndicatorTable, IndicatorTable), FridayError> {
    let ma = indicators.moving_average(prices, &[SHORT_MA_WINDOW, LONG_MA_WINDOW])?;
    let rsi = indicators.oscillator(prices, OSCILLATOR_WINDOW)?;
    Ok((ma, rsi))
}

/// Evaluates the last `sessions` rows of a full table whose indicators were
/// computed over the whole history.
pub fn evaluate_tail(
    indicators: &dyn IndicatorPort,
    prices: &PriceTable,
    sessions: usize,
    config: &RunConfig,
) -> Result<SignalRun, FridayError> {
    let (ma, rsi) = compute_indicators(indicators, prices)?;
    let window = prices.tail(sessions);
    let evaluation = evaluate_detailed(
        &config.universe,
        &config.roles,
        &window,
        &ma.tail(sessions),
        &rsi.tail(sessions),
    )?;
    let summary = SignalSummary::from_evaluation(&evaluation, &config.roles);
    Ok(SignalRun {
        prices: window,
        signals: evaluation.signals,
        summary,
    })
}

/// Signals over real history, after dropping the long moving-average warm-up.
pub fn historical_signals(
    source: &dyn PriceSourcePort,
    indicators: &dyn IndicatorPort,
    config: &RunConfig,
) -> Result<SignalRun, FridayError> {
    let history = load_history(source, config)?;
    if history.len() <= LONG_MA_WINDOW {
        return Err(FridayError::InsufficientHistory {
            symbol: config.roles.symbol(Role::BroadMarket).to_string(),
            available: history.len(),
            required: LONG_MA_WINDOW + 1,
        });
    }
    evaluate_tail(indicators, &history, history.len() - LONG_MA_WINDOW, config)
}

pub fn resolve_horizon_end(
    calendar: &dyn CalendarPort,
    last_known: NaiveDate,
    horizon: Horizon,
) -> Result<NaiveDate, FridayError> {
    match horizon {
        Horizon::EndDate(date) => Ok(date),
        Horizon::Sessions(0) => Ok(last_known),
        Horizon::Sessions(n) => calendar.nth_session_after(last_known, n),
    }
}

/// A single synthetic price table: history plus projected sessions.
pub fn synthesize(
    source: &dyn PriceSourcePort,
    calendar: &dyn CalendarPort,
    config: &RunConfig,
) -> Result<PriceTable, FridayError> {
    let history = load_history(source, config)?;
    let mut generator = SyntheticPathGenerator::from_seed_option(calendar, config.seed);
    project_history(&mut generator, calendar, &history, config)
}

fn project_history(
    generator: &mut SyntheticPathGenerator<'_>,
    calendar: &dyn CalendarPort,
    history: &PriceTable,
    config: &RunConfig,
) -> Result<PriceTable, FridayError> {
    let last = history
        .dates()
        .last()
        .copied()
        .ok_or_else(|| FridayError::NoData {
            symbol: config.universe.join(","),
        })?;
    let horizon_end = resolve_horizon_end(calendar, last, config.horizon)?;
    generator.generate_table(history, config.sample_start, config.sample_end, horizon_end)
}

/// Runs `config.paths` independent synthetic paths and evaluates the
/// projected sessions of each.
pub fn simulate(
    source: &dyn PriceSourcePort,
    calendar: &dyn CalendarPort,
    indicators: &dyn IndicatorPort,
    config: &RunConfig,
) -> Result<Vec<PathOutcome>, FridayError> {
    let history = load_history(source, config)?;
    let broad = config.roles.symbol(Role::BroadMarket);
    let mut generator = SyntheticPathGenerator::from_seed_option(calendar, config.seed);
    let mut outcomes = Vec::with_capacity(config.paths);

    for path in 0..config.paths {
        let prices = project_history(&mut generator, calendar, &history, config)?;
        let projected = prices.len() - history.len();
        if projected == 0 {
            warn!(path, "horizon adds no sessions; evaluating nothing");
        }
        let run = evaluate_tail(indicators, &prices, projected, config)?;

        let column = prices.column(broad).ok_or_else(|| FridayError::UnknownSymbol {
            symbol: broad.to_string(),
        })?;
        let broad_start = history.close(broad, history.len() - 1).unwrap_or(f64::NAN);
        let broad_end = column.last().copied().unwrap_or(f64::NAN);

        info!(
            path,
            rotations = run.summary.rotations,
            broad_start,
            broad_end,
            "path complete"
        );
        outcomes.push(PathOutcome {
            path,
            prices,
            run,
            broad_start,
            broad_end,
        });
    }

    Ok(outcomes)
}
