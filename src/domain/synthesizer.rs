//! Synthetic price paths bootstrapped from historical day-over-day changes.
//!
//! A [`ShockSchedule`] is a set of consecutive historical session pairs drawn
//! without replacement. Each pair yields one percent change, and the changes
//! are compounded along a single path starting from the last historical close.

use crate::domain::error::FridayError;
use crate::domain::price::{PricePoint, PriceSeries, PriceTable};
use crate::ports::calendar_port::CalendarPort;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

/// Sampled `(previous session, session)` pairs, in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShockSchedule {
    pairs: Vec<(NaiveDate, NaiveDate)>,
}

impl ShockSchedule {
    pub fn from_pairs(pairs: Vec<(NaiveDate, NaiveDate)>) -> Self {
        Self { pairs }
    }

    /// Draws `count` distinct pairs from `sessions`.
    ///
    /// The pair ending on session `i` is a candidate for `1 <= i < n - 1` when
    /// both of its days appear in `priced` (sorted ascending). A full window of
    /// `n` sessions supports at most `n - 2` shocks.
    pub fn draw<R: Rng + ?Sized>(
        sessions: &[NaiveDate],
        priced: &[NaiveDate],
        count: usize,
        rng: &mut R,
        label: &str,
    ) -> Result<Self, FridayError> {
        let has_price = |date: &NaiveDate| priced.binary_search(date).is_ok();
        let candidates: Vec<(NaiveDate, NaiveDate)> = sessions
            .windows(2)
            .take(sessions.len().saturating_sub(2))
            .filter(|w| has_price(&w[0]) && has_price(&w[1]))
            .map(|w| (w[0], w[1]))
            .collect();
        if count > candidates.len() {
            return Err(FridayError::InsufficientHistory {
                symbol: label.to_string(),
                available: candidates.len(),
                required: count,
            });
        }

        let pairs = rand::seq::index::sample(rng, candidates.len(), count)
            .into_iter()
            .map(|k| candidates[k])
            .collect();
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(NaiveDate, NaiveDate)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent change of each pair, read from `history`.
    pub fn shocks(&self, history: &PriceSeries) -> Result<Vec<f64>, FridayError> {
        let close = |date: NaiveDate| {
            history
                .close_on(date)
                .ok_or_else(|| FridayError::MissingPrice {
                    symbol: history.symbol.clone(),
                    date,
                })
        };
        self.pairs
            .iter()
            .map(|&(prev, cur)| Ok(close(cur)? / close(prev)? - 1.0))
            .collect()
    }
}

/// Extends `history` over `future` by compounding the schedule's shocks.
///
/// The first future close applies the first shock to the last historical
/// close; each later close applies the next shock to the previous synthetic
/// close.
pub fn project(
    history: &PriceSeries,
    schedule: &ShockSchedule,
    future: &[NaiveDate],
) -> Result<PriceSeries, FridayError> {
    if future.is_empty() {
        return Ok(history.clone());
    }
    if schedule.len() < future.len() {
        return Err(FridayError::InsufficientHistory {
            symbol: history.symbol.clone(),
            available: schedule.len(),
            required: future.len(),
        });
    }
    let anchor = history.last().ok_or_else(|| FridayError::NoData {
        symbol: history.symbol.clone(),
    })?;

    let shocks = schedule.shocks(history)?;
    let mut price = anchor.close;
    let tail = future
        .iter()
        .zip(shocks)
        .map(|(&date, shock)| {
            price *= 1.0 + shock;
            PricePoint { date, close: price }
        })
        .collect();

    let mut projected = history.clone();
    projected.extend(tail)?;
    Ok(projected)
}

/// Draws shock schedules against a trading calendar.
///
/// Unseeded generators draw from OS entropy; [`with_seed`](Self::with_seed)
/// pins the sequence.
pub struct SyntheticPathGenerator<'a> {
    calendar: &'a dyn CalendarPort,
    rng: StdRng,
}

impl<'a> SyntheticPathGenerator<'a> {
    pub fn new(calendar: &'a dyn CalendarPort) -> Self {
        Self {
            calendar,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(calendar: &'a dyn CalendarPort, seed: u64) -> Self {
        Self {
            calendar,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(calendar: &'a dyn CalendarPort, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(calendar, seed),
            None => Self::new(calendar),
        }
    }

    /// Sessions after both the sampling window and the data, through `horizon_end`.
    pub fn future_sessions(
        &self,
        sample_end: NaiveDate,
        last_known: NaiveDate,
        horizon_end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, FridayError> {
        let after = sample_end.max(last_known);
        if horizon_end <= after {
            return Ok(Vec::new());
        }
        let first = after.succ_opt().ok_or_else(|| FridayError::CalendarLookup {
            date: after,
            reason: "date out of range".into(),
        })?;
        self.calendar.sessions(first, horizon_end)
    }

    /// Draws from `[sample_start, sample_end]`, skipping session pairs with no
    /// close in `priced` on either day.
    pub fn draw_schedule(
        &mut self,
        sample_start: NaiveDate,
        sample_end: NaiveDate,
        priced: &[NaiveDate],
        count: usize,
        label: &str,
    ) -> Result<ShockSchedule, FridayError> {
        self.calendar.require_session(sample_end)?;
        if priced.last().is_none_or(|&last| last < sample_end) {
            return Err(FridayError::MissingPrice {
                symbol: label.to_string(),
                date: sample_end,
            });
        }
        let sessions = self.calendar.sessions(sample_start, sample_end)?;
        let schedule = ShockSchedule::draw(&sessions, priced, count, &mut self.rng, label)?;
        debug!(
            label,
            window = sessions.len(),
            shocks = schedule.len(),
            "drew shock schedule"
        );
        Ok(schedule)
    }

    /// One symbol: history plus a synthetic continuation through `horizon_end`.
    pub fn generate(
        &mut self,
        historical: &PriceSeries,
        history_start: NaiveDate,
        history_end: NaiveDate,
        horizon_end: NaiveDate,
    ) -> Result<PriceSeries, FridayError> {
        let last = historical.last().ok_or_else(|| FridayError::NoData {
            symbol: historical.symbol.clone(),
        })?;
        let future = self.future_sessions(history_end, last.date, horizon_end)?;
        if future.is_empty() {
            return Ok(historical.clone());
        }

        let priced: Vec<NaiveDate> = historical.dates().collect();
        let schedule = self.draw_schedule(
            history_start,
            history_end,
            &priced,
            future.len(),
            &historical.symbol,
        )?;
        let projected = project(historical, &schedule, &future)?;
        info!(
            symbol = %historical.symbol,
            future_sessions = future.len(),
            "generated synthetic path"
        );
        Ok(projected)
    }

    /// Every column of `table`, all projected with ONE shared schedule so the
    /// synthetic symbols move on the same historical days.
    pub fn generate_table(
        &mut self,
        table: &PriceTable,
        sample_start: NaiveDate,
        sample_end: NaiveDate,
        horizon_end: NaiveDate,
    ) -> Result<PriceTable, FridayError> {
        let Some(&last) = table.dates().last() else {
            return Err(FridayError::NoData {
                symbol: table.symbols().join(","),
            });
        };
        let future = self.future_sessions(sample_end, last, horizon_end)?;
        if future.is_empty() {
            return Ok(table.clone());
        }

        let label = table.symbols().join(",");
        let schedule =
            self.draw_schedule(sample_start, sample_end, table.dates(), future.len(), &label)?;
        let series = table
            .symbols()
            .par_iter()
            .map(|symbol| {
                let history = table.series(symbol).ok_or_else(|| FridayError::UnknownSymbol {
                    symbol: symbol.clone(),
                })?;
                project(&history, &schedule, &future)
            })
            .collect::<Result<Vec<_>, FridayError>>()?;

        info!(
            symbols = series.len(),
            future_sessions = future.len(),
            from = %future[0],
            to = %future[future.len() - 1],
            "generated synthetic table"
        );
        PriceTable::from_series(series)
    }
}
