#![allow(dead_code)]

use chrono::NaiveDate;
use friday::adapters::weekday_calendar::WeekdayCalendar;
use friday::domain::error::FridayError;
use friday::domain::indicator::{IndicatorKind, IndicatorTable};
use friday::domain::price::{PriceSeries, PriceTable};
use friday::domain::simulation::{Horizon, RunConfig};
use friday::domain::universe::{Role, RoleMap};
use friday::ports::calendar_port::CalendarPort;
use friday::ports::data_port::PriceSourcePort;
use std::collections::HashMap;

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<(NaiveDate, f64)>) -> Self {
        self.data.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceSourcePort for MockPriceSource {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FridayError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FridayError::DataSource {
                reason: reason.clone(),
            });
        }
        let closes = self.data.get(symbol).cloned().unwrap_or_default();
        PriceSeries::from_pairs(
            symbol,
            closes.into_iter().filter(|(d, _)| *d >= start && *d <= end),
        )
    }

    fn list_symbols(&self) -> Result<Vec<String>, FridayError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// `n` consecutive weekday sessions starting at (or after) `start`.
pub fn weekdays(start: &str, n: usize) -> Vec<NaiveDate> {
    let cal = WeekdayCalendar::default();
    let first = date(start);
    let mut sessions = Vec::with_capacity(n);
    if cal.is_session(first) {
        sessions.push(first);
    }
    let mut current = first;
    while sessions.len() < n {
        current = cal.nth_session_after(current, 1).unwrap();
        sessions.push(current);
    }
    sessions.truncate(n);
    sessions
}

/// Smooth, strictly positive closes with a mild drift.
pub fn wavy_closes(base: f64, phase: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            base * (1.0 + 0.03 * (t * 0.21 + phase).sin()) * (1.0 + 0.0004 * t)
        })
        .collect()
}

/// A mock source holding wavy history for every default role symbol.
pub fn default_universe_source(dates: &[NaiveDate]) -> MockPriceSource {
    let bases = [400.0, 40.0, 90.0, 12.0, 35.0, 78.0, 55.0];
    let mut source = MockPriceSource::new();
    for (i, role) in Role::ALL.iter().enumerate() {
        let closes = wavy_closes(bases[i], i as f64 * 0.9, dates.len());
        source = source.with_closes(
            role.default_symbol(),
            dates.iter().copied().zip(closes).collect(),
        );
    }
    source
}

pub fn run_config(dates: &[NaiveDate], horizon: Horizon, seed: u64) -> RunConfig {
    let roles = RoleMap::default();
    let first = dates[0];
    let last = dates[dates.len() - 1];
    RunConfig {
        universe: roles.symbols(),
        roles,
        history_start: first,
        history_end: last,
        sample_start: first,
        sample_end: last,
        horizon,
        paths: 1,
        seed: Some(seed),
    }
}

/// Hand-set prices and indicators for the default universe.
///
/// Every session starts "neutral": broad market below its long average,
/// nothing overbought or oversold, tech below its short average, and the
/// bond oscillator above inverse tech. The decision tree picks the short
/// bond role on a neutral session.
pub struct MarketBuilder {
    pub roles: RoleMap,
    pub dates: Vec<NaiveDate>,
    close: HashMap<Role, Vec<f64>>,
    long_ma: HashMap<Role, Vec<Option<f64>>>,
    short_ma: HashMap<Role, Vec<Option<f64>>>,
    rsi: HashMap<Role, Vec<Option<f64>>>,
}

impl MarketBuilder {
    pub fn new(n: usize) -> Self {
        let roles = RoleMap::default();
        let dates = weekdays("2022-08-01", n);
        let mut b = Self {
            roles,
            dates,
            close: HashMap::new(),
            long_ma: HashMap::new(),
            short_ma: HashMap::new(),
            rsi: HashMap::new(),
        };
        for role in Role::ALL {
            b.close.insert(role, vec![50.0; n]);
            b.long_ma.insert(role, vec![Some(50.0); n]);
            b.short_ma.insert(role, vec![Some(50.0); n]);
            b.rsi.insert(role, vec![Some(50.0); n]);
        }
        for i in 0..n {
            b = b.neutral(i);
        }
        b
    }

    pub fn neutral(mut self, i: usize) -> Self {
        self.close.get_mut(&Role::BroadMarket).unwrap()[i] = 90.0;
        self.long_ma.get_mut(&Role::BroadMarket).unwrap()[i] = Some(100.0);
        self.close.get_mut(&Role::LeveragedTech).unwrap()[i] = 20.0;
        self.short_ma.get_mut(&Role::LeveragedTech).unwrap()[i] = Some(25.0);
        for role in Role::ALL {
            self.rsi.get_mut(&role).unwrap()[i] = Some(50.0);
        }
        self.rsi.get_mut(&Role::InverseTech).unwrap()[i] = Some(40.0);
        self.rsi.get_mut(&Role::ShortBond).unwrap()[i] = Some(45.0);
        self
    }

    /// Broad market above its long average.
    pub fn bull(mut self, i: usize) -> Self {
        self.close.get_mut(&Role::BroadMarket).unwrap()[i] = 110.0;
        self
    }

    pub fn rsi(mut self, role: Role, i: usize, value: f64) -> Self {
        self.rsi.get_mut(&role).unwrap()[i] = Some(value);
        self
    }

    pub fn missing_rsi(mut self, role: Role, i: usize) -> Self {
        self.rsi.get_mut(&role).unwrap()[i] = None;
        self
    }

    pub fn missing_long_ma(mut self, role: Role, i: usize) -> Self {
        self.long_ma.get_mut(&role).unwrap()[i] = None;
        self
    }

    pub fn tech_above_short_ma(mut self, i: usize) -> Self {
        self.close.get_mut(&Role::LeveragedTech).unwrap()[i] = 30.0;
        self
    }

    pub fn universe(&self) -> Vec<String> {
        self.roles.symbols()
    }

    pub fn build(&self) -> (PriceTable, IndicatorTable, IndicatorTable) {
        let series = Role::ALL
            .iter()
            .map(|role| {
                PriceSeries::from_pairs(
                    self.roles.symbol(*role),
                    self.dates.iter().copied().zip(self.close[role].iter().copied()),
                )
                .unwrap()
            })
            .collect();
        let prices = PriceTable::from_series(series).unwrap();

        let mut ma = IndicatorTable::new(self.dates.clone());
        let mut rsi = IndicatorTable::new(self.dates.clone());
        for role in Role::ALL {
            let symbol = self.roles.symbol(role);
            ma.insert_column(IndicatorKind::MovingAverage(200), symbol, self.long_ma[&role].clone())
                .unwrap();
            ma.insert_column(IndicatorKind::MovingAverage(20), symbol, self.short_ma[&role].clone())
                .unwrap();
            rsi.insert_column(IndicatorKind::Oscillator(10), symbol, self.rsi[&role].clone())
                .unwrap();
        }
        (prices, ma, rsi)
    }
}
