//! Indicator identities and index-aligned indicator tables.
//!
//! - `IndicatorKind`: indicator identity + window (serves as HashMap key)
//! - `IndicatorTable`: per-kind, per-symbol value columns sharing the index of
//!   the price table they were derived from. Warm-up cells are `None`.

pub mod rsi;
pub mod sma;

use crate::domain::error::FridayError;
use crate::domain::price::PriceTable;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    MovingAverage(usize),
    Oscillator(usize),
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::MovingAverage(window) => write!(f, "MA({})", window),
            IndicatorKind::Oscillator(window) => write!(f, "RSI({})", window),
        }
    }
}

type Column = Vec<Option<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    dates: Vec<NaiveDate>,
    frames: HashMap<IndicatorKind, HashMap<String, Column>>,
}

impl IndicatorTable {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            frames: HashMap::new(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn insert_column(
        &mut self,
        kind: IndicatorKind,
        symbol: impl Into<String>,
        values: Column,
    ) -> Result<(), FridayError> {
        let symbol = symbol.into();
        if values.len() != self.dates.len() {
            return Err(FridayError::Misaligned {
                reason: format!(
                    "{} column has {} values for {} sessions",
                    kind,
                    values.len(),
                    self.dates.len()
                ),
                symbol,
            });
        }
        self.frames.entry(kind).or_default().insert(symbol, values);
        Ok(())
    }

    pub fn column(&self, kind: IndicatorKind, symbol: &str) -> Option<&[Option<f64>]> {
        self.frames
            .get(&kind)
            .and_then(|frame| frame.get(symbol))
            .map(Vec::as_slice)
    }

    pub fn value(&self, kind: IndicatorKind, symbol: &str, index: usize) -> Option<f64> {
        self.column(kind, symbol)
            .and_then(|c| c.get(index).copied().flatten())
            .filter(|v| v.is_finite())
    }

    /// Like [`value`](Self::value), but an absent cell is an error naming the session.
    pub fn require(
        &self,
        kind: IndicatorKind,
        symbol: &str,
        index: usize,
    ) -> Result<f64, FridayError> {
        self.value(kind, symbol, index).ok_or_else(|| {
            let date = self
                .dates
                .get(index)
                .copied()
                .unwrap_or(NaiveDate::MIN);
            FridayError::MissingIndicatorValue {
                indicator: kind.to_string(),
                symbol: symbol.to_string(),
                date,
            }
        })
    }

    /// Whether this table's index is exactly the price table's index.
    pub fn is_aligned_with(&self, prices: &PriceTable) -> bool {
        self.dates == prices.dates()
    }

    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        self.slice_from(start)
    }

    pub fn slice_from(&self, start: usize) -> Self {
        let start = start.min(self.len());
        Self {
            dates: self.dates[start..].to_vec(),
            frames: self
                .frames
                .iter()
                .map(|(kind, frame)| {
                    let sliced = frame
                        .iter()
                        .map(|(symbol, column)| (symbol.clone(), column[start..].to_vec()))
                        .collect();
                    (*kind, sliced)
                })
                .collect(),
        }
    }
}
