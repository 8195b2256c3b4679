//! Close-price series and date-aligned price tables.

use crate::domain::error::FridayError;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices for one symbol, strictly increasing by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, FridayError> {
        let symbol = symbol.into();
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(FridayError::Misaligned {
                    symbol,
                    reason: format!(
                        "dates must be strictly increasing ({} then {})",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }
        Ok(Self { symbol, points })
    }

    pub fn from_pairs(
        symbol: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self, FridayError> {
        let points = pairs
            .into_iter()
            .map(|(date, close)| PricePoint { date, close })
            .collect();
        Self::new(symbol, points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Close on `date`, found by binary search over the ordered dates.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].close)
    }

    /// Appends points that all lie strictly after the current last date.
    pub fn extend(&mut self, tail: Vec<PricePoint>) -> Result<(), FridayError> {
        let mut last = self.last().map(|p| p.date);
        for point in &tail {
            if let Some(prev) = last {
                if point.date <= prev {
                    return Err(FridayError::Misaligned {
                        symbol: self.symbol.clone(),
                        reason: format!("appended date {} does not follow {}", point.date, prev),
                    });
                }
            }
            last = Some(point.date);
        }
        self.points.extend(tail);
        Ok(())
    }
}

/// Close prices for a set of symbols sharing one session index.
///
/// Every column has exactly one value per index date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: HashMap<String, Vec<f64>>,
}

impl PriceTable {
    /// Builds a table from series that must share an identical date index.
    /// Column order follows the order of `series`.
    pub fn from_series(series: Vec<PriceSeries>) -> Result<Self, FridayError> {
        let Some(first) = series.first() else {
            return Ok(Self {
                dates: Vec::new(),
                symbols: Vec::new(),
                columns: HashMap::new(),
            });
        };
        let dates: Vec<NaiveDate> = first.dates().collect();

        let mut symbols = Vec::with_capacity(series.len());
        let mut columns = HashMap::with_capacity(series.len());
        for s in series {
            if columns.contains_key(&s.symbol) {
                return Err(FridayError::Misaligned {
                    symbol: s.symbol,
                    reason: "duplicate column".into(),
                });
            }
            if s.len() != dates.len() || !s.dates().eq(dates.iter().copied()) {
                return Err(FridayError::Misaligned {
                    reason: format!(
                        "index differs from {} ({} vs {} sessions)",
                        symbols.first().map(String::as_str).unwrap_or("first column"),
                        s.len(),
                        dates.len()
                    ),
                    symbol: s.symbol,
                });
            }
            symbols.push(s.symbol.clone());
            columns.insert(s.symbol.clone(), s.closes());
        }

        Ok(Self {
            dates,
            symbols,
            columns,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    pub fn close(&self, symbol: &str, index: usize) -> Option<f64> {
        self.columns.get(symbol).and_then(|c| c.get(index)).copied()
    }

    /// Reassembles one column as a standalone series.
    pub fn series(&self, symbol: &str) -> Option<PriceSeries> {
        let column = self.columns.get(symbol)?;
        let points = self
            .dates
            .iter()
            .zip(column)
            .map(|(&date, &close)| PricePoint { date, close })
            .collect();
        Some(PriceSeries {
            symbol: symbol.to_string(),
            points,
        })
    }

    /// The last `n` sessions (or the whole table if shorter).
    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        self.slice_from(start)
    }

    /// Sessions from `start` onwards.
    pub fn slice_from(&self, start: usize) -> Self {
        let start = start.min(self.len());
        Self {
            dates: self.dates[start..].to_vec(),
            symbols: self.symbols.clone(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), v[start..].to_vec()))
                .collect(),
        }
    }
}
