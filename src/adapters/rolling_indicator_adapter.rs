//! Rolling-window indicators computed in-process over price table columns.

use crate::domain::error::FridayError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorKind, IndicatorTable};
use crate::domain::price::PriceTable;
use crate::ports::indicator_port::IndicatorPort;

/// Simple moving averages and Wilder RSI, one column per symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingIndicatorAdapter;

impl RollingIndicatorAdapter {
    fn fill(
        table: &PriceTable,
        kind: IndicatorKind,
        out: &mut IndicatorTable,
        compute: impl Fn(&[f64]) -> Vec<Option<f64>>,
    ) -> Result<(), FridayError> {
        for symbol in table.symbols() {
            let closes = table
                .column(symbol)
                .ok_or_else(|| FridayError::UnknownSymbol {
                    symbol: symbol.clone(),
                })?;
            out.insert_column(kind, symbol.clone(), compute(closes))?;
        }
        Ok(())
    }
}

impl IndicatorPort for RollingIndicatorAdapter {
    fn moving_average(
        &self,
        table: &PriceTable,
        windows: &[usize],
    ) -> Result<IndicatorTable, FridayError> {
        let mut out = IndicatorTable::new(table.dates().to_vec());
        for &window in windows {
            Self::fill(table, IndicatorKind::MovingAverage(window), &mut out, |c| {
                calculate_sma(c, window)
            })?;
        }
        Ok(out)
    }

    fn oscillator(&self, table: &PriceTable, window: usize) -> Result<IndicatorTable, FridayError> {
        let mut out = IndicatorTable::new(table.dates().to_vec());
        Self::fill(table, IndicatorKind::Oscillator(window), &mut out, |c| {
            calculate_rsi(c, window)
        })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceSeries;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn table() -> PriceTable {
        let dates: Vec<NaiveDate> = (1..=5)
            .map(|day| NaiveDate::from_ymd_opt(2022, 8, day).unwrap())
            .collect();
        let spy = PriceSeries::from_pairs(
            "SPY",
            dates.iter().copied().zip([1.0, 2.0, 3.0, 4.0, 5.0]),
        )
        .unwrap();
        let bsv = PriceSeries::from_pairs(
            "BSV",
            dates.iter().copied().zip([5.0, 4.0, 3.0, 2.0, 1.0]),
        )
        .unwrap();
        PriceTable::from_series(vec![spy, bsv]).unwrap()
    }

    #[test]
    fn moving_average_fills_each_window_and_symbol() {
        let t = table();
        let ma = RollingIndicatorAdapter.moving_average(&t, &[2, 3]).unwrap();

        assert!(ma.is_aligned_with(&t));
        assert_eq!(ma.value(IndicatorKind::MovingAverage(2), "SPY", 0), None);
        assert_relative_eq!(
            ma.value(IndicatorKind::MovingAverage(2), "SPY", 1).unwrap(),
            1.5
        );
        assert_relative_eq!(
            ma.value(IndicatorKind::MovingAverage(3), "BSV", 4).unwrap(),
            2.0
        );
    }

    #[test]
    fn oscillator_saturates_on_monotonic_series() {
        let t = table();
        let rsi = RollingIndicatorAdapter.oscillator(&t, 2).unwrap();

        assert_eq!(rsi.value(IndicatorKind::Oscillator(2), "SPY", 1), None);
        assert_relative_eq!(rsi.value(IndicatorKind::Oscillator(2), "SPY", 4).unwrap(), 100.0);
        assert_relative_eq!(rsi.value(IndicatorKind::Oscillator(2), "BSV", 4).unwrap(), 0.0);
    }

    #[test]
    fn window_longer_than_series_is_all_missing() {
        let t = table();
        let ma = RollingIndicatorAdapter.moving_average(&t, &[200]).unwrap();
        let column = ma.column(IndicatorKind::MovingAverage(200), "SPY").unwrap();
        assert!(column.iter().all(Option::is_none));
    }
}
