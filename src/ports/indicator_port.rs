//! Indicator computation port.

use crate::domain::error::FridayError;
use crate::domain::indicator::IndicatorTable;
use crate::domain::price::PriceTable;

/// Both methods return tables index-aligned to `table`.
pub trait IndicatorPort {
    fn moving_average(
        &self,
        table: &PriceTable,
        windows: &[usize],
    ) -> Result<IndicatorTable, FridayError>;

    fn oscillator(&self, table: &PriceTable, window: usize) -> Result<IndicatorTable, FridayError>;
}
