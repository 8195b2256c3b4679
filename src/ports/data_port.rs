//! Historical price source port.

use crate::domain::error::FridayError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceSourcePort {
    /// Closing prices for `symbol` on sessions within `[start, end]`.
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FridayError>;

    fn list_symbols(&self) -> Result<Vec<String>, FridayError>;
}
