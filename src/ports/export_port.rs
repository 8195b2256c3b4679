//! Artifact export port.

use crate::domain::error::FridayError;
use crate::domain::price::PriceTable;
use crate::domain::signal::SignalTable;

pub trait ExportPort {
    fn write_prices(&self, table: &PriceTable, name: &str) -> Result<(), FridayError>;

    fn write_signals(&self, signals: &SignalTable, name: &str) -> Result<(), FridayError>;
}
