//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod rolling_indicator_adapter;
pub mod weekday_calendar;
