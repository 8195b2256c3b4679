//! Port traits for every external collaborator.

pub mod calendar_port;
pub mod config_port;
pub mod data_port;
pub mod export_port;
pub mod indicator_port;
