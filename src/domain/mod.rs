//! Core domain types and logic.

pub mod price;
pub mod universe;
pub mod indicator;
pub mod signal;
pub mod decision;
pub mod state_machine;
pub mod synthesizer;
pub mod simulation;
pub mod config_validation;
pub mod error;
