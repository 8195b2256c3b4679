//! friday: rule-based single-asset rotation signals and bootstrapped
//! synthetic price paths.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command dispatch in [`cli`].

pub mod cli;
pub mod domain;
pub mod ports;
pub mod adapters;
