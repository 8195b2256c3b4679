//! The fixed rotation universe: seven strategic roles and the symbols that fill them.

use crate::domain::error::FridayError;
use std::collections::HashSet;
use std::fmt;

/// A strategic slot in the rotation. The decision tree only speaks in roles;
/// a [`RoleMap`] binds each role to a tradable symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    BroadMarket,
    LeveragedTech,
    LeveragedBroad,
    VolatilityLong,
    InverseTech,
    ShortBond,
    LeveragedTechAlt,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::BroadMarket,
        Role::LeveragedTech,
        Role::LeveragedBroad,
        Role::VolatilityLong,
        Role::InverseTech,
        Role::ShortBond,
        Role::LeveragedTechAlt,
    ];

    /// Config key under `[assets]`.
    pub fn config_key(self) -> &'static str {
        match self {
            Role::BroadMarket => "broad_market",
            Role::LeveragedTech => "leveraged_tech",
            Role::LeveragedBroad => "leveraged_broad",
            Role::VolatilityLong => "volatility_long",
            Role::InverseTech => "inverse_tech",
            Role::ShortBond => "short_bond",
            Role::LeveragedTechAlt => "leveraged_tech_alt",
        }
    }

    pub fn default_symbol(self) -> &'static str {
        match self {
            Role::BroadMarket => "SPY",
            Role::LeveragedTech => "TQQQ",
            Role::LeveragedBroad => "SPXL",
            Role::VolatilityLong => "UVXY",
            Role::InverseTech => "SQQQ",
            Role::ShortBond => "BSV",
            Role::LeveragedTechAlt => "TECL",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Role → symbol binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    symbols: [String; 7],
}

impl Default for RoleMap {
    fn default() -> Self {
        Self {
            symbols: Role::ALL.map(|r| r.default_symbol().to_string()),
        }
    }
}

impl RoleMap {
    pub fn symbol(&self, role: Role) -> &str {
        &self.symbols[role as usize]
    }

    pub fn with(mut self, role: Role, symbol: impl Into<String>) -> Self {
        self.symbols[role as usize] = symbol.into().trim().to_uppercase();
        self
    }

    /// Role symbols in role order, which is also the default universe order.
    pub fn symbols(&self) -> Vec<String> {
        self.symbols.to_vec()
    }

    /// Checks that every role is filled by a distinct symbol present in `universe`.
    pub fn validate_against(&self, universe: &[String]) -> Result<(), FridayError> {
        let mut seen = HashSet::new();
        for role in Role::ALL {
            let symbol = self.symbol(role);
            if !universe.iter().any(|s| s == symbol) {
                return Err(FridayError::UnknownSymbol {
                    symbol: symbol.to_string(),
                });
            }
            if !seen.insert(symbol) {
                return Err(FridayError::ConfigInvalid {
                    section: "assets".into(),
                    key: role.config_key().into(),
                    reason: format!("{symbol} already fills another role"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
