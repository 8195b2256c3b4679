//! Entry/exit signal grids.
//!
//! While the state machine runs, every cell carries a [`SignalMark`]. Only at
//! the public boundary are marks collapsed into the boolean [`SignalTable`].

use chrono::NaiveDate;

/// Per-cell marker used during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalMark {
    #[default]
    NoSignal,
    /// The signal fires (an entry is taken / an exit is taken).
    Fire,
    /// A candidate signal was withdrawn on this session.
    Cancel,
}

impl SignalMark {
    pub fn fires(self) -> bool {
        matches!(self, SignalMark::Fire)
    }
}

/// Working grid of marks; column `c` belongs to `symbols[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalGrid {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    entries: Vec<Vec<SignalMark>>,
    exits: Vec<Vec<SignalMark>>,
}

impl SignalGrid {
    pub fn new(dates: Vec<NaiveDate>, symbols: Vec<String>) -> Self {
        let blank = vec![SignalMark::NoSignal; dates.len()];
        Self {
            entries: vec![blank.clone(); symbols.len()],
            exits: vec![blank; symbols.len()],
            dates,
            symbols,
        }
    }

    pub fn column_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    #[cfg(test)]
    fn entry(&self, column: usize, index: usize) -> SignalMark {
        self.entries[column][index]
    }

    #[cfg(test)]
    fn exit(&self, column: usize, index: usize) -> SignalMark {
        self.exits[column][index]
    }

    pub fn set_entry(&mut self, column: usize, index: usize, mark: SignalMark) {
        self.entries[column][index] = mark;
    }

    pub fn set_exit(&mut self, column: usize, index: usize, mark: SignalMark) {
        self.exits[column][index] = mark;
    }

    /// Collapses marks to booleans: `Fire` → true, `Cancel`/`NoSignal` → false.
    pub fn into_table(self) -> SignalTable {
        let collapse = |grid: Vec<Vec<SignalMark>>| -> Vec<Vec<bool>> {
            grid.into_iter()
                .map(|col| col.into_iter().map(SignalMark::fires).collect())
                .collect()
        };
        SignalTable {
            entries: collapse(self.entries),
            exits: collapse(self.exits),
            dates: self.dates,
            symbols: self.symbols,
        }
    }
}

/// Boolean entry/exit flags sharing the price table's index and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    entries: Vec<Vec<bool>>,
    exits: Vec<Vec<bool>>,
}

impl SignalTable {
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

    pub fn entries(&self, symbol: &str) -> Option<&[bool]> {
        let c = self.symbols.iter().position(|s| s == symbol)?;
        Some(&self.entries[c])
    }

    pub fn exits(&self, symbol: &str) -> Option<&[bool]> {
        let c = self.symbols.iter().position(|s| s == symbol)?;
        Some(&self.exits[c])
    }

    pub fn entry(&self, symbol: &str, index: usize) -> bool {
        self.entries(symbol)
            .and_then(|col| col.get(index).copied())
            .unwrap_or(false)
    }

    pub fn exit(&self, symbol: &str, index: usize) -> bool {
        self.exits(symbol)
            .and_then(|col| col.get(index).copied())
            .unwrap_or(false)
    }

    /// Symbols with an entry flag on session `index`.
    pub fn entered_on(&self, index: usize) -> Vec<&str> {
        self.flagged_on(&self.entries, index)
    }

    /// Symbols with an exit flag on session `index`.
    pub fn exited_on(&self, index: usize) -> Vec<&str> {
        self.flagged_on(&self.exits, index)
    }

    fn flagged_on<'a>(&'a self, grid: &[Vec<bool>], index: usize) -> Vec<&'a str> {
        self.symbols
            .iter()
            .zip(grid)
            .filter(|(_, col)| col.get(index).copied().unwrap_or(false))
            .map(|(s, _)| s.as_str())
            .collect()
    }
}
