//! Single-position rotation state machine.
//!
//! Sessions are folded strictly left to right. Each step takes the previous
//! [`PositionState`] and the session's desired role, and yields the next state
//! plus the marks to write for that session. At most one position is open at
//! any time across the whole universe.

use crate::domain::decision::{desired_role, SessionView};
use crate::domain::error::FridayError;
use crate::domain::indicator::IndicatorTable;
use crate::domain::price::PriceTable;
use crate::domain::signal::{SignalGrid, SignalMark, SignalTable};
use crate::domain::universe::{Role, RoleMap};
use chrono::NaiveDate;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionStatus {
    Opened,
    #[default]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionState {
    pub held: Option<Role>,
    pub status: PositionStatus,
}

/// Marks produced by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionMarks {
    pub entry: (Role, SignalMark),
    pub exit: Option<(Role, SignalMark)>,
}

/// One transition.
///
/// On the first session the desired role is simply entered. Afterwards, a
/// desired role that differs from the held one is a rotation: the held role
/// exits, the position closes, and the desired role's entry reopens it.
/// A desired role equal to the held one cancels its own candidate entry and
/// leaves a cancelled exit on the held role, i.e. the position is kept.
pub fn step(state: PositionState, desired: Role, index: usize) -> (PositionState, SessionMarks) {
    let mut status = state.status;
    let mut marks = SessionMarks {
        entry: (desired, SignalMark::Fire),
        exit: None,
    };

    match state.held.filter(|_| index > 0) {
        None => status = PositionStatus::Opened,
        Some(held) => {
            // the desired role had no entry mark yesterday exactly when it
            // differs from yesterday's pick, which is the held role
            if held != desired {
                marks.exit = Some((held, SignalMark::Fire));
                status = PositionStatus::Closed;
            }

            if status == PositionStatus::Closed {
                status = PositionStatus::Opened;
            } else {
                marks.entry = (desired, SignalMark::Cancel);
                marks.exit = Some((held, SignalMark::Cancel));
            }
        }
    }

    let next = PositionState {
        held: Some(desired),
        status,
    };
    (next, marks)
}

/// What happened on one session, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDecision {
    pub date: NaiveDate,
    pub desired: Role,
    pub rotated: bool,
    pub state: PositionState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub signals: SignalTable,
    pub decisions: Vec<SessionDecision>,
    pub final_state: PositionState,
}

/// Runs the decision tree and state machine over every session of `prices`.
///
/// `symbol_universe` fixes the signal table's columns; every role symbol must
/// appear in it and in `prices`.
pub fn evaluate(
    symbol_universe: &[String],
    roles: &RoleMap,
    prices: &PriceTable,
    ma: &IndicatorTable,
    rsi: &IndicatorTable,
) -> Result<SignalTable, FridayError> {
    evaluate_detailed(symbol_universe, roles, prices, ma, rsi).map(|e| e.signals)
}

pub fn evaluate_detailed(
    symbol_universe: &[String],
    roles: &RoleMap,
    prices: &PriceTable,
    ma: &IndicatorTable,
    rsi: &IndicatorTable,
) -> Result<Evaluation, FridayError> {
    roles.validate_against(symbol_universe)?;
    for symbol in symbol_universe {
        if prices.column(symbol).is_none() {
            return Err(FridayError::UnknownSymbol {
                symbol: symbol.clone(),
            });
        }
    }
    for (name, table) in [("moving average", ma), ("oscillator", rsi)] {
        if !table.is_aligned_with(prices) {
            return Err(FridayError::Misaligned {
                symbol: name.to_string(),
                reason: format!(
                    "{} sessions vs {} price sessions",
                    table.len(),
                    prices.len()
                ),
            });
        }
    }

    let mut grid = SignalGrid::new(prices.dates().to_vec(), symbol_universe.to_vec());
    let mut columns = [0usize; 7];
    for role in Role::ALL {
        let symbol = roles.symbol(role);
        columns[role as usize] =
            grid.column_of(symbol)
                .ok_or_else(|| FridayError::UnknownSymbol {
                    symbol: symbol.to_string(),
                })?;
    }
    let column = |role: Role| columns[role as usize];
    let mut decisions = Vec::with_capacity(prices.len());

    let final_state = prices.dates().iter().enumerate().try_fold(
        PositionState::default(),
        |state, (index, &date)| {
            let view = SessionView {
                roles,
                prices,
                ma,
                rsi,
                index,
            };
            let desired = desired_role(&view)?;
            let (next, marks) = step(state, desired, index);

            let (role, mark) = marks.entry;
            grid.set_entry(column(role), index, mark);
            if let Some((role, mark)) = marks.exit {
                grid.set_exit(column(role), index, mark);
            }

            let rotated = marks.exit.is_some_and(|(_, m)| m.fires());
            if rotated {
                debug!(
                    %date,
                    from = roles.symbol(state.held.unwrap_or(desired)),
                    to = roles.symbol(desired),
                    "rotating position"
                );
            }
            decisions.push(SessionDecision {
                date,
                desired,
                rotated,
                state: next,
            });
            Ok::<_, FridayError>(next)
        },
    )?;

    let signals = grid.into_table();
    info!(
        sessions = signals.len(),
        rotations = decisions.iter().filter(|d| d.rotated).count(),
        "evaluated signals"
    );

    Ok(Evaluation {
        signals,
        decisions,
        final_state,
    })
}
