//! The rotation decision tree: picks exactly one desired role per session.

use crate::domain::error::FridayError;
use crate::domain::indicator::{IndicatorKind, IndicatorTable};
use crate::domain::price::PriceTable;
use crate::domain::universe::{Role, RoleMap};

pub const LONG_MA_WINDOW: usize = 200;
pub const SHORT_MA_WINDOW: usize = 20;
pub const OSCILLATOR_WINDOW: usize = 10;

pub const TECH_OVERBOUGHT: f64 = 79.0;
pub const BROAD_LEVERAGED_OVERBOUGHT: f64 = 80.0;
pub const TECH_OVERSOLD: f64 = 31.0;
pub const BROAD_OVERSOLD: f64 = 30.0;
pub const VOLATILITY_ELEVATED: f64 = 74.0;
pub const VOLATILITY_EXTREME: f64 = 84.0;
pub const INVERSE_TECH_OVERSOLD: f64 = 31.0;

/// Read access to one session's inputs, addressed by role.
pub trait MarketView {
    fn close(&self, role: Role) -> Result<f64, FridayError>;
    fn moving_average(&self, role: Role, window: usize) -> Result<f64, FridayError>;
    fn oscillator(&self, role: Role) -> Result<f64, FridayError>;
}

/// Walks the tree top to bottom. Only the inputs on the taken branch are read.
pub fn desired_role(view: &impl MarketView) -> Result<Role, FridayError> {
    use Role::*;

    if view.close(BroadMarket)? > view.moving_average(BroadMarket, LONG_MA_WINDOW)? {
        if view.oscillator(LeveragedTech)? > TECH_OVERBOUGHT
            || view.oscillator(LeveragedBroad)? > BROAD_LEVERAGED_OVERBOUGHT
        {
            return Ok(VolatilityLong);
        }
        return Ok(LeveragedTech);
    }

    if view.oscillator(LeveragedTech)? < TECH_OVERSOLD {
        return Ok(LeveragedTechAlt);
    }
    if view.oscillator(BroadMarket)? < BROAD_OVERSOLD {
        return Ok(LeveragedBroad);
    }

    let volatility = view.oscillator(VolatilityLong)?;
    if volatility > VOLATILITY_ELEVATED && volatility <= VOLATILITY_EXTREME {
        return Ok(VolatilityLong);
    }

    // calm or extreme volatility both fall through to the tech trend check
    if view.close(LeveragedTech)? > view.moving_average(LeveragedTech, SHORT_MA_WINDOW)? {
        if view.oscillator(InverseTech)? < INVERSE_TECH_OVERSOLD {
            Ok(InverseTech)
        } else {
            Ok(LeveragedTech)
        }
    } else if view.oscillator(InverseTech)? > view.oscillator(ShortBond)? {
        Ok(InverseTech)
    } else {
        Ok(ShortBond)
    }
}

/// A [`MarketView`] over row `index` of aligned price and indicator tables.
pub struct SessionView<'a> {
    pub roles: &'a RoleMap,
    pub prices: &'a PriceTable,
    pub ma: &'a IndicatorTable,
    pub rsi: &'a IndicatorTable,
    pub index: usize,
}

impl MarketView for SessionView<'_> {
    fn close(&self, role: Role) -> Result<f64, FridayError> {
        let symbol = self.roles.symbol(role);
        let column = self
            .prices
            .column(symbol)
            .ok_or_else(|| FridayError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;
        Ok(column[self.index])
    }

    fn moving_average(&self, role: Role, window: usize) -> Result<f64, FridayError> {
        self.ma.require(
            IndicatorKind::MovingAverage(window),
            self.roles.symbol(role),
            self.index,
        )
    }

    fn oscillator(&self, role: Role) -> Result<f64, FridayError> {
        self.rsi.require(
            IndicatorKind::Oscillator(OSCILLATOR_WINDOW),
            self.roles.symbol(role),
            self.index,
        )
    }
}
