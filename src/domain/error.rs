//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for friday.
#[derive(Debug, thiserror::Error)]
pub enum FridayError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{date} is not a trading session: {reason}")]
    CalendarLookup { date: NaiveDate, reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("no close price for {symbol} on {date}")]
    MissingPrice { symbol: String, date: NaiveDate },

    #[error("misaligned series {symbol}: {reason}")]
    Misaligned { symbol: String, reason: String },

    #[error(
        "insufficient history for {symbol}: {available} session pairs available, {required} required"
    )]
    InsufficientHistory {
        symbol: String,
        available: usize,
        required: usize,
    },

    #[error("missing {indicator} value for {symbol} on {date}")]
    MissingIndicatorValue {
        indicator: String,
        symbol: String,
        date: NaiveDate,
    },

    #[error("unknown symbol {symbol}: not part of the evaluated universe")]
    UnknownSymbol { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FridayError> for std::process::ExitCode {
    fn from(err: &FridayError) -> Self {
        let code: u8 = match err {
            FridayError::Io(_) => 1,
            FridayError::ConfigParse { .. }
            | FridayError::ConfigMissing { .. }
            | FridayError::ConfigInvalid { .. } => 2,
            FridayError::CalendarLookup { .. } => 3,
            FridayError::DataSource { .. }
            | FridayError::NoData { .. }
            | FridayError::MissingPrice { .. }
            | FridayError::Misaligned { .. }
            | FridayError::InsufficientHistory { .. } => 5,
            FridayError::MissingIndicatorValue { .. } | FridayError::UnknownSymbol { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_history_message_names_counts() {
        let err = FridayError::InsufficientHistory {
            symbol: "SPY".into(),
            available: 3,
            required: 15,
        };
        assert_eq!(
            err.to_string(),
            "insufficient history for SPY: 3 session pairs available, 15 required"
        );
    }

    #[test]
    fn missing_indicator_message() {
        let err = FridayError::MissingIndicatorValue {
            indicator: "RSI(10)".into(),
            symbol: "UVXY".into(),
            date: NaiveDate::from_ymd_opt(2022, 8, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "missing RSI(10) value for UVXY on 2022-08-01"
        );
    }

    #[test]
    fn exit_codes_group_by_category() {
        use std::process::ExitCode;

        let same = |a: ExitCode, b: u8| format!("{a:?}") == format!("{:?}", ExitCode::from(b));

        let config = FridayError::ConfigMissing {
            section: "history".into(),
            key: "start_date".into(),
        };
        assert!(same(ExitCode::from(&config), 2));

        let calendar = FridayError::CalendarLookup {
            date: NaiveDate::from_ymd_opt(2022, 8, 13).unwrap(),
            reason: "weekend".into(),
        };
        assert!(same(ExitCode::from(&calendar), 3));

        let unknown = FridayError::UnknownSymbol {
            symbol: "QQQ".into(),
        };
        assert!(same(ExitCode::from(&unknown), 6));
    }
}
