//! Configuration validation.
//!
//! Checks every field of a run configuration before any price data is read.
//! The `read_*` helpers are shared with the CLI, which builds the
//! [`RunConfig`](crate::domain::simulation::RunConfig) from the same keys.

use crate::domain::error::FridayError;
use crate::domain::universe::{parse_symbols, Role, RoleMap};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), FridayError> {
    validate_data(config)?;
    read_universe(config)?;
    validate_history(config)?;
    validate_synthesis(config)?;
    read_holidays(config)?;
    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), FridayError> {
    match config.get_nonempty("data", "directory") {
        Some(_) => Ok(()),
        None => Err(FridayError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

fn validate_history(config: &dyn ConfigPort) -> Result<(), FridayError> {
    let (start, end) = read_history_window(config)?;
    if start >= end {
        return Err(FridayError::ConfigInvalid {
            section: "history".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn validate_synthesis(config: &dyn ConfigPort) -> Result<(), FridayError> {
    let (history_start, history_end) = read_history_window(config)?;
    let sample_start = read_optional_date(config, "synthesis", "sample_start")?;
    let sample_end = read_optional_date(config, "synthesis", "sample_end")?;

    if sample_start.unwrap_or(history_start) >= sample_end.unwrap_or(history_end) {
        return Err(FridayError::ConfigInvalid {
            section: "synthesis".to_string(),
            key: "sample_start".to_string(),
            reason: "sample_start must be before sample_end".to_string(),
        });
    }

    if sample_end.is_some_and(|end| end > history_end) {
        return Err(FridayError::ConfigInvalid {
            section: "synthesis".to_string(),
            key: "sample_end".to_string(),
            reason: "sample_end must not be after history end_date".to_string(),
        });
    }

    let horizon_end = read_optional_date(config, "synthesis", "horizon_end")?;
    let horizon_sessions = read_optional_u64(config, "synthesis", "horizon_sessions")?;
    if horizon_end.is_some() && horizon_sessions.is_some() {
        return Err(FridayError::ConfigInvalid {
            section: "synthesis".to_string(),
            key: "horizon_sessions".to_string(),
            reason: "set either horizon_end or horizon_sessions, not both".to_string(),
        });
    }

    read_paths(config)?;
    read_optional_u64(config, "synthesis", "seed")?;
    Ok(())
}

pub fn read_date(config: &dyn ConfigPort, section: &str, key: &str) -> Result<NaiveDate, FridayError> {
    read_optional_date(config, section, key)?.ok_or_else(|| FridayError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    })
}

pub fn read_optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, FridayError> {
    config
        .get_nonempty(section, key)
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| FridayError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            })
        })
        .transpose()
}

pub fn read_optional_u64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<u64>, FridayError> {
    config
        .get_u64(section, key)
        .map_err(|e| FridayError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a non-negative integer ({})", key, e),
        })
}

pub fn read_history_window(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), FridayError> {
    Ok((
        read_date(config, "history", "start_date")?,
        read_date(config, "history", "end_date")?,
    ))
}

/// Number of synthetic paths; defaults to 1.
pub fn read_paths(config: &dyn ConfigPort) -> Result<usize, FridayError> {
    match read_optional_u64(config, "synthesis", "paths")? {
        None => Ok(1),
        Some(0) => Err(FridayError::ConfigInvalid {
            section: "synthesis".to_string(),
            key: "paths".to_string(),
            reason: "paths must be at least 1".to_string(),
        }),
        Some(n) => Ok(n as usize),
    }
}

/// Role bindings from `[assets]` plus the evaluated universe.
///
/// Without an explicit `symbols` list the universe is the role symbols in
/// role order.
pub fn read_universe(config: &dyn ConfigPort) -> Result<(RoleMap, Vec<String>), FridayError> {
    let mut roles = RoleMap::default();
    for role in Role::ALL {
        if let Some(symbol) = config.get_nonempty("assets", role.config_key()) {
            if symbol.contains(',') || symbol.contains(char::is_whitespace) {
                return Err(FridayError::ConfigInvalid {
                    section: "assets".to_string(),
                    key: role.config_key().to_string(),
                    reason: format!("expected a single symbol, got {:?}", symbol),
                });
            }
            roles = roles.with(role, symbol);
        }
    }

    let universe = match config.get_nonempty("assets", "symbols") {
        Some(list) => parse_symbols(&list).map_err(|e| FridayError::ConfigInvalid {
            section: "assets".to_string(),
            key: "symbols".to_string(),
            reason: e.to_string(),
        })?,
        None => roles.symbols(),
    };

    roles.validate_against(&universe).map_err(|e| match e {
        FridayError::UnknownSymbol { symbol } => FridayError::ConfigInvalid {
            section: "assets".to_string(),
            key: "symbols".to_string(),
            reason: format!("role symbol {} is missing from symbols", symbol),
        },
        other => other,
    })?;

    Ok((roles, universe))
}

pub fn read_holidays(config: &dyn ConfigPort) -> Result<Vec<NaiveDate>, FridayError> {
    let Some(list) = config.get_nonempty("calendar", "holidays") else {
        return Ok(Vec::new());
    };
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FridayError::ConfigInvalid {
                section: "calendar".to_string(),
                key: "holidays".to_string(),
                reason: format!("invalid holiday {:?}, expected YYYY-MM-DD", s),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const BASE: &str = "[data]\ndirectory = /tmp/prices\n\
        [history]\nstart_date = 2012-01-03\nend_date = 2022-08-12\n";

    fn with(extra: &str) -> FileConfigAdapter {
        make_config(&format!("{BASE}{extra}"))
    }

    fn invalid_key(err: FridayError) -> String {
        match err {
            FridayError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn minimal_config_passes() {
        assert!(validate_run_config(&with("")).is_ok());
    }

    #[test]
    fn full_config_passes() {
        let config = with(
            r#"
[assets]
volatility_long = VIXY
symbols = SPY,TQQQ,SPXL,VIXY,SQQQ,BSV,TECL,QQQ

[synthesis]
sample_start = 2015-01-02
sample_end = 2022-08-12
horizon_sessions = 90
paths = 8
seed = 42

[calendar]
holidays = 2022-09-05,2022-11-24
"#,
        );
        assert!(validate_run_config(&config).is_ok());
    }

    #[test]
    fn data_directory_is_required() {
        let config = make_config("[history]\nstart_date = 2012-01-03\nend_date = 2022-08-12\n");
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, FridayError::ConfigMissing { key, .. } if key == "directory"));
    }

    #[test]
    fn history_dates_are_required() {
        let config = make_config("[data]\ndirectory = /tmp\n[history]\nstart_date = 2012-01-03\n");
        let err = validate_run_config(&config).unwrap_err();
        assert!(matches!(err, FridayError::ConfigMissing { key, .. } if key == "end_date"));
    }

    #[test]
    fn history_start_must_precede_end() {
        let config = make_config(
            "[data]\ndirectory = /tmp\n[history]\nstart_date = 2022-08-12\nend_date = 2022-08-12\n",
        );
        assert_eq!(invalid_key(validate_run_config(&config).unwrap_err()), "start_date");
    }

    #[test]
    fn malformed_date_is_invalid() {
        let err = validate_run_config(&with("[synthesis]\nhorizon_end = 12/30/2022\n")).unwrap_err();
        assert_eq!(invalid_key(err), "horizon_end");
    }

    #[test]
    fn horizon_keys_are_exclusive() {
        let err = validate_run_config(&with(
            "[synthesis]\nhorizon_end = 2022-12-30\nhorizon_sessions = 20\n",
        ))
        .unwrap_err();
        assert_eq!(invalid_key(err), "horizon_sessions");
    }

    #[test]
    fn sample_window_must_be_ordered() {
        let err = validate_run_config(&with(
            "[synthesis]\nsample_start = 2020-01-02\nsample_end = 2019-01-02\n",
        ))
        .unwrap_err();
        assert_eq!(invalid_key(err), "sample_start");
    }

    #[test]
    fn sample_end_must_lie_within_history() {
        let err = validate_run_config(&with("[synthesis]\nsample_end = 2030-01-02\n")).unwrap_err();
        assert_eq!(invalid_key(err), "sample_end");
    }

    #[test]
    fn paths_must_be_positive() {
        let err = validate_run_config(&with("[synthesis]\npaths = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "paths");
        let err = validate_run_config(&with("[synthesis]\npaths = many\n")).unwrap_err();
        assert_eq!(invalid_key(err), "paths");
    }

    #[test]
    fn seed_must_be_unsigned() {
        let err = validate_run_config(&with("[synthesis]\nseed = -1\n")).unwrap_err();
        assert_eq!(invalid_key(err), "seed");
    }

    #[test]
    fn role_symbol_must_be_in_universe() {
        let err = validate_run_config(&with("[assets]\nsymbols = SPY,TQQQ\n")).unwrap_err();
        assert_eq!(invalid_key(err), "symbols");
    }

    #[test]
    fn duplicate_role_symbol_is_invalid() {
        let err = validate_run_config(&with("[assets]\nleveraged_tech_alt = TQQQ\n")).unwrap_err();
        assert_eq!(invalid_key(err), "leveraged_tech_alt");
    }

    #[test]
    fn role_key_takes_one_symbol() {
        let err = validate_run_config(&with("[assets]\nshort_bond = BSV,SHY\n")).unwrap_err();
        assert_eq!(invalid_key(err), "short_bond");
    }

    #[test]
    fn read_universe_defaults_to_roles() {
        let (roles, universe) = read_universe(&with("[assets]\nvolatility_long = vixy\n")).unwrap();
        assert_eq!(roles.symbol(Role::VolatilityLong), "VIXY");
        assert_eq!(universe, roles.symbols());
    }

    #[test]
    fn bad_holiday_is_invalid() {
        let err = validate_run_config(&with("[calendar]\nholidays = 2022-09-05,soon\n")).unwrap_err();
        assert_eq!(invalid_key(err), "holidays");
    }
}
