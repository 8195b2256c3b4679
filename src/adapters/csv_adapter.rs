//! CSV file adapters: historical closes in, price/signal tables out.

use crate::domain::error::FridayError;
use crate::domain::price::{PricePoint, PriceSeries, PriceTable};
use crate::domain::signal::SignalTable;
use crate::ports::data_port::PriceSourcePort;
use crate::ports::export_port::ExportPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

/// Reads `<base_path>/<SYMBOL>.csv`. The file needs a header row with a
/// `close` column; dates come from the `date` column, or the first column.
pub struct CsvPriceSource {
    base_path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, FridayError> {
    // timestamps such as 2022-08-01T04:00:00Z or "2022-08-01 00:00:00+00:00"
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| FridayError::DataSource {
        reason: format!("invalid date {:?}: {}", raw, e),
    })
}

impl PriceSourcePort for CsvPriceSource {
    fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FridayError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| FridayError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| FridayError::DataSource {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let close_col = find("close").ok_or_else(|| FridayError::DataSource {
            reason: format!("{} has no close column", path.display()),
        })?;
        let date_col = find("date").or_else(|| find("timestamp")).unwrap_or(0);

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FridayError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).ok_or_else(|| FridayError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = parse_date(date_str)?;
            if date < start || date > end {
                continue;
            }

            let close: f64 = record
                .get(close_col)
                .ok_or_else(|| FridayError::DataSource {
                    reason: "missing close column".into(),
                })?
                .trim()
                .parse()
                .map_err(|e| FridayError::DataSource {
                    reason: format!("invalid close value on {}: {}", date, e),
                })?;

            points.push(PricePoint { date, close });
        }

        points.sort_by_key(|p| p.date);
        PriceSeries::new(symbol, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, FridayError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FridayError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FridayError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Writes `<out_dir>/<name>.csv`.
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn writer(&self, name: &str) -> Result<csv::Writer<fs::File>, FridayError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.csv", name));
        csv::Writer::from_path(&path).map_err(|e| csv_error(&path, e))
    }
}

fn csv_error(path: &std::path::Path, e: csv::Error) -> FridayError {
    FridayError::DataSource {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

impl ExportPort for CsvExporter {
    /// `date,<SYM1>,<SYM2>,...`
    fn write_prices(&self, table: &PriceTable, name: &str) -> Result<(), FridayError> {
        let path = self.out_dir.join(format!("{}.csv", name));
        let mut wtr = self.writer(name)?;

        let mut header = vec!["date".to_string()];
        header.extend(table.symbols().iter().cloned());
        wtr.write_record(&header).map_err(|e| csv_error(&path, e))?;

        for (i, date) in table.dates().iter().enumerate() {
            let mut row = vec![date.to_string()];
            for symbol in table.symbols() {
                let close = table.close(symbol, i).unwrap_or(f64::NAN);
                row.push(close.to_string());
            }
            wtr.write_record(&row).map_err(|e| csv_error(&path, e))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// `date,symbol,entry,exit`, one row per session per symbol.
    fn write_signals(&self, signals: &SignalTable, name: &str) -> Result<(), FridayError> {
        let path = self.out_dir.join(format!("{}.csv", name));
        let mut wtr = self.writer(name)?;

        wtr.write_record(["date", "symbol", "entry", "exit"])
            .map_err(|e| csv_error(&path, e))?;
        for (i, date) in signals.dates().iter().enumerate() {
            for symbol in signals.symbols() {
                wtr.write_record([
                    date.to_string(),
                    symbol.clone(),
                    signals.entry(symbol, i).to_string(),
                    signals.exit(symbol, i).to_string(),
                ])
                .map_err(|e| csv_error(&path, e))?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}
