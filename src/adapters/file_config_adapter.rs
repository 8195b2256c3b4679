//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_u64(&self, section: &str, key: &str) -> Result<Option<u64>, String> {
        if self.get_nonempty(section, key).is_none() {
            return Ok(None);
        }
        self.config.getuint(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
directory = /var/lib/friday/prices

[assets]
volatility_long = VIXY

[history]
start_date = 2012-01-03
end_date = 2022-08-12
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "directory"),
            Some("/var/lib/friday/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("assets", "volatility_long"),
            Some("VIXY".to_string())
        );
        assert_eq!(
            adapter.get_string("history", "end_date"),
            Some("2022-08-12".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[synthesis]\npaths = 4\n").unwrap();
        assert_eq!(adapter.get_string("synthesis", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_nonempty_trims_and_skips_blank() {
        let adapter =
            FileConfigAdapter::from_string("[synthesis]\nseed =\nhorizon_end =  2022-12-30 \n")
                .unwrap();
        assert_eq!(adapter.get_nonempty("synthesis", "seed"), None);
        assert_eq!(
            adapter.get_nonempty("synthesis", "horizon_end"),
            Some("2022-12-30".to_string())
        );
    }

    #[test]
    fn get_u64_reads_unsigned_value() {
        let adapter =
            FileConfigAdapter::from_string("[synthesis]\npaths = 5\nseed = 18446744073709551615\n")
                .unwrap();
        assert_eq!(adapter.get_u64("synthesis", "paths"), Ok(Some(5)));
        assert_eq!(adapter.get_u64("synthesis", "seed"), Ok(Some(u64::MAX)));
    }

    #[test]
    fn get_u64_absent_or_blank_is_none() {
        let adapter = FileConfigAdapter::from_string("[synthesis]\nseed =\n").unwrap();
        assert_eq!(adapter.get_u64("synthesis", "seed"), Ok(None));
        assert_eq!(adapter.get_u64("synthesis", "paths"), Ok(None));
        assert_eq!(adapter.get_u64("calendar", "paths"), Ok(None));
    }

    #[test]
    fn get_u64_rejects_negative_and_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[synthesis]\npaths = abc\nseed = -3\n").unwrap();
        assert!(adapter.get_u64("synthesis", "paths").is_err());
        assert!(adapter.get_u64("synthesis", "seed").is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[output]\ndirectory = /tmp/friday-out\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "directory"),
            Some("/tmp/friday-out".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
