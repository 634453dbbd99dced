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

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[database]
path = prices.db
pool_size = 2

[fetch]
api_key = demo
max_retries = 5

[backtest]
initial_investment = 2500.50
verbose = yes

[web]
listen = 127.0.0.1:8088
"#;

    #[test]
    fn from_string_reads_all_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("prices.db".to_string())
        );
        assert_eq!(adapter.get_int("database", "pool_size", 4), 2);
        assert_eq!(adapter.get_string("fetch", "api_key"), Some("demo".to_string()));
        assert_eq!(adapter.get_int("fetch", "max_retries", 3), 5);
        assert_eq!(
            adapter.get_double("backtest", "initial_investment", 0.0),
            2500.50
        );
        assert!(adapter.get_bool("backtest", "verbose", false));
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("127.0.0.1:8088".to_string())
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[database]\npath = x.db\n").unwrap();
        assert_eq!(adapter.get_string("database", "missing"), None);
        assert_eq!(adapter.get_string("no_such_section", "path"), None);
        assert_eq!(adapter.get_int("fetch", "max_retries", 3), 3);
        assert_eq!(adapter.get_double("backtest", "initial_investment", 10_000.0), 10_000.0);
        assert!(adapter.get_bool("backtest", "verbose", true));
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[fetch]\nmax_retries = lots\nretry_delay_secs = soon\n")
                .unwrap();
        assert_eq!(adapter.get_int("fetch", "max_retries", 3), 3);
        assert_eq!(adapter.get_double("fetch", "retry_delay_secs", 5.0), 5.0);
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[x]\na = true\nb = YES\nc = 1\nd = false\ne = No\nf = 0\n")
                .unwrap();
        assert!(adapter.get_bool("x", "a", false));
        assert!(adapter.get_bool("x", "b", false));
        assert!(adapter.get_bool("x", "c", false));
        assert!(!adapter.get_bool("x", "d", true));
        assert!(!adapter.get_bool("x", "e", true));
        assert!(!adapter.get_bool("x", "f", true));
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[database]\npath = /tmp/prices.db\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("database", "path"),
            Some("/tmp/prices.db".to_string())
        );
    }

    #[test]
    fn from_file_missing_file_errors() {
        assert!(FileConfigAdapter::from_file("/nonexistent/fincross.ini").is_err());
    }
}
