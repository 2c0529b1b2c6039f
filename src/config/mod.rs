use crate::errors::{AppError, AppResult};
use crate::ui::rows::{DEFAULT_DATE_FORMAT, DEFAULT_HEADER_TITLE, RowStyle};
use crate::utils::formatting::is_valid_date_format;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rsleeptracker";
const CONFIG_NAME: &str = "rsleeptracker.conf";
const DB_NAME: &str = "rsleeptracker.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_header_title")]
    pub header_title: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}
fn default_header_title() -> String {
    DEFAULT_HEADER_TITLE.to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            date_format: default_date_format(),
            header_title: default_header_title(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(format!(".{APP_DIR}"))
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_NAME)
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DB_NAME)
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("cannot parse {}: {e}", path.display()))
        })?;
        if !is_valid_date_format(&config.date_format) {
            return Err(AppError::Config(format!(
                "invalid date_format '{}' in {}",
                config.date_format,
                path.display()
            )));
        }
        Ok(config)
    }

    /// How list rows are drawn.
    pub fn row_style(&self) -> RowStyle {
        RowStyle {
            header_title: self.header_title.clone(),
            date_format: self.date_format.clone(),
        }
    }

    /// Initialize configuration and database files.
    ///
    /// Returns the database path that was set up. In test mode the config
    /// file is left untouched.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) if Path::new(name).is_absolute() => PathBuf::from(name),
            Some(name) => dir.join(name),
            None => dir.join(DB_NAME),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/rsleeptracker.conf")).unwrap();
        assert_eq!(cfg.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.database.ends_with(DB_NAME));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = std::env::temp_dir().join(format!("rst-cfg-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.conf");
        fs::write(&path, "database: /tmp/nights.sqlite\nheader_title: Nights\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.database, "/tmp/nights.sqlite");
        assert_eq!(cfg.row_style().header_title, "Nights");
        assert_eq!(cfg.row_style().date_format, DEFAULT_DATE_FORMAT);

        fs::write(&path, "database: [unclosed").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_strftime_item_is_rejected() {
        let dir = std::env::temp_dir().join(format!("rst-cfg-fmt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad-format.conf");
        fs::write(&path, "database: /tmp/nights.sqlite\ndate_format: \"%Q\"\n").unwrap();

        match Config::load_from(&path) {
            Err(AppError::Config(msg)) => assert!(msg.contains("%Q")),
            other => panic!("expected a config error, got {other:?}"),
        }

        fs::write(&path, "database: /tmp/nights.sqlite\ndate_format: \"%d/%m %H:%M\"\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().date_format, "%d/%m %H:%M");

        let _ = fs::remove_dir_all(&dir);
    }
}
