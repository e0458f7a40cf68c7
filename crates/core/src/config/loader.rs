//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Config file name searched for in the working directory and user config dir
pub const CONFIG_FILE_NAME: &str = "storefront-search.toml";

/// Overrides `search.threshold`
pub const THRESHOLD_ENV: &str = "STOREFRONT_SEARCH_THRESHOLD";

/// Overrides `search.limit`
pub const LIMIT_ENV: &str = "STOREFRONT_SEARCH_LIMIT";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or the standard locations, then
    /// apply environment overrides.
    ///
    /// An explicit path that does not exist is an error; when nothing is found
    /// in the standard locations the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match &config_path {
            Some(p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let mut config = Self {
            schema,
            path: config_path,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        tracing::debug!(path = ?config.path, "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }

    /// Apply `STOREFRONT_SEARCH_*` overrides read through `lookup`
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(raw) = lookup(THRESHOLD_ENV) {
            self.schema.search.threshold = raw
                .trim()
                .parse()
                .map_err(|e| Error::invalid_config_value(THRESHOLD_ENV, e))?;
        }
        if let Some(raw) = lookup(LIMIT_ENV) {
            self.schema.search.limit = raw
                .trim()
                .parse()
                .map_err(|e| Error::invalid_config_value(LIMIT_ENV, e))?;
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.schema)
            .map_err(|e| Error::config(format!("Failed to serialize configuration: {e}")))
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(format!(".{CONFIG_FILE_NAME}")),
        PathBuf::from(CONFIG_FILE_NAME),
        Path::new(".config").join(CONFIG_FILE_NAME),
    ];

    candidates
        .into_iter()
        .chain(dirs::config_dir().map(|dir| dir.join("storefront").join(CONFIG_FILE_NAME)))
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.search.limit, 5);
        assert_eq!(config.schema.search.threshold, 0.4);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/storefront-search.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search]\nthreshold = 0.25\nlimit = 8").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.schema.search.threshold, 0.25);
        assert_eq!(config.schema.search.limit, 8);
    }

    #[test]
    fn test_config_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search\nthreshold = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.context.is_some());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| match key {
                THRESHOLD_ENV => Some("0.1".into()),
                LIMIT_ENV => Some(" 12 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.schema.search.threshold, 0.1);
        assert_eq!(config.schema.search.limit, 12);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = Config::default();
        let err = config
            .apply_env_overrides(|key| (key == LIMIT_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
        assert!(err.message.contains(LIMIT_ENV));
    }

    #[test]
    fn test_toml_round_trip_keeps_fields() {
        let config = Config::from_toml(
            r#"
            [search]
            fields = [{ name = "category", weight = 2.0 }]
            "#,
        )
        .unwrap();
        let rendered = config.to_toml().unwrap();
        let reparsed = Config::from_toml(&rendered).unwrap();
        assert_eq!(reparsed.schema.search.fields, config.schema.search.fields);
    }
}
