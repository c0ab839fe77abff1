use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use clientbook_data::db::default_db_path;

/// Server configuration loaded from file and/or environment.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub db_path: PathBuf,
    pub http_port: u16,
}

/// Raw TOML file structure for `~/.config/clientbook/config.toml`.
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    db_path: Option<PathBuf>,
    http_port: Option<u16>,
}

/// Default config file location.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .expect("could not determine config directory")
        .join("clientbook")
        .join("config.toml")
}

impl WebConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Priority: environment variables override file values.
    /// File path can be overridden by `config_path`.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let path = config_path.cloned().unwrap_or_else(default_config_path);

        let file_config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        Ok(Self::resolve(
            file_config,
            std::env::var("CLIENTBOOK_DB_PATH").ok(),
            std::env::var("CLIENTBOOK_HTTP_PORT").ok(),
        ))
    }

    /// Merge file values with environment overrides.
    fn resolve(file: ConfigFile, env_db: Option<String>, env_port: Option<String>) -> Self {
        let db_path = env_db
            .map(PathBuf::from)
            .or(file.db_path)
            .unwrap_or_else(default_db_path);
        let http_port = env_port
            .and_then(|s| s.parse::<u16>().ok())
            .or(file.http_port)
            .unwrap_or(8080);

        Self { db_path, http_port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // resolve() is tested directly to avoid env var mutation.

    #[test]
    fn test_resolve_defaults() {
        let config = WebConfig::resolve(ConfigFile::default(), None, None);
        assert_eq!(config.http_port, 8080);
        assert!(config.db_path.ends_with("clientbook/clientbook.db"));
    }

    #[test]
    fn test_resolve_prefers_env_over_file() {
        let file = ConfigFile {
            db_path: Some(PathBuf::from("/var/lib/clientbook/file.db")),
            http_port: Some(9000),
        };
        let config = WebConfig::resolve(
            file,
            Some("/tmp/env.db".to_string()),
            Some("9100".to_string()),
        );
        assert_eq!(config.db_path, PathBuf::from("/tmp/env.db"));
        assert_eq!(config.http_port, 9100);
    }

    #[test]
    fn test_resolve_uses_file_values() {
        let file = ConfigFile {
            db_path: Some(PathBuf::from("/var/lib/clientbook/file.db")),
            http_port: Some(9000),
        };
        let config = WebConfig::resolve(file, None, None);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/clientbook/file.db"));
        assert_eq!(config.http_port, 9000);
    }

    #[test]
    fn test_resolve_ignores_unparseable_port() {
        let file = ConfigFile {
            db_path: None,
            http_port: Some(9000),
        };
        let config = WebConfig::resolve(file, None, Some("not-a-port".to_string()));
        assert_eq!(config.http_port, 9000);
    }

    #[test]
    fn test_config_file_parsing() {
        let toml_str = r#"
db_path = "/srv/clientbook/clientbook.db"
http_port = 8081
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(
            file.db_path,
            Some(PathBuf::from("/srv/clientbook/clientbook.db"))
        );
        assert_eq!(file.http_port, Some(8081));
    }

    #[test]
    fn test_load_from_file() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "http_port = 8200\n").unwrap();

        let config = WebConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.http_port, 8200);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "http_port = [nonsense").unwrap();

        assert!(WebConfig::load(Some(&config_path)).is_err());
    }
}
