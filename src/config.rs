use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// The Angular grid client's dev server
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4200";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MedalboardConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_origins: Option<Vec<String>>,
}

impl MedalboardConfig {
    /// Database path: explicit value, then config file, then default
    pub fn database_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_database_path)
    }

    /// Listen address: explicit port, then config file, then defaults
    pub fn bind_addr(&self, cli_port: Option<u16>) -> anyhow::Result<SocketAddr> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid host '{}' in config: {}", host, e))?;
        let port = cli_port.or(self.port).unwrap_or(DEFAULT_PORT);
        Ok(SocketAddr::new(ip, port))
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()])
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("medalboard.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("medalboard.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<MedalboardConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: MedalboardConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &MedalboardConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("medalboard.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medalboard.toml");
        let config = MedalboardConfig {
            database: Some("data/olympics.db".to_string()),
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            allowed_origins: Some(vec!["http://example.test".to_string()]),
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        // Refuses to clobber without force
        assert!(write_config(&path, &MedalboardConfig::default(), false).is_err());
        write_config(&path, &MedalboardConfig::default(), true).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(MedalboardConfig::default()));
    }

    #[test]
    fn test_precedence() {
        let config = MedalboardConfig {
            database: Some("from-file.db".to_string()),
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            allowed_origins: None,
        };

        assert_eq!(config.database_path(None), PathBuf::from("from-file.db"));
        assert_eq!(config.database_path(Some(PathBuf::from("cli.db"))), PathBuf::from("cli.db"));
        assert_eq!(config.bind_addr(None).unwrap().port(), 9000);
        assert_eq!(config.bind_addr(Some(3000)).unwrap().port(), 3000);
        assert_eq!(config.allowed_origins(), vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        let defaults = MedalboardConfig::default();
        assert_eq!(defaults.database_path(None), default_database_path());
        assert_eq!(defaults.bind_addr(None).unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_host() {
        let config = MedalboardConfig { host: Some("not a host".to_string()), ..Default::default() };
        assert!(config.bind_addr(None).is_err());
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("medalboard.db");

        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }
}
