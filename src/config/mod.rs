use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
/// Token lifetime: 30 days, matching the web client's "stay signed in" window.
const DEFAULT_TOKEN_TTL_HOURS: i64 = 720;

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".carhub")
}

/// Optional settings read from `{data_dir}/config.toml`.
///
/// Every field is optional; CLI flags and environment variables take
/// precedence over the file, the file over built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct ConfigFile {
    port: Option<u16>,
    bind_address: Option<String>,
    token_ttl_hours: Option<i64>,
    log: Option<String>,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Bind address. `0.0.0.0` by default — the API serves a browser SPA
    /// running on other hosts.
    pub bind_address: String,
    /// Directory holding the SQLite database, token secret, config file,
    /// and uploaded listing images.
    pub data_dir: PathBuf,
    /// Auth token lifetime in hours.
    pub token_ttl_hours: i64,
    /// Log filter (`RUST_LOG` syntax), e.g. `info` or `carhubd=debug`.
    pub log: String,
}

impl ServerConfig {
    /// Build the config from CLI/env overrides merged over the config file
    /// merged over defaults.
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        bind_address: Option<String>,
        log: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let file = Self::read_file(&data_dir);

        Self {
            port: port.or(file.port).unwrap_or(DEFAULT_PORT),
            bind_address: bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            token_ttl_hours: file.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
            log: log.or(file.log).unwrap_or_else(|| "info".to_string()),
            data_dir,
        }
    }

    fn read_file(data_dir: &std::path::Path) -> ConfigFile {
        let path = data_dir.join("config.toml");
        if !path.exists() {
            return ConfigFile::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(file) => {
                    info!("Loaded config from {}", path.display());
                    file
                }
                Err(e) => {
                    warn!("Ignoring malformed {}: {e}", path.display());
                    ConfigFile::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                ConfigFile::default()
            }
        }
    }

    /// Directory served read-only at `/uploads`.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(cfg.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);
    }

    #[test]
    fn cli_overrides_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 6000\nbind_address = \"127.0.0.1\"\n",
        )
        .unwrap();
        let cfg = ServerConfig::new(Some(7000), Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, 7000, "CLI port wins over the file");
        assert_eq!(cfg.bind_address, "127.0.0.1", "file fills the gaps");
    }

    #[test]
    fn malformed_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = \"not a number").unwrap();
        let cfg = ServerConfig::new(None, Some(dir.path().to_path_buf()), None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }
}
