use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Backup scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Start the repeating timer on launch.
    pub enabled: bool,
    /// Minutes between snapshots.
    pub interval_minutes: u64,
    /// Number of snapshot files kept; oldest beyond this are deleted.
    pub retention: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: 10,
            retention: crate::backup::DEFAULT_RETENTION,
        }
    }
}

impl BackupConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// Sync configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Document service root (e.g., "https://sync.example.com")
    pub server_url: Option<String>,
    /// Access token; usually supplied via SIDEPAD_SYNC_TOKEN instead.
    pub token: Option<String>,
}

impl SyncConfig {
    /// Returns true if sync is configured (has a server_url).
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some()
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the state file and the backups subdirectory
    pub data_dir: PathBuf,
    pub backup: BackupConfig,
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir: home.join(".sidepad"),
            backup: BackupConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(data_dir) = std::env::var("SIDEPAD_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(url) = std::env::var("SIDEPAD_SYNC_URL") {
            config.sync.server_url = Some(url);
        }
        if let Ok(token) = std::env::var("SIDEPAD_SYNC_TOKEN") {
            config.sync.token = Some(token);
        }

        Ok(config)
    }

    /// Path of the key/value state file.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    /// Directory snapshot files are written into.
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    /// Default config file path: ~/.config/sidepad/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("sidepad")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.data_dir.to_string_lossy().contains(".sidepad"));
        assert!(!config.backup.enabled);
        assert_eq!(config.backup.retention, 10);
        assert_eq!(config.backup.interval(), Duration::from_secs(600));
        assert!(!config.sync.is_configured());
    }

    #[test]
    fn test_derived_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            ..Config::default()
        };
        assert_eq!(config.state_path(), PathBuf::from("/data/state.json"));
        assert_eq!(config.backup_dir(), PathBuf::from("/data/backups"));
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.backup.interval_minutes, 10);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /custom/path").unwrap();
        writeln!(file, "backup:").unwrap();
        writeln!(file, "  enabled: true").unwrap();
        writeln!(file, "  interval_minutes: 5").unwrap();
        writeln!(file, "sync:").unwrap();
        writeln!(file, "  server_url: \"https://sync.example.com\"").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/path"));
        assert!(config.backup.enabled);
        assert_eq!(config.backup.interval_minutes, 5);
        assert!(config.sync.is_configured());
        // Unset sections keep their defaults.
        assert_eq!(config.backup.retention, 10);
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /fromfile").unwrap();

        std::env::set_var("SIDEPAD_DATA_DIR", "/fromenv");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/fromenv"));

        std::env::remove_var("SIDEPAD_DATA_DIR");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
