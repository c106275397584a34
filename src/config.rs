use glow_track_core::UserIdentity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding per-user library files (file store)
    pub data_dir: PathBuf,
    /// Stable user id for the local identity
    pub user_id: String,
    /// Email for the local identity
    pub email: String,
    /// Debounce window for coalescing saves, in milliseconds
    pub debounce_ms: u64,
    /// Sync server base URL; when set, the REST store is used instead of
    /// the file store
    pub server_url: Option<String>,
    /// Bearer key for the sync server
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            data_dir: PathBuf::from(&home).join(".glowtrack"),
            user_id: "local".to_string(),
            email: "local@glowtrack".to_string(),
            debounce_ms: 400,
            server_url: None,
            api_key: None,
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

        if let Ok(data_dir) = std::env::var("GLOWTRACK_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(user_id) = std::env::var("GLOWTRACK_USER_ID") {
            config.user_id = user_id;
        }
        if let Ok(email) = std::env::var("GLOWTRACK_EMAIL") {
            config.email = email;
        }
        if let Ok(server_url) = std::env::var("GLOWTRACK_SERVER_URL") {
            config.server_url = Some(server_url);
        }
        if let Ok(api_key) = std::env::var("GLOWTRACK_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(debounce) = std::env::var("GLOWTRACK_DEBOUNCE_MS") {
            if let Ok(parsed) = debounce.parse() {
                config.debounce_ms = parsed;
            }
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/glowtrack/config.yaml
    pub fn default_config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".config")
            .join("glowtrack")
            .join("config.yaml")
    }

    /// The identity handed to the manager's auth callback.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(&self.user_id, &self.email)
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
        assert!(config.data_dir.to_string_lossy().contains(".glowtrack"));
        assert_eq!(config.user_id, "local");
        assert_eq!(config.debounce_ms, 400);
        assert!(config.server_url.is_none());
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /custom/data").unwrap();
        writeln!(file, "user_id: ada").unwrap();
        writeln!(file, "debounce_ms: 250").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.user_id, "ada");
        assert_eq!(config.debounce_ms, 250);
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "email: fromfile@example.com").unwrap();

        std::env::set_var("GLOWTRACK_EMAIL", "fromenv@example.com");
        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.email, "fromenv@example.com");
        std::env::remove_var("GLOWTRACK_EMAIL");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[test]
    fn test_identity_from_config() {
        let config = Config::default();
        let identity = config.identity();
        assert_eq!(identity.id, "local");
        assert_eq!(identity.email, "local@glowtrack");
    }
}
