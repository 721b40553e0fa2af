use crate::security::{set_config_permissions, validate_config, SecurityError};
use crate::types::KnitConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config management
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Security(#[from] SecurityError),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Manager for Knit configuration
///
/// Manages the configuration stored in ~/.knit/config.toml. Every loaded
/// config has passed [`validate_config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    config: KnitConfig,
}

impl ConfigManager {
    /// Get the default config path (~/.knit/config.toml)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".knit").join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults when
    /// no file exists yet
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        match Self::load_from(&config_path) {
            Err(ConfigError::ConfigNotFound(_)) => Ok(Self {
                config_path,
                config: KnitConfig::default(),
            }),
            other => other,
        }
    }

    /// Load config from specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let config: KnitConfig = toml::from_str(&contents)?;
        validate_config(&config)?;

        Ok(Self {
            config_path: path.to_path_buf(),
            config,
        })
    }

    /// Initialize a new config file at the default location
    pub fn init() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::init_at(&config_path)
    }

    /// Initialize config at specific path
    ///
    /// Refuses to overwrite an existing file.
    pub fn init_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = Self {
            config_path: path.to_path_buf(),
            config: KnitConfig::default(),
        };
        manager.save()?;
        Ok(manager)
    }

    /// Save config to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent corruption
    pub fn save(&self) -> Result<(), ConfigError> {
        validate_config(&self.config)?;
        let toml_str = toml::to_string_pretty(&self.config)?;

        let temp_path = self.config_path.with_extension("toml.tmp");
        fs::write(&temp_path, toml_str)?;
        set_config_permissions(&temp_path)?;
        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    /// Where this config lives on disk
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get reference to config
    pub fn get(&self) -> &KnitConfig {
        &self.config
    }

    /// Get mutable reference to config (caller must call save())
    pub fn get_mut(&mut self) -> &mut KnitConfig {
        &mut self.config
    }

    /// Consume the manager, keeping only the config
    pub fn into_config(self) -> KnitConfig {
        self.config
    }
}
