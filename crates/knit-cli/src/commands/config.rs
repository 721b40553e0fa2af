use anyhow::{Context, Result};
use clap::Subcommand;
use knit_config::{ConfigError, ConfigManager, KnitConfig};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize config file at ~/.knit/config.toml
    Init {
        /// Write the config somewhere else
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show config file path
    Path,

    /// Print the effective configuration as TOML
    Show,

    /// Validate config file
    Validate {
        /// Validate this file instead of the default one
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub fn handle_config_command(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init { path } => init_config(path),
        ConfigCommand::Path => show_config_path(),
        ConfigCommand::Show => show_config(),
        ConfigCommand::Validate { path } => validate_config(path),
    }
}

/// Loads the configuration for a command.
///
/// An explicit `--config` path must exist. Without one, the default file is
/// used when present and built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<KnitConfig> {
    let manager = match path {
        Some(path) => ConfigManager::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ConfigManager::load().context("Failed to load config")?,
    };
    Ok(manager.into_config())
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => ConfigManager::config_path()?,
    };

    match ConfigManager::init_at(&config_path) {
        Ok(_) => {
            println!("✓ Initialized config at: {}", config_path.display());
            Ok(())
        }
        Err(ConfigError::AlreadyExists(_)) => {
            println!("Config already exists at: {}", config_path.display());
            println!("To reinitialize, please delete the existing config first.");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to initialize config"),
    }
}

fn show_config_path() -> Result<()> {
    let config_path = ConfigManager::config_path()?;
    println!("{}", config_path.display());
    Ok(())
}

fn show_config() -> Result<()> {
    let manager = ConfigManager::load().context("Failed to load config")?;
    if !manager.path().exists() {
        println!("# No config file at {}; showing defaults", manager.path().display());
    }
    print!("{}", toml::to_string_pretty(manager.get())?);
    Ok(())
}

fn validate_config(path: Option<PathBuf>) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => ConfigManager::config_path()?,
    };

    let manager = ConfigManager::load_from(&config_path)
        .context("Config not found or invalid. Run 'knit config init' first.")?;
    let config = manager.get();

    println!("✓ Config is valid");
    println!("  Version: {}", config.version);
    println!("  Extensions: {}", config.scanner.extensions.join(", "));
    println!(
        "  Markers: {:?} + {:?}, {:?} / {:?}",
        config.scanner.provider_marker,
        config.scanner.declaration_token,
        config.scanner.injection_marker,
        config.scanner.binding_keyword
    );
    println!("  Cycle mode: {:?}", config.cycles.mode);
    match config.layout.seed {
        Some(seed) => println!("  Layout seed: {}", seed),
        None => println!("  Layout seed: random"),
    }
    Ok(())
}
