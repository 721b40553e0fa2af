pub mod config;

pub use config::{handle_config_command, load_config, ConfigCommand};
