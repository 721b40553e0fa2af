pub mod manager;
pub mod security;
pub mod types;

pub use manager::{ConfigError, ConfigManager};
pub use security::{validate_config, validate_session_id, SecurityError};
pub use types::{
    CycleSettings, KnitConfig, LayoutSettings, ScannerSettings, ServerSettings,
    SuggestionSettings,
};
