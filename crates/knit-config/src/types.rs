use knit_core::{Canvas, CycleMode, DEFAULT_FAN_OUT_THRESHOLD};
use knit_fs::ExtractionLimits;
use serde::{Deserialize, Serialize};

/// Main configuration structure for Knit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnitConfig {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Which files are scanned and which markers are recognized
    #[serde(default)]
    pub scanner: ScannerSettings,

    /// Upload archive limits
    #[serde(default)]
    pub limits: ExtractionLimits,

    /// Synthetic node layout
    #[serde(default)]
    pub layout: LayoutSettings,

    #[serde(default)]
    pub cycles: CycleSettings,

    #[serde(default)]
    pub suggestions: SuggestionSettings,

    /// `knit serve` settings
    #[serde(default)]
    pub server: ServerSettings,
}

impl Default for KnitConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            scanner: ScannerSettings::default(),
            limits: ExtractionLimits::default(),
            layout: LayoutSettings::default(),
            cycles: CycleSettings::default(),
            suggestions: SuggestionSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl KnitConfig {
    /// Fan-out threshold for the advisory stage, `None` when it is disabled.
    pub fn fan_out_threshold(&self) -> Option<usize> {
        self.suggestions
            .enabled
            .then_some(self.suggestions.fan_out_threshold)
    }
}

/// Textual markers the scanner looks for.
///
/// A file declares a component on a line holding both `provider_marker` and
/// `declaration_token`; it injects a dependency on a line holding
/// `injection_marker`, named by the token after `binding_keyword`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScannerSettings {
    /// File extensions to scan, with the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_provider_marker")]
    pub provider_marker: String,

    #[serde(default = "default_declaration_token")]
    pub declaration_token: String,

    #[serde(default = "default_injection_marker")]
    pub injection_marker: String,

    #[serde(default = "default_binding_keyword")]
    pub binding_keyword: String,

    /// Globs (relative to the project root) excluded from scanning
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            provider_marker: default_provider_marker(),
            declaration_token: default_declaration_token(),
            injection_marker: default_injection_marker(),
            binding_keyword: default_binding_keyword(),
            ignore_patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayoutSettings {
    /// Rectangle node positions are drawn from
    #[serde(default)]
    pub canvas: Canvas,

    /// Fixed seed for reproducible layouts; random when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CycleSettings {
    /// `stack-snapshot` (default) or `strongly-connected`
    #[serde(default)]
    pub mode: CycleMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Components with more outgoing edges than this get a grouping hint
    #[serde(default = "default_fan_out_threshold")]
    pub fan_out_threshold: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fan_out_threshold: default_fan_out_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Number of analysis results kept for `/api/dependencies/{id}`
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            allowed_origins: default_allowed_origins(),
            max_upload_bytes: default_max_upload_bytes(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

// Default value functions
fn default_version() -> String {
    "1.0".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![".kt".to_string()]
}

fn default_provider_marker() -> String {
    "@Provides".to_string()
}

fn default_declaration_token() -> String {
    "class ".to_string()
}

fn default_injection_marker() -> String {
    "by di".to_string()
}

fn default_binding_keyword() -> String {
    "val ".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fan_out_threshold() -> usize {
    DEFAULT_FAN_OUT_THRESHOLD
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024 // 50MB
}

fn default_cache_capacity() -> usize {
    64
}
