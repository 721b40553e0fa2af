use crate::types::KnitConfig;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration and user-supplied identifiers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Scanner setting '{0}' must not be empty")]
    EmptyMarker(&'static str),

    #[error("Invalid extension: {0:?}. Extensions start with a dot, e.g. \".kt\"")]
    InvalidExtension(String),

    #[error("At least one file extension must be configured")]
    NoExtensions,

    #[error("Layout canvas must have a positive width and height")]
    EmptyCanvas,

    #[error("Limit '{0}' must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),
}

/// Validate a loaded configuration
///
/// Rejects settings that would make every analysis silently empty or
/// every upload fail: blank markers, malformed extensions, a canvas with no
/// area, and zero-valued limits.
pub fn validate_config(config: &KnitConfig) -> Result<(), SecurityError> {
    let scanner = &config.scanner;
    for (name, value) in [
        ("provider_marker", &scanner.provider_marker),
        ("declaration_token", &scanner.declaration_token),
        ("injection_marker", &scanner.injection_marker),
        ("binding_keyword", &scanner.binding_keyword),
    ] {
        if value.trim().is_empty() {
            return Err(SecurityError::EmptyMarker(name));
        }
    }

    if scanner.extensions.is_empty() {
        return Err(SecurityError::NoExtensions);
    }
    for ext in &scanner.extensions {
        let valid = ext.len() > 1
            && ext.starts_with('.')
            && !ext[1..].contains(['.', '/', '\\'])
            && !ext.chars().any(char::is_whitespace);
        if !valid {
            return Err(SecurityError::InvalidExtension(ext.clone()));
        }
    }

    if config.layout.canvas.is_empty() {
        return Err(SecurityError::EmptyCanvas);
    }

    for (name, is_zero) in [
        ("max_entries", config.limits.max_entries == 0),
        ("max_entry_bytes", config.limits.max_entry_bytes == 0),
        ("max_total_bytes", config.limits.max_total_bytes == 0),
        ("max_upload_bytes", config.server.max_upload_bytes == 0),
        ("cache_capacity", config.server.cache_capacity == 0),
    ] {
        if is_zero {
            return Err(SecurityError::ZeroLimit(name));
        }
    }

    Ok(())
}

/// Validate a session id taken from a request path
///
/// Session ids are hyphenated UUIDs: 36 characters, hex digits and hyphens.
pub fn validate_session_id(id: &str) -> Result<(), SecurityError> {
    let well_formed = id.len() == 36
        && id.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        });

    if !well_formed {
        return Err(SecurityError::InvalidSessionId(id.to_string()));
    }
    Ok(())
}

/// Set restrictive permissions on config file (Unix only)
#[cfg(unix)]
pub fn set_config_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600); // rw-------
    fs::set_permissions(path, perms)?;
    Ok(())
}

/// Set config permissions (no-op on Windows for now)
#[cfg(not(unix))]
pub fn set_config_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&KnitConfig::default()), Ok(()));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let mut config = KnitConfig::default();
        config.scanner.injection_marker = "  ".to_string();
        assert_eq!(
            validate_config(&config),
            Err(SecurityError::EmptyMarker("injection_marker"))
        );
    }

    #[test]
    fn test_extension_rules() {
        for bad in ["kt", ".", "..kt", "./kt", ". kt"] {
            let mut config = KnitConfig::default();
            config.scanner.extensions = vec![bad.to_string()];
            assert!(
                matches!(validate_config(&config), Err(SecurityError::InvalidExtension(_))),
                "{bad:?} should be rejected"
            );
        }

        let mut config = KnitConfig::default();
        config.scanner.extensions.clear();
        assert_eq!(validate_config(&config), Err(SecurityError::NoExtensions));

        config.scanner.extensions = vec![".kt".to_string(), ".kts".to_string()];
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let mut config = KnitConfig::default();
        config.layout.canvas.height = 0.0;
        assert_eq!(validate_config(&config), Err(SecurityError::EmptyCanvas));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = KnitConfig::default();
        config.limits.max_total_bytes = 0;
        assert_eq!(
            validate_config(&config),
            Err(SecurityError::ZeroLimit("max_total_bytes"))
        );

        let mut config = KnitConfig::default();
        config.server.cache_capacity = 0;
        assert_eq!(
            validate_config(&config),
            Err(SecurityError::ZeroLimit("cache_capacity"))
        );
    }

    #[test]
    fn test_session_ids() {
        assert!(validate_session_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
        assert!(validate_session_id("67E55044-10B1-426F-9247-BB680E5FE0C8").is_ok());

        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("../../etc/passwd").is_err());
        assert!(validate_session_id("67e55044-10b1-426f-9247-bb680e5fe0c").is_err());
        assert!(validate_session_id("67e55044x10b1-426f-9247-bb680e5fe0c8").is_err());
        assert!(validate_session_id("67e55044-10b1-426f-9247-bb680e5fe0cg").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_config_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        set_config_permissions(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
