//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the guard's effectful edges.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("login error store is corrupt: {0}")]
    CorruptStore(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, GuardConfig};

    fn startup(path: &std::path::Path) -> Result<GuardConfig, GuardError> {
        Ok(load_config(path)?)
    }

    #[test]
    fn test_config_errors_convert() {
        let err = startup(std::path::Path::new("/nonexistent/guard.toml")).unwrap_err();
        assert!(matches!(err, GuardError::Config(ConfigError::Io(_))));
        assert!(err.to_string().starts_with("IO error"));
    }
}
