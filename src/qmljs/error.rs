//! Errors of the fallible outer layers: configuration, file access and reports.
//!
//! The indentation engine itself never fails: any input yields an indent.

use config::ConfigError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum IndentError {
    /// Configuration could not be loaded or deserialized
    Config(ConfigError),
    /// Reading or writing a source file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A setting has a value the engine can not work with
    InvalidSetting(String),
    /// A report could not be serialized
    Serialize(serde_json::Error),
}

impl IndentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndentError::Io {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for IndentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndentError::Config(err) => write!(f, "Configuration error: {}", err),
            IndentError::Io { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            IndentError::InvalidSetting(msg) => write!(f, "Invalid setting: {}", msg),
            IndentError::Serialize(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for IndentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IndentError::Config(err) => Some(err),
            IndentError::Io { source, .. } => Some(source),
            IndentError::InvalidSetting(_) => None,
            IndentError::Serialize(err) => Some(err),
        }
    }
}

impl From<ConfigError> for IndentError {
    fn from(err: ConfigError) -> Self {
        IndentError::Config(err)
    }
}

impl From<serde_json::Error> for IndentError {
    fn from(err: serde_json::Error) -> Self {
        IndentError::Serialize(err)
    }
}
