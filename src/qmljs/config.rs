//! Configuration loading
//!
//! `defaults/qmljs-indent.default.toml` is embedded in the crate, so the
//! documented defaults and the runtime defaults are the same file. User files
//! and single-key overrides (the CLI flags) are layered on top with [`Loader`]
//! before the result is deserialized into [`IndentConfig`].

use crate::qmljs::error::IndentError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/qmljs-indent.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndentConfig {
    pub formatting: FormattingConfig,
}

/// Knobs of the indentation engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormattingConfig {
    /// Width of a tab when computing columns.
    pub tab_size: usize,
    /// Columns per indentation level.
    pub indent_size: usize,
}

/// Largest accepted `tab_size` and `indent_size`.
pub const MAX_WIDTH: usize = 64;

impl IndentConfig {
    fn validate(self) -> Result<Self, IndentError> {
        check_width("formatting.tab_size", self.formatting.tab_size)?;
        check_width("formatting.indent_size", self.formatting.indent_size)?;
        Ok(self)
    }
}

fn check_width(key: &str, value: usize) -> Result<(), IndentError> {
    if (1..=MAX_WIDTH).contains(&value) {
        return Ok(());
    }
    Err(IndentError::InvalidSetting(format!(
        "{} must be between 1 and {}, got {}",
        key, MAX_WIDTH, value
    )))
}

/// Layers user configuration over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start from the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file that must exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file if it exists.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override a single key, e.g. `formatting.indent_size`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, IndentError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<IndentConfig, IndentError> {
        let config: IndentConfig = self.builder.build()?.try_deserialize()?;
        config.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in defaults alone.
pub fn load_defaults() -> Result<IndentConfig, IndentError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.formatting.tab_size, 4);
        assert_eq!(config.formatting.indent_size, 4);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("formatting.indent_size", 2i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.formatting.indent_size, 2);
        assert_eq!(config.formatting.tab_size, 4);
    }

    #[test]
    fn rejects_zero_indent_size() {
        let err = Loader::new()
            .set_override("formatting.indent_size", 0i64)
            .expect("override to apply")
            .build()
            .unwrap_err();
        assert!(matches!(err, IndentError::InvalidSetting(_)));
    }

    #[test]
    fn rejects_oversized_widths() {
        for key in ["formatting.indent_size", "formatting.tab_size"] {
            let err = Loader::new()
                .set_override(key, 4_000_000_000i64)
                .expect("override to apply")
                .build()
                .unwrap_err();
            assert!(matches!(err, IndentError::InvalidSetting(_)), "{}", key);
        }
        let config = Loader::new()
            .set_override("formatting.indent_size", MAX_WIDTH as i64)
            .expect("override to apply")
            .build()
            .expect("largest width to be accepted");
        assert_eq!(config.formatting.indent_size, MAX_WIDTH);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let err = Loader::new()
            .with_file("/nonexistent/qmljs-indent.toml")
            .build()
            .unwrap_err();
        assert!(matches!(err, IndentError::Config(_)));
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/qmljs-indent.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, load_defaults().unwrap());
    }
}
