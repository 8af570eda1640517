//! Settings file support
//!
//! Settings are loaded from a TOML file:
//!
//! ```toml
//! [paths]
//! goroot = "/usr/local/go"
//! gopath = "/home/me/go"
//!
//! [output]
//! header = "// Code generated by go-specialize. DO NOT EDIT."
//! formatter = ["goimports", "-w"]
//! ```
//!
//! Every key is optional. Paths left unset come from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::renderer::RenderConfig;
use crate::template::TemplateLocator;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub goroot: Option<PathBuf>,
    pub gopath: Option<PathBuf>,
    /// Generated-code header; `None` keeps the default, `""` disables it
    pub header: Option<String>,
    /// Command run on the written file; the file path is appended
    pub formatter: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlSettings {
    paths: TomlPaths,
    output: TomlOutput,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlPaths {
    goroot: Option<PathBuf>,
    gopath: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlOutput {
    header: Option<String>,
    formatter: Option<Vec<String>>,
}

/// Formatter run when none is configured
pub fn default_formatter() -> Vec<String> {
    vec!["goimports".to_string(), "-w".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            goroot: None,
            gopath: None,
            header: None,
            formatter: default_formatter(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(content.as_str())
    }

    /// Settings from `path`, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlSettings = toml::from_str(content)?;

        Ok(Settings {
            goroot: parsed.paths.goroot,
            gopath: parsed.paths.gopath,
            header: parsed.output.header,
            formatter: parsed.output.formatter.unwrap_or_else(default_formatter),
        })
    }

    /// Template locator; configured paths win over the environment
    pub fn locator(&self) -> TemplateLocator {
        TemplateLocator::with_overrides(self.goroot.clone(), self.gopath.clone())
    }

    pub fn render_config(&self) -> RenderConfig {
        match self.header.as_deref() {
            None => RenderConfig::new(),
            Some("") => RenderConfig::new().without_header(),
            Some(header) => RenderConfig::new().with_header(header),
        }
    }
}
