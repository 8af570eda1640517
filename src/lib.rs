//! go-specialize - Type-specialized copies of Go's `interface{}` containers
//!
//! This library loads one of five reference Go implementations written
//! against `interface{}`, rewrites its syntax tree for concrete types, and
//! renders the result as Go source.
//!
//! # Example
//!
//! ```rust
//! use go_specialize::{generate_from_source, GenerateConfig, TemplateKind};
//!
//! let template = "package ring\n\ntype Ring struct {\n\tValue interface{}\n}\n";
//! let config = GenerateConfig::new().with_package("names");
//! let out = generate_from_source(TemplateKind::ContainerRing, "name", "string", template, &config).unwrap();
//! assert!(out.contains("type NameRing struct"));
//! ```

pub mod config;
pub mod error;
pub mod mutate;
pub mod parser;
pub mod renderer;
pub mod strategy;
pub mod template;

pub use config::{ConfigError, Settings};
pub use error::{GenerateError, ParseError};
pub use renderer::{render, RenderConfig, RenderError};
pub use strategy::TemplateStrategy;
pub use template::{LoaderError, TemplateKind, TemplateLocator, TemplateUnit};

use std::path::Path;

use tracing::info;

/// Configuration for one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    /// Package clause of the output; the template's own when unset
    pub package: Option<String>,
    /// Pinned `golang.org/x/sync` version for `singleflight`
    pub version: Option<String>,
    pub render: RenderConfig,
    pub locator: TemplateLocator,
}

impl GenerateConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the header comment of the output
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.render = self.render.with_header(header);
        self
    }

    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    /// Set where templates are looked up
    pub fn with_locator(mut self, locator: TemplateLocator) -> Self {
        self.locator = locator;
        self
    }
}

/// Specialize the installed template for `kind`
///
/// `name` names the generated type and `expr` is the type argument: a
/// `map[K]V` expression for `sync/map` and `singleflight`, any type for
/// the containers.
pub fn generate(
    kind: TemplateKind,
    name: &str,
    expr: &str,
    config: &GenerateConfig,
) -> Result<String, GenerateError> {
    let strategy = TemplateStrategy::new(kind, name, expr)?;
    let path = config.locator.locate(kind, config.version.as_deref())?;
    let unit = TemplateUnit::load(&path, config.package.as_deref())?;
    specialize(&strategy, unit, config)
}

/// Specialize the template at `path` as if it were the one for `kind`
pub fn generate_from_path(
    kind: TemplateKind,
    name: &str,
    expr: &str,
    path: &Path,
    config: &GenerateConfig,
) -> Result<String, GenerateError> {
    let strategy = TemplateStrategy::new(kind, name, expr)?;
    let unit = TemplateUnit::load(path, config.package.as_deref())?;
    specialize(&strategy, unit, config)
}

/// Specialize template source held in memory
pub fn generate_from_source(
    kind: TemplateKind,
    name: &str,
    expr: &str,
    source: &str,
    config: &GenerateConfig,
) -> Result<String, GenerateError> {
    let strategy = TemplateStrategy::new(kind, name, expr)?;
    let path = format!("{}.go", kind.as_str().replace('/', "_"));
    let unit = TemplateUnit::parse(path, source.to_string(), config.package.as_deref())?;
    specialize(&strategy, unit, config)
}

fn specialize(
    strategy: &TemplateStrategy,
    unit: TemplateUnit,
    config: &GenerateConfig,
) -> Result<String, GenerateError> {
    let path = unit.path.clone();
    let unit = strategy.apply(unit)?;
    let output = render(&unit.file, &config.render)?;
    info!(template = %path.display(), bytes = output.len(), "specialized template");
    Ok(output)
}
