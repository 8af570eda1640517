//! The built-in templates and the errors of locating them

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while locating a template
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Unknown template selector
    #[error("unsupported template kind: {kind}")]
    UnsupportedTemplate { kind: String },

    /// The template source file does not exist
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The module providing the template is not in the module cache
    #[error("{module} is not installed under {}; run \"go get {module}\" first", dir.display())]
    DependencyNotInstalled { module: &'static str, dir: PathBuf },

    /// Error listing the module cache
    #[error("error reading {}: {message}", path.display())]
    ReadDir { path: PathBuf, message: String },
}

/// One of the built-in templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    SyncMap,
    ContainerList,
    ContainerRing,
    ContainerHeap,
    Singleflight,
}

/// Module path of the singleflight template
pub const SINGLEFLIGHT_MODULE: &str = "golang.org/x/sync/singleflight";

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::SyncMap,
        TemplateKind::ContainerList,
        TemplateKind::ContainerRing,
        TemplateKind::ContainerHeap,
        TemplateKind::Singleflight,
    ];

    /// Selector string, as given to `--generator`
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::SyncMap => "sync/map",
            TemplateKind::ContainerList => "container/list",
            TemplateKind::ContainerRing => "container/ring",
            TemplateKind::ContainerHeap => "container/heap",
            TemplateKind::Singleflight => "singleflight",
        }
    }

    /// Source file below `$GOROOT`; `None` for module-cache templates
    pub fn goroot_path(self) -> Option<&'static str> {
        match self {
            TemplateKind::SyncMap => Some("src/sync/map.go"),
            TemplateKind::ContainerList => Some("src/container/list/list.go"),
            TemplateKind::ContainerRing => Some("src/container/ring/ring.go"),
            TemplateKind::ContainerHeap => Some("src/container/heap/heap.go"),
            TemplateKind::Singleflight => None,
        }
    }
}

impl FromStr for TemplateKind {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LoaderError::UnsupportedTemplate {
                kind: s.to_string(),
            })
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
