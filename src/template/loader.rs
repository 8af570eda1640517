//! Finding template sources on disk

use std::env;
use std::path::{Path, PathBuf};

use semver::Version;
use tracing::{info, warn};

use super::registry::{LoaderError, TemplateKind, SINGLEFLIGHT_MODULE};

const DEFAULT_GOROOT: &str = "/usr/local/go";

/// Where the Go toolchain and the module cache live
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLocator {
    goroot: PathBuf,
    module_cache: PathBuf,
}

impl TemplateLocator {
    /// `module_cache` is the `golang.org/x` directory of the module cache
    pub fn new(goroot: impl Into<PathBuf>, module_cache: impl Into<PathBuf>) -> Self {
        Self {
            goroot: goroot.into(),
            module_cache: module_cache.into(),
        }
    }

    /// Locator derived from `GOROOT`, `GOPATH` and `HOME`
    pub fn from_env() -> Self {
        Self::with_overrides(None, None)
    }

    /// Locator where explicit paths win over the environment
    pub fn with_overrides(goroot: Option<PathBuf>, gopath: Option<PathBuf>) -> Self {
        let goroot = goroot
            .or_else(|| env::var_os("GOROOT").filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GOROOT));
        let gopath = gopath.or_else(default_gopath).unwrap_or_else(|| PathBuf::from("go"));
        Self::new(goroot, gopath.join("pkg/mod/golang.org/x"))
    }

    pub fn goroot(&self) -> &Path {
        &self.goroot
    }

    pub fn module_cache(&self) -> &Path {
        &self.module_cache
    }

    /// Path of the template source for `kind`.
    ///
    /// `version` pins the singleflight module version; without it the
    /// highest installed version is used.
    pub fn locate(&self, kind: TemplateKind, version: Option<&str>) -> Result<PathBuf, LoaderError> {
        let path = match kind.goroot_path() {
            Some(relative) => self.goroot.join(relative),
            None => self
                .singleflight_dir(version)?
                .join("singleflight/singleflight.go"),
        };
        if !path.is_file() {
            return Err(LoaderError::TemplateNotFound { path });
        }
        info!(template = %kind, path = %path.display(), "using template");
        Ok(path)
    }

    fn singleflight_dir(&self, version: Option<&str>) -> Result<PathBuf, LoaderError> {
        let not_installed = || LoaderError::DependencyNotInstalled {
            module: SINGLEFLIGHT_MODULE,
            dir: self.module_cache.clone(),
        };
        if !self.module_cache.is_dir() {
            return Err(not_installed());
        }
        if let Some(version) = version.filter(|v| !v.is_empty()) {
            return Ok(self.module_cache.join(format!("sync@{}", version)));
        }

        let entries = std::fs::read_dir(&self.module_cache).map_err(|e| LoaderError::ReadDir {
            path: self.module_cache.clone(),
            message: e.to_string(),
        })?;
        let names = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok());

        let (name, version) = highest_version(names).ok_or_else(not_installed)?;
        info!(%version, "selected highest installed golang.org/x/sync");
        Ok(self.module_cache.join(name))
    }
}

impl Default for TemplateLocator {
    fn default() -> Self {
        Self::from_env()
    }
}

/// First `GOPATH` entry, or `$HOME/go`
fn default_gopath() -> Option<PathBuf> {
    if let Some(gopath) = env::var_os("GOPATH").filter(|v| !v.is_empty()) {
        return env::split_paths(&gopath).next();
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join("go"))
}

/// Pick the `sync@<version>` directory with the highest semantic version.
///
/// Names that do not parse as a version are skipped.
pub fn highest_version<I>(names: I) -> Option<(String, Version)>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let raw = name.strip_prefix("sync@")?;
            match Version::parse(raw.trim_start_matches('v')) {
                Ok(version) => Some((name, version)),
                Err(err) => {
                    warn!(dir = %name, %err, "skipping unparsable module version");
                    None
                }
            }
        })
        .max_by(|a, b| a.1.cmp(&b.1))
}
