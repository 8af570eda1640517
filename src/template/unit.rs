//! A parsed template source

use std::path::{Path, PathBuf};

use crate::parser::{parse_file, File};
use crate::GenerateError;

/// One template file, parsed and ready to be rewritten
#[derive(Debug, Clone)]
pub struct TemplateUnit {
    pub path: PathBuf,
    /// Source text as read from disk
    pub source: String,
    pub file: File,
}

impl TemplateUnit {
    /// Read and parse `path`, renaming its package to `package` if given
    pub fn load(path: &Path, package: Option<&str>) -> Result<Self, GenerateError> {
        let source = std::fs::read_to_string(path).map_err(|source| GenerateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, source, package)
    }

    pub fn parse(
        path: impl Into<PathBuf>,
        source: String,
        package: Option<&str>,
    ) -> Result<Self, GenerateError> {
        let path = path.into();
        let mut file = match parse_file(&source) {
            Ok(file) => file,
            Err(errors) => {
                return Err(GenerateError::Parse {
                    path,
                    source_text: source,
                    errors,
                })
            }
        };
        if let Some(package) = package.filter(|p| !p.is_empty()) {
            file.name.set_name(package);
        }
        Ok(Self { path, source, file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_is_renamed() {
        let unit = TemplateUnit::parse("map.go", "package sync\n".to_string(), Some("cache")).unwrap();
        assert_eq!(unit.file.package_name(), "cache");
    }

    #[test]
    fn test_package_kept_without_override() {
        let unit = TemplateUnit::parse("map.go", "package sync\n".to_string(), None).unwrap();
        assert_eq!(unit.file.package_name(), "sync");
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = TemplateUnit::parse("broken.go", "package\n".to_string(), None).unwrap_err();
        match err {
            GenerateError::Parse { path, errors, .. } => {
                assert_eq!(path, PathBuf::from("broken.go"));
                assert!(!errors.is_empty());
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TemplateUnit::load(Path::new("/nonexistent/map.go"), None).unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }));
    }
}
