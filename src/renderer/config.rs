//! Configuration for source rendering

/// Header marking the output as generated
pub const DEFAULT_HEADER: &str = "// Code generated by go-specialize. DO NOT EDIT.";

/// Configuration options for rendered output
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Comment placed above everything else
    pub header: Option<String>,

    /// Whether to re-parse the output before returning it
    pub verify: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            header: Some(DEFAULT_HEADER.to_string()),
            verify: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header comment
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Emit no header
    pub fn without_header(mut self) -> Self {
        self.header = None;
        self
    }

    /// Set whether the output is re-parsed
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
