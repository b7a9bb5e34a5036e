//! Parser configuration.

/// Nesting depth allowed when no other limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling a single parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the input, included in error locations.
    pub filename: Option<String>,
    /// Maximum number of nested arrays and objects, or `None` for no limit.
    pub max_depth: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: None,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }
}
