//! Configuration for a parse invocation.
//!
//! All behaviour knobs live in one [`ParseConfig`] struct, built via its
//! builder. Keeping them together makes it trivial to share a config across
//! request-handling threads (the parser itself is stateless) and to log or
//! diff two runs.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default separator between ancestor titles in [`crate::Section::path`].
pub const DEFAULT_PATH_SEPARATOR: &str = " › ";

/// Configuration for Markdown structure extraction.
///
/// Built via [`ParseConfig::builder()`] or [`ParseConfig::default()`].
///
/// # Example
/// ```rust
/// use mdsect::ParseConfig;
///
/// let config = ParseConfig::builder()
///     .base_path("/data/paper/auto")
///     .include_sizes(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Base directory for resolving relative image links. Default: None.
    ///
    /// When set, a relative image target is replaced by `base_path/target`
    /// only if that file actually exists on disk. Targets that do not
    /// resolve, and all URL targets, are kept verbatim — downstream
    /// consumers prefer an absolute path when one is available but must
    /// never lose the original reference.
    pub base_path: Option<PathBuf>,

    /// Separator between ancestor titles in section paths. Default: `" › "`.
    pub path_separator: String,

    /// Compute per-section `word_count`, `direct_char_count`, and
    /// `total_char_count`. Default: true.
    ///
    /// Disable when only the tree shape and element assignment matter;
    /// document-level `total_words` is computed either way.
    pub include_sizes: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            base_path: None,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            include_sizes: true,
        }
    }
}

impl ParseConfig {
    /// Create a new builder for `ParseConfig`.
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ParseConfig`].
#[derive(Debug)]
pub struct ParseConfigBuilder {
    config: ParseConfig,
}

impl ParseConfigBuilder {
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_path = Some(path.into());
        self
    }

    pub fn path_separator(mut self, sep: impl Into<String>) -> Self {
        self.config.path_separator = sep.into();
        self
    }

    pub fn include_sizes(mut self, v: bool) -> Self {
        self.config.include_sizes = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ParseConfig, ParseError> {
        if self.config.path_separator.is_empty() {
            return Err(ParseError::InvalidConfig(
                "path separator must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_separator() {
        let c = ParseConfig::default();
        assert_eq!(c.path_separator, " › ");
        assert!(c.include_sizes);
        assert!(c.base_path.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ParseConfig::builder()
            .base_path("/tmp/doc")
            .path_separator(" > ")
            .include_sizes(false)
            .build()
            .unwrap();
        assert_eq!(c.base_path.as_deref(), Some(std::path::Path::new("/tmp/doc")));
        assert_eq!(c.path_separator, " > ");
        assert!(!c.include_sizes);
    }

    #[test]
    fn empty_separator_rejected() {
        let err = ParseConfig::builder().path_separator("").build();
        assert!(matches!(err, Err(ParseError::InvalidConfig(_))));
    }
}
