//! Configuration for merge jobs.
//!
//! [`MergeOptions`] carries everything a merge job needs besides the files
//! themselves: how the output file is named, how the output document is
//! compressed and which metadata is written into it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{MergeError, Result};

/// Base name used when the user does not supply one.
pub const DEFAULT_BASE_NAME: &str = "merged_document";

/// Extension appended to every output file name.
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// PDF version written into newly created output documents.
pub const DEFAULT_PDF_VERSION: &str = "1.7";

const SUPPORTED_PDF_VERSIONS: &[&str] = &["1.3", "1.4", "1.5", "1.6", "1.7", "2.0"];

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No stream compression.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(MergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let clean = |opt: Option<String>| {
            opt.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            title: clean(title),
            author: clean(author),
            subject: clean(subject),
            keywords: clean(keywords),
        }
    }

    /// Iterate over the set fields as `(Info key, value)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Title", self.title.as_deref()),
            ("Author", self.author.as_deref()),
            ("Subject", self.subject.as_deref()),
            ("Keywords", self.keywords.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

/// Options shared by every merge job of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Base name used when the user leaves the output name blank.
    pub default_base_name: String,

    /// Extension appended to the output base name.
    pub extension: String,

    /// Compression applied when serializing the output.
    pub compression: CompressionLevel,

    /// Metadata written into the output Info dictionary.
    pub metadata: Metadata,

    /// PDF version of the output document.
    pub pdf_version: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            default_base_name: DEFAULT_BASE_NAME.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
        }
    }
}

impl MergeOptions {
    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default base name is blank
    /// - The extension does not start with a dot
    /// - The PDF version is not one lopdf can write
    pub fn validate(&self) -> Result<()> {
        if self.default_base_name.trim().is_empty() {
            return Err(MergeError::invalid_config("Default output name cannot be empty"));
        }

        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(MergeError::invalid_config(format!(
                "Invalid output extension: {}. Must look like '.pdf'",
                self.extension
            )));
        }

        if !SUPPORTED_PDF_VERSIONS.contains(&self.pdf_version.as_str()) {
            return Err(MergeError::invalid_config(format!(
                "Unsupported PDF version: {}",
                self.pdf_version
            )));
        }

        Ok(())
    }

    /// Resolve the output file name for a user-supplied base name.
    pub fn output_name(&self, user_input: Option<&str>) -> OutputName {
        OutputName::resolve(user_input, self)
    }
}

/// File name of a merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputName(String);

impl OutputName {
    /// Build the output name from user input.
    ///
    /// Blank input falls back to the default base name. The extension is
    /// always appended.
    pub fn resolve(user_input: Option<&str>, options: &MergeOptions) -> Self {
        let base = user_input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(options.default_base_name.as_str());
        Self(format!("{base}{}", options.extension))
    }

    /// The file name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OutputName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
