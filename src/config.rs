//! Export run configuration.
//!
//! Everything the original automation hard-coded as module constants is
//! runtime configuration here: engine endpoint, document id, export
//! directory, the optional filter field with its value sets, and the two
//! behaviors the source left ambiguous (failure tolerance and which export
//! method variant to issue).
//!
//! # Example
//!
//! ```ignore
//! use sheetshot::ExportConfig;
//! use url::Url;
//!
//! let config = ExportConfig::builder(
//!         Url::parse("ws://localhost:4848/app/")?,
//!         "sales.qvf",
//!     )
//!     .with_export_dir("./exports")
//!     .with_filter("Products", vec![vec!["EMEA".into()], vec!["APAC".into()]])
//!     .with_fail_fast()
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::EngineCommand;

// ============================================================================
// Constants
// ============================================================================

/// Default export directory, relative to the working directory.
const DEFAULT_EXPORT_DIR: &str = "./exports";

// ============================================================================
// ExportVariant
// ============================================================================

/// Which export method(s) to issue per object.
///
/// Engine versions differ in which of the two methods they honor. `Both`
/// issues `Export` then `ExportImg` and takes the download url from the
/// first response that carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportVariant {
    /// Issue only `Export`.
    Export,
    /// Issue only `ExportImg`.
    ExportImage,
    /// Issue `Export` then `ExportImg` (default).
    #[default]
    Both,
}

impl ExportVariant {
    /// Returns the export commands to issue for one object, in order.
    #[must_use]
    pub fn commands(self) -> Vec<EngineCommand> {
        match self {
            Self::Export => vec![EngineCommand::export_png()],
            Self::ExportImage => vec![EngineCommand::export_img_png()],
            Self::Both => vec![
                EngineCommand::export_png(),
                EngineCommand::export_img_png(),
            ],
        }
    }
}

// ============================================================================
// ExportConfig
// ============================================================================

/// Configuration for one export run.
///
/// Built with [`ExportConfig::builder`], or deserialized from a config
/// file. The export directory must already exist; the walker does not
/// create it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Engine WebSocket endpoint, e.g. `ws://localhost:4848/app/`.
    pub endpoint: Url,

    /// Document id or path to open.
    pub document_id: String,

    /// Directory exported images are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Field to apply selections to before each export pass.
    #[serde(default)]
    pub filter_field: Option<String>,

    /// Value sets to iterate; the full walk runs once per set.
    #[serde(default)]
    pub value_sets: Vec<Vec<String>>,

    /// Which export method(s) to issue per object.
    #[serde(default)]
    pub export_variant: ExportVariant,

    /// Abort the run on any engine application error instead of logging
    /// and continuing.
    #[serde(default)]
    pub fail_fast: bool,

    /// Override for the HTTP base artifacts are fetched from.
    ///
    /// Defaults to the endpoint with `ws`/`wss` mapped to `http`/`https`.
    #[serde(default)]
    pub download_base: Option<Url>,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXPORT_DIR)
}

impl ExportConfig {
    /// Starts building a configuration for the given endpoint and document.
    #[inline]
    #[must_use]
    pub fn builder(endpoint: Url, document_id: impl Into<String>) -> ExportConfigBuilder {
        ExportConfigBuilder::new(endpoint, document_id)
    }
}

// ============================================================================
// ExportConfigBuilder
// ============================================================================

/// Builder for [`ExportConfig`].
#[derive(Debug, Clone)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// Creates a builder with defaults for everything optional.
    #[must_use]
    pub fn new(endpoint: Url, document_id: impl Into<String>) -> Self {
        Self {
            config: ExportConfig {
                endpoint,
                document_id: document_id.into(),
                export_dir: default_export_dir(),
                filter_field: None,
                value_sets: Vec::new(),
                export_variant: ExportVariant::default(),
                fail_fast: false,
                download_base: None,
            },
        }
    }

    /// Sets the export directory.
    #[inline]
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.export_dir = dir.into();
        self
    }

    /// Sets the filter field and the value sets to iterate.
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, field: impl Into<String>, value_sets: Vec<Vec<String>>) -> Self {
        self.config.filter_field = Some(field.into());
        self.config.value_sets = value_sets;
        self
    }

    /// Sets which export method(s) to issue per object.
    #[inline]
    #[must_use]
    pub fn with_export_variant(mut self, variant: ExportVariant) -> Self {
        self.config.export_variant = variant;
        self
    }

    /// Makes any engine application error abort the run.
    #[inline]
    #[must_use]
    pub fn with_fail_fast(mut self) -> Self {
        self.config.fail_fast = true;
        self
    }

    /// Overrides the HTTP base artifacts are fetched from.
    #[inline]
    #[must_use]
    pub fn with_download_base(mut self, base: Url) -> Self {
        self.config.download_base = Some(base);
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint scheme is not `ws`/`wss`,
    /// the document id is empty, value sets were supplied without a filter
    /// field, or the download base is not `http`/`https`.
    pub fn build(self) -> Result<ExportConfig> {
        let config = self.config;

        if !matches!(config.endpoint.scheme(), "ws" | "wss") {
            return Err(Error::config(format!(
                "endpoint scheme must be ws or wss, got {}",
                config.endpoint.scheme()
            )));
        }

        if config.document_id.is_empty() {
            return Err(Error::config("document id must not be empty"));
        }

        if config.filter_field.is_none() && !config.value_sets.is_empty() {
            return Err(Error::config(
                "value sets supplied without a filter field",
            ));
        }

        if let Some(base) = &config.download_base
            && !matches!(base.scheme(), "http" | "https")
        {
            return Err(Error::config(format!(
                "download base scheme must be http or https, got {}",
                base.scheme()
            )));
        }

        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("ws://localhost:4848/app/").expect("valid url")
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::builder(endpoint(), "sales.qvf")
            .build()
            .expect("valid config");

        assert_eq!(config.export_dir, PathBuf::from("./exports"));
        assert_eq!(config.export_variant, ExportVariant::Both);
        assert!(!config.fail_fast);
        assert!(config.filter_field.is_none());
        assert!(config.value_sets.is_empty());
        assert!(config.download_base.is_none());
    }

    #[test]
    fn test_rejects_http_endpoint() {
        let url = Url::parse("http://localhost:4848/app/").expect("valid url");
        let err = ExportConfig::builder(url, "sales.qvf")
            .build()
            .expect_err("must reject");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_rejects_empty_document_id() {
        assert!(ExportConfig::builder(endpoint(), "").build().is_err());
    }

    #[test]
    fn test_rejects_value_sets_without_field() {
        let mut builder = ExportConfig::builder(endpoint(), "sales.qvf");
        builder.config.value_sets = vec![vec!["A".to_string()]];
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_rejects_ws_download_base() {
        let base = Url::parse("ws://localhost:4848/").expect("valid url");
        let err = ExportConfig::builder(endpoint(), "sales.qvf")
            .with_download_base(base)
            .build()
            .expect_err("must reject");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_filter_builder() {
        let config = ExportConfig::builder(endpoint(), "sales.qvf")
            .with_filter("Products", vec![vec!["A".to_string()], vec!["B".to_string()]])
            .build()
            .expect("valid config");

        assert_eq!(config.filter_field.as_deref(), Some("Products"));
        assert_eq!(config.value_sets.len(), 2);
    }

    #[test]
    fn test_variant_commands() {
        assert_eq!(ExportVariant::Export.commands().len(), 1);
        assert_eq!(ExportVariant::ExportImage.commands().len(), 1);

        let both = ExportVariant::Both.commands();
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].method_name(), "Export");
        assert_eq!(both[1].method_name(), "ExportImg");
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: ExportConfig = serde_json::from_str(
            r#"{"endpoint": "ws://localhost:4848/app/", "document_id": "sales.qvf"}"#,
        )
        .expect("parse");
        assert_eq!(config.document_id, "sales.qvf");
        assert_eq!(config.export_variant, ExportVariant::Both);
    }
}
