//! Structured outcome of an export run.
//!
//! The walk never aborts on a per-object anomaly; instead every exported
//! file and every skipped object is recorded here and the whole report is
//! returned to the caller.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

// ============================================================================
// ExportedFile
// ============================================================================

/// One artifact written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Title of the sheet the object lives on.
    pub sheet_title: String,
    /// Id of the exported object.
    pub object_id: String,
    /// Where the artifact was written.
    pub path: PathBuf,
}

// ============================================================================
// Skip
// ============================================================================

/// Why an object or sheet was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The engine returned no handle for the object.
    MissingHandle,
    /// No export response carried a download url.
    NoDownloadUrl,
    /// The artifact download answered with a non-success status.
    HttpStatus(u16),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHandle => write!(f, "engine returned no handle"),
            Self::NoDownloadUrl => write!(f, "no download url in export response"),
            Self::HttpStatus(status) => write!(f, "download answered HTTP {status}"),
        }
    }
}

/// One object or sheet the walk passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    /// Id of the skipped object or sheet.
    pub object_id: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

// ============================================================================
// ExportReport
// ============================================================================

/// Everything one [`run`](crate::export::ExportWalker::run) produced.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Artifacts written, in export order.
    pub files: Vec<ExportedFile>,
    /// Objects and sheets passed over, with reasons.
    pub skipped: Vec<Skip>,
    /// Number of full export passes performed (one per value set, or one).
    pub passes: usize,
}

impl ExportReport {
    /// Creates an empty report.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing was skipped.
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Records a written artifact.
    pub(crate) fn exported(
        &mut self,
        sheet_title: impl Into<String>,
        object_id: impl Into<String>,
        path: PathBuf,
    ) {
        self.files.push(ExportedFile {
            sheet_title: sheet_title.into(),
            object_id: object_id.into(),
            path,
        });
    }

    /// Records a skipped object.
    pub(crate) fn skip(&mut self, object_id: impl Into<String>, reason: SkipReason) {
        self.skipped.push(Skip {
            object_id: object_id.into(),
            reason,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
