//! Export walker, artifact download, and run report.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `walker` | The linear export workflow over one session |
//! | `download` | HTTP artifact retrieval and filename construction |
//! | `report` | Structured outcome returned from a run |

// ============================================================================
// Submodules
// ============================================================================

/// HTTP artifact retrieval.
pub mod download;

/// Run outcome types.
pub mod report;

/// The export workflow.
pub mod walker;

// ============================================================================
// Re-exports
// ============================================================================

pub use download::{ArtifactDownloader, DownloadOutcome, UNTITLED, artifact_filename};
pub use report::{ExportReport, ExportedFile, Skip, SkipReason};
pub use walker::ExportWalker;
