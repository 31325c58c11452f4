//! sheetshot - bulk export of BI dashboard visuals to image files.
//!
//! This library automates a business-intelligence document's lifecycle
//! (open, reload, save) and exports every visual on every sheet to PNG,
//! driven through the engine's JSON-RPC-over-WebSocket API.
//!
//! # Architecture
//!
//! Two components, composed linearly:
//!
//! - **[`EngineSession`]**: owns the WebSocket connection; sends one
//!   structured request at a time and returns the reply with the matching
//!   correlation id.
//! - **[`ExportWalker`]**: opens the document, reloads and saves it, then
//!   walks the sheet tree - optionally once per configured filter value
//!   set - exporting each visual and downloading the artifact over HTTP.
//!
//! All calls are strictly sequential; nothing is retried. Transport and
//! protocol failures abort a run, while per-object engine anomalies are
//! recorded in the returned [`ExportReport`] and walked past.
//!
//! # Quick Start
//!
//! ```no_run
//! use sheetshot::{ExportConfig, ExportWalker, Result};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ExportConfig::builder(
//!             Url::parse("ws://localhost:4848/app/").expect("valid url"),
//!             "sales.qvf",
//!         )
//!         .with_export_dir("./exports")
//!         .with_filter("Products", vec![
//!             vec!["EMEA".to_string()],
//!             vec!["APAC".to_string()],
//!         ])
//!         .build()?;
//!
//!     let walker = ExportWalker::connect(config).await?;
//!     let report = walker.run().await?;
//!
//!     for file in &report.files {
//!         println!("exported {}", file.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Run configuration and builder |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`export`] | Export walker, artifact download, run report |
//! | [`identifiers`] | Type-safe id wrappers |
//! | [`protocol`] | JSON-RPC message types |
//! | [`session`] | WebSocket session and call correlation |

// ============================================================================
// Modules
// ============================================================================

/// Run configuration and builder.
pub mod config;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Export walker, artifact download, and run report.
pub mod export;

/// Type-safe identifiers for engine entities.
///
/// Newtype wrappers prevent mixing incompatible integers at compile time.
pub mod identifiers;

/// JSON-RPC protocol message types.
pub mod protocol;

/// WebSocket session layer.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

// Configuration types
pub use config::{ExportConfig, ExportConfigBuilder, ExportVariant};

// Error types
pub use error::{Error, Result};

// Export types
pub use export::{ExportReport, ExportWalker, ExportedFile, Skip, SkipReason};

// Identifier types
pub use identifiers::{Handle, RequestId};

// Protocol types
pub use protocol::{EngineCommand, ObjectInfo, Request, Response};

// Session types
pub use session::EngineSession;
