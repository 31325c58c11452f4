//! Artifact retrieval over HTTP.
//!
//! Export responses carry a server-relative download path. The artifact is
//! fetched with a plain GET against the engine's HTTP side (the WebSocket
//! endpoint with the scheme swapped, unless overridden) and streamed to a
//! file named after the sheet title and object id.

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Title used when a sheet layout carries none.
pub const UNTITLED: &str = "Untitled";

/// Replacement for characters that are unsafe in a filename.
const FILLER: char = '_';

// ============================================================================
// Helpers
// ============================================================================

/// Maps the WebSocket endpoint onto its HTTP sibling (`ws` → `http`,
/// `wss` → `https`).
pub fn derive_http_base(endpoint: &Url) -> Result<Url> {
    let scheme = match endpoint.scheme() {
        "ws" => "http",
        "wss" => "https",
        other => {
            return Err(Error::config(format!(
                "cannot derive a download base from scheme {other}"
            )));
        }
    };

    let mut base = endpoint.clone();
    base.set_scheme(scheme)
        .map_err(|()| Error::config("endpoint does not admit an http scheme"))?;
    Ok(base)
}

/// Builds the destination filename `<sheetTitle>_<objectId>.png`.
///
/// Spaces and path separators are replaced; sheet titles are user-entered
/// and must not escape the export directory.
#[must_use]
pub fn artifact_filename(sheet_title: &str, object_id: &str) -> String {
    format!("{sheet_title}_{object_id}.png")
        .replace([' ', '/', '\\'], &FILLER.to_string())
}

// ============================================================================
// DownloadOutcome
// ============================================================================

/// Result of one artifact fetch.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Artifact written to the given path.
    Saved(PathBuf),
    /// Server answered with a non-success status; nothing written.
    HttpStatus(u16),
}

// ============================================================================
// ArtifactDownloader
// ============================================================================

/// Fetches export artifacts into the export directory.
///
/// Downloads run one at a time; the response body and the destination file
/// are both released before the next fetch begins.
pub struct ArtifactDownloader {
    http: reqwest::Client,
    base: Url,
    export_dir: PathBuf,
}

impl ArtifactDownloader {
    /// Creates a downloader rooted at `base`, writing under `export_dir`.
    #[must_use]
    pub fn new(base: Url, export_dir: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            export_dir,
        }
    }

    /// Fetches one artifact and writes it to `<export_dir>/<filename>`.
    ///
    /// A non-success status is reported as [`DownloadOutcome::HttpStatus`],
    /// not as an error; the walk continues past it.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if the server-supplied path does not join onto
    ///   the download base
    /// - [`Error::Http`] if the request itself fails
    /// - [`Error::Io`] if writing the file fails
    pub async fn fetch(&self, download_path: &str, filename: &str) -> Result<DownloadOutcome> {
        let url = self
            .base
            .join(download_path)
            .map_err(|e| Error::protocol(format!("bad download path {download_path}: {e}")))?;

        debug!(url = %url, "Downloading artifact");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Artifact download refused");
            return Ok(DownloadOutcome::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let path = self.export_dir.join(filename);
        tokio::fs::write(&path, &bytes).await?;

        debug!(path = %path.display(), bytes = bytes.len(), "Artifact saved");

        Ok(DownloadOutcome::Saved(path))
    }
}

// ============================================================================
// Tests
// ============================================================================
