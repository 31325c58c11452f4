//! The export walk.
//!
//! A linear workflow against one open document:
//!
//! 1. `OpenDoc` - extract the document handle (fatal if absent)
//! 2. `DoReload`, `DoSave` - errors tolerated unless `fail_fast`
//! 3. per value set (or once, with no filter): `SelectValues`, then the
//!    object-tree walk - sheets via `GetAllInfos`, each sheet's handle,
//!    layout title and children, each child's handle, export call(s), and
//!    the artifact download
//!
//! Transport and protocol failures abort the walk. Per-object anomalies
//! (missing handle, missing url, refused download) are recorded in the
//! [`ExportReport`] and the walk continues.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use futures_util::{Sink, Stream};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::identifiers::Handle;
use crate::protocol::{EngineCommand, ObjectInfo, Response};
use crate::session::{EngineSession, WsTransport};

use super::download::{
    ArtifactDownloader, DownloadOutcome, UNTITLED, artifact_filename, derive_http_base,
};
use super::report::{ExportReport, SkipReason};

// ============================================================================
// ExportWalker
// ============================================================================

/// Drives the export workflow over one engine session.
///
/// Built with [`ExportWalker::connect`] in production, or
/// [`ExportWalker::with_session`] over any message stream in tests.
pub struct ExportWalker<S = WsTransport> {
    session: EngineSession<S>,
    config: ExportConfig,
    downloader: ArtifactDownloader,
    document: Option<Handle>,
}

impl ExportWalker<WsTransport> {
    /// Connects to the configured endpoint and prepares a walker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the endpoint is unreachable; this
    /// is fatal for the run.
    pub async fn connect(config: ExportConfig) -> Result<Self> {
        let session = EngineSession::connect(&config.endpoint).await?;
        Self::with_session(session, config)
    }
}

impl<S> ExportWalker<S>
where
    S: Stream<Item = StdResult<Message, WsError>> + Sink<Message, Error = WsError> + Unpin,
{
    /// Wraps an already-established session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no download base can be derived from
    /// the endpoint.
    pub fn with_session(session: EngineSession<S>, config: ExportConfig) -> Result<Self> {
        let base = match &config.download_base {
            Some(base) => base.clone(),
            None => derive_http_base(&config.endpoint)?,
        };
        let downloader = ArtifactDownloader::new(base, config.export_dir.clone());

        Ok(Self {
            session,
            config,
            downloader,
            document: None,
        })
    }

    /// Returns the open document handle.
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<Handle> {
        self.document
    }

    /// Runs the whole workflow and returns the report.
    pub async fn run(mut self) -> Result<ExportReport> {
        self.open_document().await?;
        self.reload().await?;
        self.save().await?;

        let mut report = ExportReport::new();

        let filter = self.config.filter_field.clone();
        let value_sets = self.config.value_sets.clone();

        match filter {
            Some(field) if !value_sets.is_empty() => {
                for values in &value_sets {
                    self.select_values(&field, values).await?;
                    self.export_all(&mut report).await?;
                    info!(field = %field, values = ?values, "Export pass completed");
                }
            }
            _ => {
                self.export_all(&mut report).await?;
            }
        }

        info!(
            files = report.files.len(),
            skipped = report.skipped.len(),
            passes = report.passes,
            "Run completed"
        );

        Ok(report)
    }

    // ========================================================================
    // Lifecycle operations
    // ========================================================================

    /// Opens the configured document and stores its handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Application`] if the engine signals an error or the
    /// response carries no handle; no further calls may be issued.
    pub async fn open_document(&mut self) -> Result<Handle> {
        let command = EngineCommand::open_doc(self.config.document_id.clone());
        let response = self.session.invoke(Handle::GLOBAL, command).await?;

        if response.is_error() {
            return Err(Error::application("OpenDoc", response.error_message()));
        }

        let handle = response
            .object_handle()
            .ok_or_else(|| Error::application("OpenDoc", "response carried no document handle"))?;

        info!(document = %self.config.document_id, handle = %handle, "Document opened");
        self.document = Some(handle);
        Ok(handle)
    }

    /// Reloads the document's data.
    pub async fn reload(&mut self) -> Result<()> {
        self.document_call(EngineCommand::DoReload {}).await
    }

    /// Saves the document.
    pub async fn save(&mut self) -> Result<()> {
        self.document_call(EngineCommand::DoSave {}).await
    }

    /// Replaces the selection in `field` with `values`.
    pub async fn select_values(&mut self, field: &str, values: &[String]) -> Result<()> {
        self.document_call(EngineCommand::select_values(field, values))
            .await
    }

    /// Issues one call against the document handle, tolerating engine
    /// errors per configuration.
    async fn document_call(&mut self, command: EngineCommand) -> Result<()> {
        let handle = self.document_handle()?;
        let method = command.method_name();
        let response = self.session.invoke(handle, command).await?;
        self.tolerate(method, &response)?;
        debug!(method, "Document call completed");
        Ok(())
    }

    fn document_handle(&self) -> Result<Handle> {
        self.document.ok_or(Error::DocumentNotOpen)
    }

    /// Applies the configured failure policy to an engine error response.
    fn tolerate(&self, method: &str, response: &Response) -> Result<()> {
        if response.is_error() {
            if self.config.fail_fast {
                return Err(Error::application(method, response.error_message()));
            }
            warn!(method, error = %response.error_message(), "Engine error tolerated");
        }
        Ok(())
    }

    // ========================================================================
    // Object-tree walk
    // ========================================================================

    /// Exports every object on every sheet under the current selection.
    pub async fn export_all(&mut self, report: &mut ExportReport) -> Result<()> {
        report.passes += 1;

        let handle = self.document_handle()?;
        let response = self
            .session
            .invoke(handle, EngineCommand::GetAllInfos {})
            .await?;
        self.tolerate("GetAllInfos", &response)?;

        let sheets: Vec<ObjectInfo> = response
            .object_infos()
            .into_iter()
            .filter(ObjectInfo::is_sheet)
            .collect();

        debug!(count = sheets.len(), "Sheets found");

        for sheet in &sheets {
            self.export_sheet(sheet, report).await?;
        }

        Ok(())
    }

    /// Walks one sheet: handle, layout title, children, per-child export.
    async fn export_sheet(&mut self, sheet: &ObjectInfo, report: &mut ExportReport) -> Result<()> {
        let document = self.document_handle()?;

        let response = self
            .session
            .invoke(document, EngineCommand::get_object(&sheet.id))
            .await?;
        self.tolerate("GetObject", &response)?;

        let Some(sheet_handle) = response.object_handle() else {
            warn!(sheet = %sheet.id, "Sheet has no handle, skipping");
            report.skip(sheet.id.clone(), SkipReason::MissingHandle);
            return Ok(());
        };

        let layout = self
            .session
            .invoke(sheet_handle, EngineCommand::GetLayout {})
            .await?;
        self.tolerate("GetLayout", &layout)?;
        let title = layout
            .layout_title()
            .unwrap_or_else(|| UNTITLED.to_string());

        let children = self
            .session
            .invoke(sheet_handle, EngineCommand::GetChildInfos {})
            .await?;
        self.tolerate("GetChildInfos", &children)?;
        let infos = children.object_infos();

        debug!(sheet = %sheet.id, title = %title, children = infos.len(), "Walking sheet");

        for child in &infos {
            self.export_object(&title, child, report).await?;
        }

        Ok(())
    }

    /// Exports one object and downloads its artifact.
    async fn export_object(
        &mut self,
        sheet_title: &str,
        object: &ObjectInfo,
        report: &mut ExportReport,
    ) -> Result<()> {
        let document = self.document_handle()?;

        let response = self
            .session
            .invoke(document, EngineCommand::get_object(&object.id))
            .await?;
        self.tolerate("GetObject", &response)?;

        let Some(object_handle) = response.object_handle() else {
            warn!(object = %object.id, "Object has no handle, skipping");
            report.skip(object.id.clone(), SkipReason::MissingHandle);
            return Ok(());
        };

        debug!(object = %object.id, kind = %object.object_type, "Exporting object");

        // Issue the configured export variant(s); the download url comes
        // from the first response that carries one.
        let mut download_url = None;
        for command in self.config.export_variant.commands() {
            let method = command.method_name();
            let response = self.session.invoke(object_handle, command).await?;
            self.tolerate(method, &response)?;

            if download_url.is_none() {
                download_url = response.download_url();
            }
        }

        let Some(url) = download_url else {
            warn!(object = %object.id, "No download url in export response, skipping");
            report.skip(object.id.clone(), SkipReason::NoDownloadUrl);
            return Ok(());
        };

        let filename = artifact_filename(sheet_title, &object.id);
        match self.downloader.fetch(&url, &filename).await? {
            DownloadOutcome::Saved(path) => {
                info!(path = %path.display(), "Exported");
                report.exported(sheet_title, &object.id, path);
            }
            DownloadOutcome::HttpStatus(status) => {
                report.skip(object.id.clone(), SkipReason::HttpStatus(status));
            }
        }

        Ok(())
    }

    /// Closes the underlying session.
    pub async fn close(&mut self) -> Result<()> {
        self.session.close().await
    }
}
