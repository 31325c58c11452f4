//! Request and response envelope types.
//!
//! # Format
//!
//! Request:
//!
//! ```json
//! {"jsonrpc": "2.0", "method": "OpenDoc", "handle": -1,
//!  "params": ["sales.qvf"], "id": 1, "outKey": -1}
//! ```
//!
//! Response: `{"id": 1, "result": {...}}` on success,
//! `{"id": 1, "error": {"code": 1002, "message": "..."}}` on engine failure.
//! The engine also pushes unsolicited notifications (no `id`), which the
//! session skips while waiting for a correlated reply.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identifiers::{Handle, RequestId};

use super::EngineCommand;

// ============================================================================
// Constants
// ============================================================================

/// Protocol version tag sent with every request.
const JSONRPC_VERSION: &str = "2.0";

/// The `qType` marking a top-level sheet object.
pub const SHEET_TYPE: &str = "sheet";

// ============================================================================
// Request
// ============================================================================

/// One command request addressed to an engine object handle.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Protocol version tag (`"2.0"`).
    #[serde(rename = "jsonrpc")]
    version: &'static str,

    /// Correlation identifier, unique per in-flight call.
    pub id: RequestId,

    /// Target object handle ([`Handle::GLOBAL`] for `OpenDoc`).
    pub handle: Handle,

    /// Method and params.
    #[serde(flatten)]
    pub command: EngineCommand,

    /// Return-value routing key; only `OpenDoc` carries one.
    #[serde(rename = "outKey", skip_serializing_if = "Option::is_none")]
    pub out_key: Option<i64>,
}

impl Request {
    /// Creates a request for `command` against `handle`.
    #[must_use]
    pub fn new(id: RequestId, handle: Handle, command: EngineCommand) -> Self {
        let out_key = command.out_key();
        Self {
            version: JSONRPC_VERSION,
            id,
            handle,
            command,
            out_key,
        }
    }

    /// Returns the engine method name.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &'static str {
        self.command.method_name()
    }
}

// ============================================================================
// RpcError
// ============================================================================

/// Engine-side error payload inside a well-formed response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcError {
    /// Engine error code.
    pub code: i64,

    /// Offending parameter, if the engine names one.
    #[serde(default)]
    pub parameter: Option<String>,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Response
// ============================================================================

/// A correlated reply to one [`Request`].
///
/// Either `result` or `error` is populated. An error here is an
/// application-level condition, not a transport failure; the session hands
/// it back to the caller untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result payload (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload (if engine-side failure).
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl Response {
    /// Returns `true` if the engine signaled a failure.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the engine error message, or a placeholder when absent.
    #[must_use]
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(err) if !err.message.is_empty() => err.message.clone(),
            Some(err) => format!("engine error code {}", err.code),
            None => "unknown engine error".to_string(),
        }
    }

    /// Extracts the returned object handle (`result.qReturn.qHandle`).
    #[must_use]
    pub fn object_handle(&self) -> Option<Handle> {
        self.result
            .as_ref()
            .and_then(|v| v.get("qReturn"))
            .and_then(|v| v.get("qHandle"))
            .and_then(Value::as_i64)
            .map(Handle::new)
    }

    /// Extracts an object-info list (`result.qInfos`).
    ///
    /// Returns an empty list when the field is absent or malformed; a
    /// missing list is an application-level anomaly, not a decode failure.
    #[must_use]
    pub fn object_infos(&self) -> Vec<ObjectInfo> {
        self.result
            .as_ref()
            .and_then(|v| v.get("qInfos"))
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Extracts the layout title (`result.qLayout.qMeta.title`).
    #[must_use]
    pub fn layout_title(&self) -> Option<String> {
        self.result
            .as_ref()
            .and_then(|v| v.get("qLayout"))
            .and_then(|v| v.get("qMeta"))
            .and_then(|v| v.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Extracts a non-empty download path (`result.qUrl`).
    #[must_use]
    pub fn download_url(&self) -> Option<String> {
        self.result
            .as_ref()
            .and_then(|v| v.get("qUrl"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

// ============================================================================
// ObjectInfo
// ============================================================================

/// Identity of one exportable or drillable object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectInfo {
    /// Object id, unique within the document.
    #[serde(rename = "qId")]
    pub id: String,

    /// Object type (`"sheet"`, `"barchart"`, ...).
    #[serde(rename = "qType", default)]
    pub object_type: String,
}

impl ObjectInfo {
    /// Returns `true` if this object is a top-level sheet.
    #[inline]
    #[must_use]
    pub fn is_sheet(&self) -> bool {
        self.object_type == SHEET_TYPE
    }
}

// ============================================================================
// ServerMessage
// ============================================================================

/// Any frame the engine sends: a correlated reply or a pushed notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Reply to a request, carrying its correlation id.
    Response(Response),
    /// Unsolicited engine notification (`OnConnected`, progress, ...).
    Notification(Notification),
}

/// Unsolicited engine push message; carries no correlation id.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Notification method name.
    pub method: String,

    /// Notification payload.
    #[serde(default)]
    pub params: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================
