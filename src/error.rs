//! Error types for sheetshot.
//!
//! The taxonomy separates three failure classes:
//!
//! | Class | Variants | Walk behavior |
//! |-------|----------|---------------|
//! | Transport | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::WebSocket`] | fatal, aborts the run |
//! | Protocol | [`Error::Protocol`], [`Error::Json`] | fatal, aborts the run |
//! | Application | [`Error::Application`] | tolerated unless `fail_fast` |
//!
//! A well-formed response carrying an engine-side error payload is *not* a
//! transport or protocol failure; the session returns it normally and the
//! walker decides what to do with it.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when export configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the connection to the engine endpoint cannot be
    /// established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// WebSocket connection closed unexpectedly.
    ///
    /// Returned when the stream closes or ends while a response is still
    /// awaited.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected message.
    ///
    /// Returned when an incoming frame cannot be decoded as a response or
    /// notification.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Application Errors
    // ========================================================================
    /// Engine-side failure carried in a well-formed response.
    ///
    /// Raised by the walker when an application error cannot be tolerated:
    /// a missing document handle, or any error response while `fail_fast`
    /// is set.
    #[error("Engine error in {method}: {message}")]
    Application {
        /// The method whose response signaled the failure.
        method: String,
        /// Error message from the engine.
        message: String,
    },

    /// A document operation was issued before `OpenDoc` succeeded.
    #[error("No document is open")]
    DocumentNotOpen,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// HTTP download error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an application error.
    #[inline]
    pub fn application(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Application {
            method: method.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a transport-level error.
    ///
    /// Transport errors abort the remainder of a walk.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is a protocol-level error.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::Json(_))
    }

    /// Returns `true` if this is an engine application error.
    #[inline]
    #[must_use]
    pub fn is_application_error(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::connection("engine unreachable");
        assert_eq!(err.to_string(), "Connection failed: engine unreachable");
    }

    #[test]
    fn test_application_display() {
        let err = Error::application("OpenDoc", "App not found");
        assert_eq!(err.to_string(), "Engine error in OpenDoc: App not found");
    }

    #[test]
    fn test_is_transport_error() {
        assert!(Error::connection("x").is_transport_error());
        assert!(Error::ConnectionClosed.is_transport_error());
        assert!(!Error::protocol("x").is_transport_error());
        assert!(!Error::config("x").is_transport_error());
    }

    #[test]
    fn test_is_protocol_error() {
        assert!(Error::protocol("bad frame").is_protocol_error());
        assert!(!Error::ConnectionClosed.is_protocol_error());
    }

    #[test]
    fn test_is_application_error() {
        assert!(Error::application("DoReload", "locked").is_application_error());
        assert!(!Error::ConnectionClosed.is_application_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_protocol_error());
    }
}
