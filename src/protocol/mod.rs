//! Wire protocol message types.
//!
//! JSON-RPC 2.0 envelopes exchanged with the engine over text WebSocket
//! frames.
//!
//! | Message type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Request`] | client → engine | Method call against a handle |
//! | [`Response`] | engine → client | Correlated reply (result or error) |
//! | [`Notification`] | engine → client | Unsolicited push, no `id` |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Engine methods and their parameter payloads |
//! | `request` | Envelope, response, and object-info types |

// ============================================================================
// Submodules
// ============================================================================

/// Engine command definitions.
pub mod command;

/// Request and response envelope types.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{EngineCommand, FieldValue};
pub use request::{
    Notification, ObjectInfo, Request, Response, RpcError, SHEET_TYPE, ServerMessage,
};
