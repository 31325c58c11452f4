//! RPC session over the engine WebSocket.
//!
//! # Connection Lifecycle
//!
//! 1. [`EngineSession::connect`] - WebSocket handshake with the endpoint
//! 2. [`EngineSession::call`] / [`EngineSession::invoke`] - sequential
//!    request/response exchanges, correlated by id
//! 3. [`EngineSession::close`] - graceful shutdown
//!
//! One session holds one connection for the lifetime of one run; it is
//! never shared.

// ============================================================================
// Submodules
// ============================================================================

/// Engine session and call loop.
pub mod connection;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{EngineSession, WsTransport};
