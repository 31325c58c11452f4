//! Type-safe identifiers for engine entities.
//!
//! Newtype wrappers prevent mixing incompatible integers at compile time:
//! an object [`Handle`] is never a correlation [`RequestId`], even though
//! both travel as plain numbers on the wire.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Handle
// ============================================================================

/// Server-assigned opaque reference to an open object instance.
///
/// Handles identify documents, sheets, visuals and fields on the engine
/// side. They are obtained from a prior response and passed into subsequent
/// requests; the engine never hands out a lifecycle for them, so neither
/// does this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(i64);

impl Handle {
    /// The pseudo-handle addressing the global/root scope (`-1` on the wire).
    ///
    /// Used as the target of `OpenDoc`, which is the only method issued
    /// before any real handle exists.
    pub const GLOBAL: Handle = Handle(-1);

    /// Wraps a raw engine handle.
    #[inline]
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw wire value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Returns `true` if this is the global pseudo-handle.
    #[inline]
    #[must_use]
    pub const fn is_global(self) -> bool {
        self.0 == -1
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Handle {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ============================================================================
// RequestId
// ============================================================================

/// Correlation identifier matching a response to its originating request.
///
/// Must be unique among requests in flight; [`IdGenerator`] guarantees this
/// by handing out strictly increasing values for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw correlation id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw wire value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// IdGenerator
// ============================================================================

/// Monotonic correlation-id source, owned by the session.
///
/// Replaces ad-hoc per-call counters: every call gets a fresh id, ids are
/// strictly increasing, and in-flight uniqueness follows for free.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Creates a generator starting at id 1.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next fresh id.
    #[inline]
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_global_handle() {
        assert_eq!(Handle::GLOBAL.raw(), -1);
        assert!(Handle::GLOBAL.is_global());
        assert!(!Handle::new(1).is_global());
    }

    #[test]
    fn test_handle_serde_transparent() {
        let json = serde_json::to_string(&Handle::new(7)).expect("serialize");
        assert_eq!(json, "7");

        let back: Handle = serde_json::from_str("-1").expect("parse");
        assert_eq!(back, Handle::GLOBAL);
    }

    #[test]
    fn test_request_id_serde_transparent() {
        let json = serde_json::to_string(&RequestId::new(42)).expect("serialize");
        assert_eq!(json, "42");
    }

    #[test]
    fn test_generator_starts_at_one() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(), RequestId::new(1));
        assert_eq!(ids.next_id(), RequestId::new(2));
    }

    proptest! {
        #[test]
        fn prop_generator_strictly_increasing(count in 1usize..200) {
            let mut ids = IdGenerator::new();
            let drawn: Vec<_> = (0..count).map(|_| ids.next_id().raw()).collect();
            for pair in drawn.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
