//! Identifiers for interactive entities (frustum markers, GUI controls).

use std::fmt;

/// Identifier of an entity that can receive viewer events.
///
/// Markers and GUI controls share one id space so a single event loop can
/// dispatch clicks and value updates through one [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for [`EntityId`]s.
///
/// Ids are never reused within one allocator, even after the entities they
/// named have been removed.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Creates an allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}
