//! Registry mapping interactive entities to the actions they trigger.

use std::collections::HashMap;

use crate::error::{FlythroughError, Result};
use crate::ids::EntityId;

/// Registry of actions keyed by entity.
///
/// Event handlers are stored as plain data rather than captured closures:
/// an event loop looks the entity up here and interprets the action.
#[derive(Debug)]
pub struct Registry<A> {
    actions: HashMap<EntityId, A>,
}

impl<A> Default for Registry<A> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<A> Registry<A> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action for an entity.
    ///
    /// Returns an error if the entity already has an action.
    pub fn register(&mut self, id: EntityId, action: A) -> Result<()> {
        if self.actions.contains_key(&id) {
            return Err(FlythroughError::EntityExists(id));
        }
        self.actions.insert(id, action);
        Ok(())
    }

    /// Gets the action registered for an entity.
    pub fn get(&self, id: EntityId) -> Option<&A> {
        self.actions.get(&id)
    }

    /// Gets the action registered for an entity, or an error.
    pub fn lookup(&self, id: EntityId) -> Result<&A> {
        self.get(id).ok_or(FlythroughError::EntityNotFound(id))
    }

    /// Checks if an entity has an action.
    pub fn contains(&self, id: EntityId) -> bool {
        self.actions.contains_key(&id)
    }

    /// Removes the action of an entity.
    pub fn remove(&mut self, id: EntityId) -> Option<A> {
        self.actions.remove(&id)
    }

    /// Removes all actions for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId, &A) -> bool) {
        self.actions.retain(|id, action| keep(*id, action));
    }

    /// Removes all actions.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Returns the number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no action is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterates over all `(entity, action)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &A)> {
        self.actions.iter().map(|(id, action)| (*id, action))
    }
}
